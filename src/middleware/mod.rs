pub mod bearer;
pub mod headers;
