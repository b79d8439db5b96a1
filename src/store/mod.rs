pub mod seed;
pub mod sqlite;

pub use sqlite::Store;
