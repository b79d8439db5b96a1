//! Decoding of `/oauth2/access_token` request bodies.
//!
//! The endpoint accepts the same two fields either form-urlencoded or as a
//! JSON object. The content type picks a [`GrantDecoder`]; both produce a
//! [`GrantRequest`], which is then checked into a [`Grant`].

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrantError {
    #[error("Unsupported grant type")]
    UnsupportedGrantType,

    #[error("{0}")]
    MalformedRequestBody(String),
}

/// Grant types accepted by the mock. Both lead to the same issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    RefreshToken,
    AuthorizationCode,
}

impl GrantType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "refresh_token" => Some(GrantType::RefreshToken),
            "authorization_code" => Some(GrantType::AuthorizationCode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::RefreshToken => "refresh_token",
            GrantType::AuthorizationCode => "authorization_code",
        }
    }
}

/// Fields as they arrived, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantRequest {
    pub grant_type: Option<String>,
    pub refresh_token: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub grant_type: GrantType,
    /// Carried through but never checked against anything.
    pub refresh_token: Option<String>,
}

impl GrantRequest {
    pub fn validate(self) -> Result<Grant, GrantError> {
        let grant_type = self
            .grant_type
            .as_deref()
            .and_then(GrantType::parse)
            .ok_or(GrantError::UnsupportedGrantType)?;
        Ok(Grant {
            grant_type,
            refresh_token: self.refresh_token,
        })
    }
}

pub trait GrantDecoder: Send + Sync {
    fn decode(&self, body: &[u8]) -> Result<GrantRequest, GrantError>;
}

pub struct FormDecoder;

impl GrantDecoder for FormDecoder {
    fn decode(&self, body: &[u8]) -> Result<GrantRequest, GrantError> {
        let mut request = GrantRequest::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "grant_type" => request.grant_type = Some(value.into_owned()),
                "refresh_token" => request.refresh_token = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(request)
    }
}

pub struct JsonDecoder;

impl GrantDecoder for JsonDecoder {
    fn decode(&self, body: &[u8]) -> Result<GrantRequest, GrantError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("grant body is not valid JSON: {}", e);
            invalid_json()
        })?;
        let object = value.as_object().ok_or_else(invalid_json)?;

        // Non-string values are treated as absent and fail grant validation.
        let field = |name: &str| object.get(name).and_then(Value::as_str).map(String::from);
        Ok(GrantRequest {
            grant_type: field("grant_type"),
            refresh_token: field("refresh_token"),
        })
    }
}

fn invalid_json() -> GrantError {
    GrantError::MalformedRequestBody("Invalid JSON body".to_string())
}

/// Body encoding, chosen from the request's `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantEncoding {
    Form,
    Json,
    /// Missing or unrecognised content type. Decoded as a form, but only
    /// accepted when `grant_type` turns up.
    Unspecified,
}

impl GrantEncoding {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.contains("application/json") => GrantEncoding::Json,
            Some(ct) if ct.contains("application/x-www-form-urlencoded") => GrantEncoding::Form,
            _ => GrantEncoding::Unspecified,
        }
    }

    pub fn decoder(&self) -> &'static dyn GrantDecoder {
        match self {
            GrantEncoding::Json => &JsonDecoder,
            GrantEncoding::Form | GrantEncoding::Unspecified => &FormDecoder,
        }
    }
}

/// Decode and validate a token request body.
pub fn decode_grant(content_type: Option<&str>, body: &[u8]) -> Result<Grant, GrantError> {
    let encoding = GrantEncoding::from_content_type(content_type);
    let request = encoding.decoder().decode(body)?;

    if encoding == GrantEncoding::Unspecified && request.grant_type.is_none() {
        return Err(GrantError::MalformedRequestBody(
            "grant_type is required".to_string(),
        ));
    }

    request.validate()
}
