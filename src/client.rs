//! Client side of `/oauth2/access_token`, used by the `token` subcommand to
//! fetch a bearer token from a running server for use in scripts.

use anyhow::Context;

use crate::models::token::{TokenResponse, TOKEN_TYPE};

pub struct TokenClient {
    http: reqwest::Client,
    base_url: String,
}

impl TokenClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Request a token with a form-encoded grant, the way the vendor's own SDKs do.
    pub async fn fetch(&self, grant_type: &str, refresh_token: &str) -> anyhow::Result<TokenResponse> {
        let url = format!("{}/oauth2/access_token", self.base_url);

        let resp = self
            .http
            .post(&url)
            .form(&[("grant_type", grant_type), ("refresh_token", refresh_token)])
            .send()
            .await
            .with_context(|| {
                format!(
                    "could not connect to {} (is the fake CareCloud server running?)",
                    self.base_url
                )
            })?;

        let status = resp.status();
        let text = resp.text().await.context("failed to read token response")?;
        if !status.is_success() {
            anyhow::bail!("HTTP {}: {}", status.as_u16(), text);
        }

        serde_json::from_str(&text).with_context(|| format!("invalid response format: {}", text))
    }
}

/// How the `token` subcommand prints what it fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOutput {
    /// `Bearer <token>`, ready to paste into an Authorization header.
    Header,
    /// `export CARECLOUD_ACCESS_TOKEN=<token>`
    Export,
    Json,
    /// The bare token.
    Quiet,
}

impl TokenOutput {
    /// JSON wins over export, export over quiet.
    pub fn from_flags(json: bool, export: bool, quiet: bool) -> Self {
        if json {
            TokenOutput::Json
        } else if export {
            TokenOutput::Export
        } else if quiet {
            TokenOutput::Quiet
        } else {
            TokenOutput::Header
        }
    }

    pub fn render(&self, access_token: &str) -> anyhow::Result<String> {
        Ok(match self {
            TokenOutput::Header => format!("{} {}", TOKEN_TYPE, access_token),
            TokenOutput::Export => format!("export CARECLOUD_ACCESS_TOKEN={}", access_token),
            TokenOutput::Quiet => access_token.to_string(),
            TokenOutput::Json => serde_json::to_string_pretty(&TokenResponse {
                access_token: access_token.to_string(),
                token_type: TOKEN_TYPE.to_string(),
            })?,
        })
    }
}
