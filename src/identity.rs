// Google identity verification
//
// Exchanges a client-supplied Google access token for a verified profile by
// asking Google's token-info endpoint about it.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::OAuthCredentials;
use crate::error::AccountsError;

/// Google token-info endpoint for access tokens
pub const GOOGLE_TOKEN_INFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Identity vouched for by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleProfile {
    pub subject: String,
    pub email: String,
    pub email_verified: bool,
}

/// Resolves an OAuth access token to a profile
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, AccountsError>;
}

// Google reports `email_verified` as a string on this endpoint and as a bool elsewhere
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Deserialize, Debug)]
struct TokenInfo {
    aud: Option<String>,
    sub: Option<String>,
    email: Option<String>,
    email_verified: Option<Flag>,
}

impl TokenInfo {
    /// Check the token was issued to `client_id` and carries a verified email
    fn into_profile(self, client_id: &str) -> Result<GoogleProfile, AccountsError> {
        if self.aud.as_deref() != Some(client_id) {
            warn!("Rejected access token issued to another client");
            return Err(AccountsError::invalid_token(
                "token was not issued for this application",
            ));
        }
        let subject = self
            .sub
            .ok_or_else(|| AccountsError::invalid_token("token has no subject"))?;
        let email = self
            .email
            .ok_or_else(|| AccountsError::invalid_token("token has no email scope"))?;
        let email_verified = self.email_verified.map(|f| f.is_set()).unwrap_or(false);
        if !email_verified {
            return Err(AccountsError::UnverifiedEmail(email));
        }
        Ok(GoogleProfile {
            subject,
            email,
            email_verified,
        })
    }
}

/// Token-info backed Google identity provider
#[derive(Debug, Clone)]
pub struct GoogleIdentityProvider {
    client: Client,
    credentials: OAuthCredentials,
    token_info_url: String,
}

impl GoogleIdentityProvider {
    pub fn new(credentials: OAuthCredentials) -> Result<Self, AccountsError> {
        Self::with_endpoint(credentials, GOOGLE_TOKEN_INFO_URL)
    }

    /// Create a provider talking to a custom token-info endpoint
    pub fn with_endpoint<S: Into<String>>(
        credentials: OAuthCredentials,
        token_info_url: S,
    ) -> Result<Self, AccountsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            credentials,
            token_info_url: token_info_url.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, AccountsError> {
        let client_id = self
            .credentials
            .client_id
            .as_deref()
            .ok_or(AccountsError::OAuthNotConfigured)?;

        debug!("Checking access token with {}", self.token_info_url);
        let response = self
            .client
            .get(&self.token_info_url)
            .query(&[("access_token", access_token)])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(AccountsError::invalid_token("rejected by Google"));
            }
            status => {
                return Err(AccountsError::provider(format!(
                    "unexpected token-info status {}",
                    status
                )));
            }
        }

        let info: TokenInfo = response.json().await?;
        info.into_profile(client_id)
    }
}
