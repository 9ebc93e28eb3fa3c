// Error handling for djgoprod
//
// This module defines error types for configuration loading and the accounts
// handlers, and maps handler errors onto HTTP responses.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::ErrorResponse;

/// Errors raised while reading the configuration file
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    /// The file exists but could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors that can occur in the accounts handlers
#[derive(Error, Debug)]
pub enum AccountsError {
    /// The access token was rejected by the identity provider
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    /// The identity provider did not vouch for the email address
    #[error("Email address {0} is not verified")]
    UnverifiedEmail(String),

    /// GOOGLE_CLIENT_ID is missing, so tokens cannot be checked
    #[error("Google OAuth is not configured")]
    OAuthNotConfigured,

    /// The identity provider could not be reached or answered garbage
    #[error("Identity provider error: {0}")]
    Provider(String),
}

impl AccountsError {
    /// Create a new InvalidToken error
    pub fn invalid_token<S: Into<String>>(msg: S) -> Self {
        Self::InvalidToken(msg.into())
    }

    /// Create a new Provider error
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        Self::Provider(msg.into())
    }
}

impl From<reqwest::Error> for AccountsError {
    fn from(err: reqwest::Error) -> Self {
        AccountsError::Provider(err.to_string())
    }
}

impl ResponseError for AccountsError {
    fn status_code(&self) -> StatusCode {
        match self {
            AccountsError::InvalidToken(_) | AccountsError::UnverifiedEmail(_) => {
                StatusCode::BAD_REQUEST
            }
            AccountsError::OAuthNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AccountsError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// Reasons the request guard turns a request away
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestRejected {
    /// Host header not in ALLOWED_HOSTS
    #[error("Invalid HTTP_HOST header: '{0}'")]
    DisallowedHost(String),

    /// Origin header not in the CSRF trusted origins
    #[error("CSRF Failed: Origin checking failed - {0} does not match any trusted origins")]
    UntrustedOrigin(String),

    /// No csrftoken cookie on an unsafe request
    #[error("CSRF Failed: CSRF cookie not set")]
    CsrfCookieMissing,

    /// X-CSRFToken header missing or different from the cookie
    #[error("CSRF Failed: CSRF token missing or incorrect")]
    CsrfTokenMismatch,
}

impl ResponseError for RequestRejected {
    fn status_code(&self) -> StatusCode {
        match self {
            RequestRejected::DisallowedHost(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
