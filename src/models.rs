// djgoprod data models
//
// Request and response bodies used by the accounts handlers.

use serde::{Deserialize, Serialize};

use crate::accounts::CustomUser;

/// Error response for API
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Response for the auth check endpoint
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

/// Response carrying a CSRF token
#[derive(Serialize, Deserialize, Debug)]
pub struct CsrfTokenResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// Body of a Google social login request
#[derive(Deserialize, Debug)]
pub struct SocialLoginRequest {
    /// OAuth access token obtained by the client from Google
    pub access_token: String,
}

/// Response after a successful social login
#[derive(Serialize, Debug)]
pub struct LoginResponse {
    pub user: CustomUser,
}
