// Account route handlers for djgoprod
//
// Login page, logout, auth check, CSRF token, and Google access-token login.

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    get,
    http::header,
    post, web, HttpRequest, HttpResponse,
};
use log::{info, warn};
use uuid::Uuid;

use crate::accounts::{AccountStore, CustomUser};
use crate::config::{defaults, ResolvedConfiguration};
use crate::error::AccountsError;
use crate::handlers::request_guard::CSRF_COOKIE;
use crate::identity::IdentityProvider;
use crate::models::{AuthStatusResponse, CsrfTokenResponse, LoginResponse, SocialLoginRequest};

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "sessionid";

/// Where users land after logging in or out
pub const HOME_URL: &str = "/";

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Sign in</title>
</head>
<body>
  <h1>Sign in</h1>
  <a href="/allauth/google/login/">Continue with Google</a>
</body>
</html>
"#;

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

async fn current_user(req: &HttpRequest, store: &AccountStore) -> Option<CustomUser> {
    let session = req.cookie(SESSION_COOKIE)?;
    store.user_for_session(session.value()).await
}

fn build_cookie(name: &'static str, value: String, secure: bool, http_only: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .http_only(http_only)
        .finish()
}

/// Login page, or a redirect home for users who are already signed in
#[get("/accounts/login/")]
pub async fn login(req: HttpRequest, store: web::Data<AccountStore>) -> HttpResponse {
    if current_user(&req, &store).await.is_some() {
        return redirect(HOME_URL);
    }
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(LOGIN_PAGE)
}

/// End the current session and go home
#[get("/accounts/logout/")]
pub async fn logout(req: HttpRequest, store: web::Data<AccountStore>) -> HttpResponse {
    if let Some(session) = req.cookie(SESSION_COOKIE) {
        store.logout(session.value()).await;
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();
    HttpResponse::Found()
        .insert_header((header::LOCATION, HOME_URL))
        .cookie(removal)
        .finish()
}

/// Report whether the caller has an active session
#[get("/accounts/check-auth/")]
pub async fn check_auth(req: HttpRequest, store: web::Data<AccountStore>) -> HttpResponse {
    if current_user(&req, &store).await.is_some() {
        HttpResponse::Ok().json(AuthStatusResponse {
            authenticated: true,
        })
    } else {
        HttpResponse::Forbidden().json(AuthStatusResponse {
            authenticated: false,
        })
    }
}

/// Hand out the CSRF token, reusing the one already in the cookie
#[get("/accounts/get-csrf-token/")]
pub async fn get_csrf_token(
    req: HttpRequest,
    config: web::Data<ResolvedConfiguration>,
) -> HttpResponse {
    let token = req
        .cookie(CSRF_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let secure = config.account_default_http_protocol.is_secure();
    HttpResponse::Ok()
        .cookie(build_cookie(CSRF_COOKIE, token.clone(), secure, false))
        .json(CsrfTokenResponse { csrf_token: token })
}

/// Sign in with a Google access token
///
/// The token is checked with the identity provider; the matching user is
/// created on first login and a session cookie is set.
#[post("/accounts/dj-rest-auth/google/")]
pub async fn google_login(
    body: web::Json<SocialLoginRequest>,
    store: web::Data<AccountStore>,
    provider: web::Data<dyn IdentityProvider>,
    config: web::Data<ResolvedConfiguration>,
) -> Result<HttpResponse, AccountsError> {
    let access_token = body.access_token.trim();
    if access_token.is_empty() {
        return Err(AccountsError::invalid_token("access_token is empty"));
    }

    let profile = provider.fetch_profile(access_token).await.map_err(|e| {
        warn!("Google login failed: {}", e);
        e
    })?;

    let (session_id, user) = store.login(&profile).await;
    info!("User {} logged in with Google", user);

    // The cookie lives as long as the session does
    let secure = config.account_default_http_protocol.is_secure();
    let mut cookie = build_cookie(SESSION_COOKIE, session_id, secure, true);
    cookie.set_max_age(Duration::seconds(defaults::SESSION_MAX_AGE_SECS));
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse { user }))
}
