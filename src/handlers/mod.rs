// djgoprod HTTP handlers
//
// This module contains the accounts routes and the request guard middleware.

pub mod accounts;
pub mod request_guard;


use actix_web::web;

// Re-export handlers for easier access
pub use self::accounts::{check_auth, get_csrf_token, google_login, login, logout};
// Re-export request guard middleware
pub use self::request_guard::{GuardPolicy, RequestGuard};

/// Register every accounts route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(check_auth)
        .service(get_csrf_token)
        .service(google_login);
}
