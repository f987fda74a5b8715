//! Session identity extractors.
//!
//! The session travels in an HttpOnly cookie holding a signed token.
//! Extractors only validate the token; whether the embedded user id
//! still maps to a live account is resolved per-request through
//! `AppState::resolve_actor`.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};

use quill_core::ports::AuthError;
use quill_shared::ErrorResponse;

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Build the cookie carrying a freshly issued session token.
pub fn session_cookie(token: String, ttl_seconds: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(ttl_seconds))
        .finish()
}

/// Build the cookie that clears the session on logout.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Validated session identity extractor.
///
/// Use this in handlers that refuse unauthenticated requests outright:
/// ```ignore
/// async fn logout(identity: Identity) -> impl Responder { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
}

/// Error type for session validation failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::SessionExpired => ErrorResponse::unauthorized()
                .with_detail("Your session has expired. Please log in again.")
                .with_redirect("/login"),
            AuthError::InvalidSession(msg) => ErrorResponse::unauthorized()
                .with_detail(msg.clone())
                .with_redirect("/login"),
            AuthError::MissingSession => ErrorResponse::unauthorized()
                .with_detail("Please log in first.")
                .with_redirect("/login"),
            AuthError::Hashing(_) => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                tracing::error!("AppState not found in app data");
                return ready(Err(AuthenticationError(AuthError::InvalidSession(
                    "Server configuration error".to_string(),
                ))));
            }
        };

        let cookie = match req.cookie(SESSION_COOKIE) {
            Some(cookie) => cookie,
            None => return ready(Err(AuthenticationError(AuthError::MissingSession))),
        };

        match state.sessions.validate(cookie.value()) {
            Ok(claims) => ready(Ok(Identity {
                user_id: claims.user_id,
            })),
            Err(e) => ready(Err(AuthenticationError(e))),
        }
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => ready(Ok(OptionalIdentity(Some(identity)))),
            Err(_) => ready(Ok(OptionalIdentity(None))),
        }
    }
}
