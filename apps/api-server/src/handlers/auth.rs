//! Registration, login and logout handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use quill_core::domain::NewUser;
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginFormResponse, LoginRequest, RegisterRequest};

use crate::middleware::auth::{Identity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::user_response;

/// POST /register
///
/// Creates an account and signs the new user straight in.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    // Reject duplicate registrations before writing anything
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    // Hash password
    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let is_admin = state.grants_admin(&req.email);
    let user = state
        .users
        .create(NewUser::new(req.email, password_hash, &req.name, is_admin))
        .await?;

    // Auto-login after registration
    let token = state
        .sessions
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(token, state.sessions.ttl_seconds()))
        .json(AuthResponse {
            user: user_response(&user),
        }))
}

#[derive(Debug, Deserialize)]
pub struct LoginFormQuery {
    pub login_to_comment: Option<String>,
}

/// GET /login
///
/// The form itself is rendered by the client; this endpoint only
/// tailors the message when the visitor arrived trying to comment.
pub async fn login_form(query: web::Query<LoginFormQuery>) -> HttpResponse {
    let message = query
        .login_to_comment
        .as_deref()
        .map(|_| "You need to login or register to comment.".to_string());

    HttpResponse::Ok().json(LoginFormResponse { message })
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // The two failure cases stay distinguishable, as the reference UI
    // messages them differently.
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::UnknownEmail)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::BadPassword);
    }

    let token = state
        .sessions
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, state.sessions.ttl_seconds()))
        .json(AuthResponse {
            user: user_response(&user),
        }))
}

/// GET /logout - requires a valid session; teardown is unconditional.
pub async fn logout(_identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(ApiResponse::ok_with_message((), "Logged out")))
}
