use anyhow::anyhow;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password, verify_unknown_account};
use crate::auth::safe_email_log;
use crate::auth::session::{
    clear_session_cookie, issue_token, session_cookie, Session, SessionUser,
};
use crate::errors::AppError;
use crate::models::user::NewUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotForm {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub name: String,
    pub email: String,
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// POST /signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, AppError> {
    let name = form.name.trim().to_string();
    let email = normalize_email(&form.email);
    if name.is_empty() || email.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation("All fields are required!".to_string()));
    }

    let password = form.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow!("hashing task failed: {e}")))??;

    let user = state
        .users
        .create(NewUser {
            name: &name,
            email: &email,
            password_hash: &password_hash,
        })
        .await?;

    info!(user_id = user.id, email = %safe_email_log(&user.email), "Account created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account created successfully! Please login." })),
    ))
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&form.email);

    let user = state.users.find_by_email(&email).await?;

    // Unknown emails still pay for one Argon2 verification.
    let password = form.password;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_unknown_account(&password),
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("verification task failed: {e}")))?;

    let Some(user) = user.filter(|_| verified) else {
        warn!(email = %safe_email_log(&email), "Login failed");
        return Err(AppError::InvalidCredentials);
    };

    let session_user = SessionUser {
        email: user.email,
        name: user.name,
    };
    let ttl = state.config.session_ttl_hours;
    let token = issue_token(&session_user, &state.config.session_secret, ttl)?;

    info!(email = %safe_email_log(&session_user.email), "Login succeeded");
    Ok((
        [(SET_COOKIE, session_cookie(&token, ttl))],
        Json(LoginResponse {
            message: "Logged in",
            name: session_user.name,
            email: session_user.email,
        }),
    ))
}

/// POST /logout
pub async fn handle_logout(session: Session) -> impl IntoResponse {
    if let Some(user) = &session.user {
        info!(email = %safe_email_log(&user.email), "Logged out");
    }
    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Logged out" })),
    )
}

/// POST /forgot
/// Only checks that the account exists; no reset email is sent.
pub async fn handle_forgot(
    State(state): State<AppState>,
    Form(form): Form<ForgotForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = normalize_email(&form.email);
    if state.users.find_by_email(&email).await?.is_none() {
        return Err(AppError::NotFound("Email not registered!".to_string()));
    }
    Ok(Json(
        json!({ "message": "Password reset link sent to your email" }),
    ))
}

/// GET /dashboard
pub async fn handle_dashboard(session: Session) -> Result<Json<serde_json::Value>, AppError> {
    let user = session.require_user()?;
    Ok(Json(json!({ "username": user.name, "email": user.email })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
    }
}
