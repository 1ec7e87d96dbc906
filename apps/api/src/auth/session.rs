//! Request-scoped session context.
//!
//! A login issues an HS256 JWT naming the user. Browsers carry it in the `session`
//! cookie; API clients may send it as `Authorization: Bearer <token>`. The `Session`
//! extractor never rejects a request, it only reports whether someone is logged in.

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// The logged-in identity carried by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    iat: i64,
    exp: i64,
}

/// Optional identity for the current request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn require_user(&self) -> Result<&SessionUser, AppError> {
        self.user.as_ref().ok_or(AppError::AuthRequired)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = token_from_headers(&parts.headers)
            .and_then(|token| verify_token(&token, &state.config.session_secret));
        Ok(Session { user })
    }
}

/// Signs a session token for `user`, valid for `ttl_hours`.
pub fn issue_token(user: &SessionUser, secret: &str, ttl_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow!("failed to sign session token: {e}")))
}

/// Returns the session user if `token` is correctly signed and unexpired.
pub fn verify_token(token: &str, secret: &str) -> Option<SessionUser> {
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(data) => Some(SessionUser {
            email: data.claims.sub,
            name: data.claims.name,
        }),
        Err(e) => {
            debug!(error = %e, "Ignoring invalid session token");
            None
        }
    }
}

/// `Set-Cookie` value that installs a session token.
pub fn session_cookie(token: &str, ttl_hours: i64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        ttl_hours * 3600
    )
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test_secret_key";

    fn asha() -> SessionUser {
        SessionUser {
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token(&asha(), SECRET, 1).unwrap();
        assert_eq!(verify_token(&token, SECRET), Some(asha()));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&asha(), SECRET, 1).unwrap();
        assert_eq!(verify_token(&token, "wrong_secret_key"), None);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(&asha(), SECRET, -2).unwrap();
        assert_eq!(verify_token(&token, SECRET), None);
    }

    #[test]
    fn test_token_read_from_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session=abc.def.ghi; lang=en"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_read_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cleared_cookie_is_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("session="));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn test_require_user_without_session() {
        let session = Session::default();
        assert!(matches!(session.require_user(), Err(AppError::AuthRequired)));
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("tok", 24);
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
