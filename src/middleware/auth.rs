use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header},
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{dto::auth::Claims, entity::Role, error::AppError, state::AppState};

pub const SESSION_COOKIE: &str = "session";

/// Authenticated identity resolved from the session, passed explicitly into
/// every service call.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(state.session.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|err| {
            tracing::debug!(error = %err, "rejected session token");
            AppError::Unauthorized
        })?;

        let user_id = decoded
            .claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::Unauthorized)?;

        Ok(CurrentUser {
            user_id,
            username: decoded.claims.username,
            role: decoded.claims.role,
        })
    }
}

/// Bearer header wins over the session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str, ttl_hours: i64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl_hours * 3600
    )
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc.def.ghi"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session=cookie"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer header"));
        assert_eq!(session_token(&headers).as_deref(), Some("header"));
    }

    #[test]
    fn missing_or_empty_session_is_none() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert!(session_token(&headers).is_none());
    }
}
