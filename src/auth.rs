use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;

pub const SESSION_COOKIE_NAME: &str = "session";

/// The hosted identity provider, seen from this service: hand it an opaque
/// token, get back an opaque user identifier, or none.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, token: &str) -> Option<String>;
}

pub type SharedIdentityProvider = Arc<dyn IdentityProvider>;

/// Static token map parsed from the `AUTH_TOKENS` environment variable
/// (`token:user_id` pairs, comma separated). Stands in for the hosted
/// provider in self-contained deployments and in tests.
pub struct StaticTokens {
    tokens: HashMap<String, String>,
}

impl StaticTokens {
    pub fn from_pairs(pairs: &str) -> Self {
        let tokens = pairs
            .split(',')
            .filter_map(|pair| {
                let (token, user_id) = pair.trim().split_once(':')?;
                if token.is_empty() || user_id.is_empty() {
                    return None;
                }
                Some((token.to_string(), user_id.to_string()))
            })
            .collect();
        Self { tokens }
    }
}

impl IdentityProvider for StaticTokens {
    fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// The authenticated caller. Every repository call takes this identifier
/// explicitly; there is no ambient identity anywhere below the handlers.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|token| token.to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let provider = parts
            .extensions
            .get::<SharedIdentityProvider>()
            .cloned()
            .ok_or_else(|| AppError::Internal("identity provider not configured".to_string()))?;

        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AppError::Unauthorized)?;

        provider
            .resolve(&token)
            .map(|id| AuthUser { id })
            .ok_or(AppError::Unauthorized)
    }
}
