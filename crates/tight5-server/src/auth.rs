//! API Key Authentication (Bearer Token)
//!
//! Each configured token maps to an owner. The resolved owner is attached to the request as an
//! [`Owner`] extension; handlers scope every joke and routine operation to it.

use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Owner used for every request when no API keys are configured
pub const LOCAL_OWNER: &str = "local";

/// Authenticated owner of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Token -> owner lookup
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: HashMap<String, String>,
}

impl ApiKeys {
    pub fn new(keys: HashMap<String, String>) -> Self {
        Self { keys }
    }

    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn owner_for(&self, token: &str) -> Option<&str> {
        self.keys.get(token).map(String::as_str)
    }
}

/// Authentication middleware
/// Validates the Bearer token and attaches its owner
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !state.api_keys.is_enabled() {
        request
            .extensions_mut()
            .insert(Owner(LOCAL_OWNER.to_string()));
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let owner = match auth_header {
        Some(header) => match header.strip_prefix("Bearer ") {
            Some(token) => match state.api_keys.owner_for(token.trim()) {
                Some(owner) => owner.to_string(),
                None => {
                    tracing::warn!("Invalid API key attempted");
                    return Err(StatusCode::UNAUTHORIZED);
                }
            },
            None => {
                tracing::warn!("Invalid Authorization header format");
                return Err(StatusCode::UNAUTHORIZED);
            }
        },
        None => {
            tracing::warn!("Missing Authorization header");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    request.extensions_mut().insert(Owner(owner));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keys_disable_auth() {
        let keys = ApiKeys::default();
        assert!(!keys.is_enabled());
        assert!(keys.owner_for("anything").is_none());
    }

    #[test]
    fn test_token_resolves_owner() {
        let keys = ApiKeys::new(HashMap::from([("tok".to_string(), "alice".to_string())]));
        assert!(keys.is_enabled());
        assert_eq!(keys.owner_for("tok"), Some("alice"));
        assert_eq!(keys.owner_for("nope"), None);
    }
}
