//! Caller identity and role checks.
//!
//! Identity comes from a static table of API keys presented as
//! `Authorization: Bearer <token>`. Requests without the header are
//! anonymous; a header that does not resolve is rejected with 401. Handlers
//! gate writes with [`Caller::require_role`] before touching the body.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use shelf_http::AppError;
use shelf_kernel::settings::AuthSettings;

/// Role required for every write endpoint.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// An authenticated subject and its granted roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<String>,
}

/// Resolves bearer tokens to principals.
#[derive(Debug, Default)]
pub struct Authenticator {
    keys: HashMap<String, Principal>,
}

impl Authenticator {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let keys = settings
            .api_keys
            .iter()
            .map(|key| {
                (
                    key.token.clone(),
                    Principal {
                        subject: key.subject.clone(),
                        roles: key.roles.clone(),
                    },
                )
            })
            .collect::<HashMap<_, _>>();

        if keys.is_empty() {
            tracing::warn!("no API keys configured; all write endpoints will be refused");
        }

        Self { keys }
    }

    pub fn authenticate(&self, token: &str) -> Option<&Principal> {
        self.keys.get(token)
    }
}

/// The identity behind the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(Principal),
}

impl Caller {
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        match self {
            Caller::Anonymous => false,
            Caller::Authenticated(principal) => principal.roles.iter().any(|r| r == role),
        }
    }

    /// Fails with 403 carrying `message` unless the caller holds `role`.
    pub fn require_role(&self, role: &str, message: &str) -> Result<(), AppError> {
        if self.has_role(role) {
            return Ok(());
        }

        tracing::debug!(caller = ?self.subject(), role, "access denied: missing role");
        Err(AppError::forbidden(message))
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated(principal) => Some(principal.subject.as_str()),
        }
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
    Arc<Authenticator>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Caller::Anonymous);
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("Malformed Authorization header"))?;

        let authenticator = Arc::<Authenticator>::from_ref(state);
        match authenticator.authenticate(token) {
            Some(principal) => Ok(Caller::Authenticated(principal.clone())),
            None => {
                tracing::debug!("rejected unknown API key");
                Err(AppError::unauthorized("Invalid API key"))
            }
        }
    }
}
