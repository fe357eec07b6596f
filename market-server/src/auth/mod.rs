//! Principal extraction
//!
//! Authentication itself lives in an external gateway; this server trusts
//! the identity it forwards. The [`Principal`] extractor reads the forwarded
//! headers and makes the caller available to handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use shared::AppError;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";
const USER_NAME_HEADER: &str = "x-user-name";

/// Caller role as asserted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "buyer" => Some(Role::Buyer),
            "seller" => Some(Role::Seller),
            _ => None,
        }
    }
}

/// Authenticated principal forwarded by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    pub name: String,
}

impl Principal {
    /// Guard: sellers only
    pub fn require_seller(&self) -> Result<(), AppError> {
        if self.role != Role::Seller {
            return Err(AppError::with_message(
                shared::ErrorCode::RoleRequired,
                "Seller role required",
            ));
        }
        Ok(())
    }

    /// Guard: buyers only
    pub fn require_buyer(&self) -> Result<(), AppError> {
        if self.role != Role::Buyer {
            return Err(AppError::with_message(
                shared::ErrorCode::RoleRequired,
                "Buyer role required",
            ));
        }
        Ok(())
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }

        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let Some(id) = header(USER_ID_HEADER) else {
            tracing::warn!(uri = %parts.uri, "Request without forwarded identity");
            return Err(AppError::not_authenticated());
        };

        let role = header(USER_ROLE_HEADER)
            .and_then(Role::parse)
            .ok_or_else(|| {
                AppError::with_message(
                    shared::ErrorCode::IdentityInvalid,
                    "Missing or unknown role header",
                )
            })?;

        let name = header(USER_NAME_HEADER).unwrap_or(id).to_string();

        let principal = Principal {
            id: id.to_string(),
            role,
            name,
        };

        // Store in extensions for potential reuse
        parts.extensions.insert(principal.clone());

        Ok(principal)
    }
}
