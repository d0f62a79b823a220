//! Caller identity resolution.
//!
//! Requests carry a bearer token; the resolver decodes its claims and maps
//! them to a stable ledger party before any handler logic runs. With a
//! configured shared secret the HS256 signature and expiry are verified;
//! without one the claims are taken at face value, which fits deployments
//! where an authenticating proxy terminates auth in front of the gateway.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::Party;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use headers::{
    HeaderMapExt,
    authorization::{Authorization, Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, dangerous, decode};
use serde::{Deserialize, Serialize};

/// Bearer token claims this gateway understands.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Explicit ledger party; `sub` is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_id: Option<String>,
    pub exp: usize,
}

/// Maps inbound bearer tokens to ledger parties.
pub struct PartyResolver {
    mode: Mode,
}

enum Mode {
    Verifying {
        key: DecodingKey,
        validation: Validation,
    },
    Unverified,
}

impl PartyResolver {
    /// Verifying resolver: signature and expiry are checked against the
    /// shared secret.
    pub fn with_shared_secret(secret: &str) -> Self {
        Self {
            mode: Mode::Verifying {
                key: DecodingKey::from_secret(secret.as_bytes()),
                validation: Validation::new(Algorithm::HS256),
            },
        }
    }

    /// Non-verifying resolver: claims are decoded with no signature or
    /// expiry checks. Only for deployments that terminate auth upstream.
    pub fn unverified() -> Self {
        Self {
            mode: Mode::Unverified,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        match &config.auth_shared_secret {
            Some(secret) => Self::with_shared_secret(secret),
            None => {
                tracing::warn!(
                    "AUTH_SHARED_SECRET is not set, bearer token signatures will not be verified"
                );
                Self::unverified()
            }
        }
    }

    /// Resolve a bearer token to the party it speaks for.
    pub fn resolve(&self, token: &str) -> Result<Party, AppError> {
        let data = match &self.mode {
            Mode::Verifying { key, validation } => decode::<Claims>(token, key, validation),
            Mode::Unverified => dangerous::insecure_decode::<Claims>(token),
        }
        .map_err(|err| AppError::Unauthorized(format!("Invalid token: {err}")))?;

        let party = data.claims.party_id.unwrap_or(data.claims.sub);
        if party.is_empty() {
            return Err(AppError::Unauthorized("Token carries no party".into()));
        }
        Ok(Party::new(party))
    }
}

/// The authenticated caller, extracted before handler logic runs.
pub struct AuthenticatedParty {
    pub party: Party,
}

impl FromRequestParts<AppState> for AuthenticatedParty {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| AppError::Unauthorized("Missing bearer credentials".into()))?;

        let party = state.resolver.resolve(bearer.token())?;
        Ok(AuthenticatedParty { party })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";
    // 2100-01-01, far enough out for any test run.
    const FAR_FUTURE: usize = 4_102_444_800;

    fn token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn resolves_sub_claim_to_party() {
        let resolver = PartyResolver::with_shared_secret(SECRET);
        let claims = Claims {
            sub: "alice::1220ab".into(),
            party_id: None,
            exp: FAR_FUTURE,
        };

        let party = resolver.resolve(&token(&claims, SECRET)).unwrap();
        assert_eq!(party.as_str(), "alice::1220ab");
    }

    #[test]
    fn party_id_claim_wins_over_sub() {
        let resolver = PartyResolver::with_shared_secret(SECRET);
        let claims = Claims {
            sub: "user-42".into(),
            party_id: Some("alice::1220ab".into()),
            exp: FAR_FUTURE,
        };

        let party = resolver.resolve(&token(&claims, SECRET)).unwrap();
        assert_eq!(party.as_str(), "alice::1220ab");
    }

    #[test]
    fn rejects_wrong_signature() {
        let resolver = PartyResolver::with_shared_secret(SECRET);
        let claims = Claims {
            sub: "alice::1".into(),
            party_id: None,
            exp: FAR_FUTURE,
        };

        let result = resolver.resolve(&token(&claims, "other-secret"));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let resolver = PartyResolver::with_shared_secret(SECRET);
        let claims = Claims {
            sub: "alice::1".into(),
            party_id: None,
            exp: 1,
        };

        let result = resolver.resolve(&token(&claims, SECRET));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn rejects_empty_party() {
        let resolver = PartyResolver::with_shared_secret(SECRET);
        let claims = Claims {
            sub: "".into(),
            party_id: None,
            exp: FAR_FUTURE,
        };

        let result = resolver.resolve(&token(&claims, SECRET));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn unverified_mode_ignores_the_signature() {
        let resolver = PartyResolver::unverified();
        let claims = Claims {
            sub: "alice::1".into(),
            party_id: None,
            exp: FAR_FUTURE,
        };

        let party = resolver.resolve(&token(&claims, "whatever")).unwrap();
        assert_eq!(party.as_str(), "alice::1");
    }

    #[test]
    fn unverified_mode_skips_expiry_validation() {
        let resolver = PartyResolver::unverified();
        let claims = Claims {
            sub: "alice::1".into(),
            party_id: None,
            exp: 1,
        };

        let party = resolver.resolve(&token(&claims, "whatever")).unwrap();
        assert_eq!(party.as_str(), "alice::1");
    }

    #[test]
    fn garbage_tokens_are_unauthorized() {
        let resolver = PartyResolver::unverified();
        assert!(matches!(
            resolver.resolve("not-a-jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
