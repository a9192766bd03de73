//! Access credential exchanger.
//!
//! Exchanging never consumes the authorization token: repeated calls with the
//! same live identifier each mint an independent credential. Minted credentials
//! are not persisted and cannot be revoked.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock::Clock;
use super::types::AccessCredential;
use super::validator::TokenValidator;
use crate::config::{AccessCredentialFormat, AuthConfig};
use crate::error::{AuthError, AuthResult, CredentialFault};

/// Lifetime of an access credential in seconds.
pub const ACCESS_CREDENTIAL_TTL_SECS: u64 = 3600;

/// Token type label returned alongside every access credential.
pub const TOKEN_TYPE: &str = "Bearer";

/// Claims of a signed access credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Owning subject, absent for credentials minted without a grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// HS256 signing material.
struct SignedCredentials {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl SignedCredentials {
    fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        // exp is checked against the injected clock instead
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer: issuer.to_string(),
        }
    }
}

enum Minter {
    Opaque,
    Signed(Box<SignedCredentials>),
}

pub struct AccessCredentialExchanger {
    validator: Arc<TokenValidator>,
    clock: Arc<dyn Clock>,
    minter: Minter,
}

impl AccessCredentialExchanger {
    /// Exchanger minting opaque random credentials.
    pub fn opaque(validator: Arc<TokenValidator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            validator,
            clock,
            minter: Minter::Opaque,
        }
    }

    /// Exchanger minting HS256 JWTs.
    pub fn signed(
        validator: Arc<TokenValidator>,
        clock: Arc<dyn Clock>,
        secret: &str,
        issuer: &str,
    ) -> Self {
        Self {
            validator,
            clock,
            minter: Minter::Signed(Box::new(SignedCredentials::new(secret, issuer))),
        }
    }

    pub fn from_config(
        validator: Arc<TokenValidator>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Self {
        match config.access_credential {
            AccessCredentialFormat::Opaque => Self::opaque(validator, clock),
            AccessCredentialFormat::Signed => {
                Self::signed(validator, clock, &config.signing_secret, &config.issuer)
            }
        }
    }

    /// Validates `raw` and mints an access credential for its subject.
    ///
    /// Validator failures surface as [`AuthError::Unauthorized`] carrying the
    /// original kind.
    pub async fn exchange(&self, raw: &str) -> AuthResult<AccessCredential> {
        let validated = self
            .validator
            .validate(raw)
            .await
            .map_err(AuthError::into_unauthorized)?;

        self.mint_for(Some(validated.subject_id))
    }

    /// Mints a credential without any grant check.
    pub fn mint(&self) -> AuthResult<AccessCredential> {
        self.mint_for(None)
    }

    fn mint_for(&self, subject_id: Option<String>) -> AuthResult<AccessCredential> {
        let access_token = match &self.minter {
            Minter::Opaque => Uuid::new_v4().simple().to_string(),
            Minter::Signed(signed) => {
                let iat = self.clock.now_utc_millis() / 1000;
                let claims = AccessClaims {
                    sub: subject_id,
                    jti: Uuid::new_v4().to_string(),
                    iat,
                    exp: iat + ACCESS_CREDENTIAL_TTL_SECS as i64,
                    iss: signed.issuer.clone(),
                };
                encode(&Header::new(Algorithm::HS256), &claims, &signed.encoding_key)?
            }
        };

        Ok(AccessCredential {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: ACCESS_CREDENTIAL_TTL_SECS,
        })
    }

    /// Checks a signed access credential by signature and expiry only.
    ///
    /// Opaque credentials carry nothing to verify and are always rejected.
    pub fn verify(&self, raw: &str) -> AuthResult<AccessClaims> {
        let unauthorized = |cause| AuthError::Unauthorized { cause };

        let Minter::Signed(signed) = &self.minter else {
            return Err(unauthorized(CredentialFault::Malformed));
        };

        let claims = decode::<AccessClaims>(raw.trim(), &signed.decoding_key, &signed.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer => {
                    unauthorized(CredentialFault::BadSignature)
                }
                _ => unauthorized(CredentialFault::Malformed),
            })?
            .claims;

        if self.clock.now_utc_millis() > claims.exp.saturating_mul(1000) {
            return Err(unauthorized(CredentialFault::Expired));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::ManualClock;
    use crate::auth::store::{MemoryTokenStore, TokenStore};
    use crate::auth::types::AuthorizationToken;

    const NOW: i64 = 1_700_000_000_000;

    async fn setup() -> (Arc<TokenValidator>, Arc<ManualClock>, String) {
        let store = Arc::new(MemoryTokenStore::new());
        let clock = Arc::new(ManualClock::new(NOW));
        let token = AuthorizationToken {
            id: Uuid::new_v4(),
            subject_id: "subject-1".to_string(),
            interval: 5,
            created_at_ms: NOW,
            expires_at_ms: NOW + 300_000,
        };
        store.insert(&token).await.unwrap();
        let validator = Arc::new(TokenValidator::new(store, clock.clone()));
        (validator, clock, token.id.to_string())
    }

    #[tokio::test]
    async fn opaque_exchange_is_repeatable() {
        let (validator, clock, raw) = setup().await;
        let exchanger = AccessCredentialExchanger::opaque(validator, clock);

        let first = exchanger.exchange(&raw).await.unwrap();
        let second = exchanger.exchange(&raw).await.unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_eq!(first.access_token.len(), 32);
        assert!(first.access_token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(first.token_type, "Bearer");
        assert_eq!(second.expires_in, 3600);
    }

    #[tokio::test]
    async fn validator_failures_become_unauthorized() {
        let (validator, clock, raw) = setup().await;
        let exchanger = AccessCredentialExchanger::opaque(validator, clock.clone());

        let err = exchanger.exchange("garbage").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Unauthorized {
                cause: CredentialFault::Malformed
            }
        ));

        clock.advance(300_001);
        let err = exchanger.exchange(&raw).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Unauthorized {
                cause: CredentialFault::Expired
            }
        ));
    }

    #[tokio::test]
    async fn signed_credentials_verify_until_expiry() {
        let (validator, clock, raw) = setup().await;
        let exchanger =
            AccessCredentialExchanger::signed(validator, clock.clone(), "secret", "momo-sandbox");

        let credential = exchanger.exchange(&raw).await.unwrap();
        let claims = exchanger.verify(&credential.access_token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("subject-1"));
        assert_eq!(claims.exp - claims.iat, 3600);

        clock.advance(3_600_000);
        assert!(exchanger.verify(&credential.access_token).is_ok());

        clock.advance(1);
        assert!(matches!(
            exchanger.verify(&credential.access_token),
            Err(AuthError::Unauthorized {
                cause: CredentialFault::Expired
            })
        ));
    }

    #[tokio::test]
    async fn foreign_signatures_are_rejected() {
        let (validator, clock, _) = setup().await;
        let ours = AccessCredentialExchanger::signed(
            validator.clone(),
            clock.clone(),
            "secret",
            "momo-sandbox",
        );
        let theirs = AccessCredentialExchanger::signed(validator, clock, "other", "momo-sandbox");

        let credential = theirs.mint().unwrap();
        assert!(matches!(
            ours.verify(&credential.access_token),
            Err(AuthError::Unauthorized {
                cause: CredentialFault::BadSignature
            })
        ));
        assert!(matches!(
            ours.verify("not.a.jwt"),
            Err(AuthError::Unauthorized {
                cause: CredentialFault::Malformed
            })
        ));
    }

    #[tokio::test]
    async fn opaque_mode_cannot_verify() {
        let (validator, clock, _) = setup().await;
        let exchanger = AccessCredentialExchanger::opaque(validator, clock);
        let credential = exchanger.mint().unwrap();
        assert!(exchanger.verify(&credential.access_token).is_err());
    }
}
