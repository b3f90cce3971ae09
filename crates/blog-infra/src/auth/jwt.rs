//! Bearer token verification (HS256).

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::domain::User;
use blog_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const DEFAULT_ISSUER: &str = "blog-api";

/// Signing settings shared with whichever service issues tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// Reads `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        if config.secret == DEFAULT_SECRET {
            let production = std::env::var("RUST_ENV")
                .is_ok_and(|env| matches!(env.as_str(), "production" | "prod"));
            if production {
                tracing::error!("JWT_SECRET is unset in production; tokens use the default secret");
            } else {
                tracing::warn!("JWT_SECRET is unset; using the development default");
            }
        }

        config
    }
}

/// Token payload as it travels on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    exp: i64,
    iat: i64,
    iss: String,
}

impl Claims {
    fn issue(user: &User, config: &JwtConfig) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: (now + TimeDelta::hours(config.expiration_hours)).timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    fn into_token_claims(self) -> Result<TokenClaims, AuthError> {
        let user_id = Uuid::parse_str(&self.sub)
            .map_err(|_| AuthError::InvalidToken(format!("subject is not a user id: {}", self.sub)))?;

        Ok(TokenClaims {
            user_id,
            username: self.username,
        })
    }
}

fn auth_error(err: JwtError) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(err.to_string()),
    }
}

/// HS256 token service. Tokens are minted by the auth service sharing `JWT_SECRET`.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        encode(
            &Header::default(),
            &Claims::issue(user, &self.config),
            &self.encoding_key,
        )
        .map_err(auth_error)
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(auth_error)?
            .claims
            .into_token_claims()
    }
}
