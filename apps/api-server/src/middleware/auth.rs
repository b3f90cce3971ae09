//! Authentication extractor.

use actix_web::{FromRequest, HttpRequest, ResponseError, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use blog_core::domain::User;
use blog_core::ports::{AuthError, TokenClaims, TokenService};

use super::error::AppError;

/// Authenticated caller.
///
/// Extract it as `Result<Identity, AuthenticationError>` when authentication
/// has to run after other checks, and turn it into an error with `?`.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

impl From<Identity> for User {
    fn from(identity: Identity) -> Self {
        User::new(identity.user_id, identity.username)
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AuthenticationError {
    fn detail(&self) -> String {
        match &self.0 {
            AuthError::TokenExpired => {
                "Your authentication token has expired. Please login again.".to_string()
            }
            AuthError::InvalidToken(msg) => format!("Invalid token: {}", msg),
            AuthError::MissingAuth => {
                "Please provide a valid Bearer token in the Authorization header.".to_string()
            }
        }
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        AppError::Unauthorized(self.detail()).error_response()
    }
}

impl From<AuthenticationError> for AppError {
    fn from(err: AuthenticationError) -> Self {
        AppError::Unauthorized(err.detail())
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthenticationError> {
    let token_service = req
        .app_data::<actix_web::web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            AuthenticationError(AuthError::InvalidToken(
                "Server configuration error".to_string(),
            ))
        })?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthenticationError(AuthError::MissingAuth))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        AuthenticationError(AuthError::InvalidToken(
            "Invalid authorization header".to_string(),
        ))
    })?;

    // Parse "Bearer <token>"
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AuthenticationError(AuthError::InvalidToken(
            "Expected Bearer token".to_string(),
        ))
    })?;

    token_service
        .validate_token(token.trim())
        .map(Identity::from)
        .map_err(AuthenticationError)
}
