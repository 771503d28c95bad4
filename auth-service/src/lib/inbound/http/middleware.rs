use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::identity::models::Role;
use crate::inbound::http::router::AppState;

/// Extension type carrying the verified token identity
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub email: String,
    pub role: Option<Role>,
}

impl AuthenticatedIdentity {
    /// Require one of the given roles.
    ///
    /// # Errors
    /// * `Forbidden` - Token carries no role or a role outside `allowed`
    pub fn require_any_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        match self.role {
            Some(role) if allowed.contains(&role) => Ok(()),
            _ => Err(ApiError::Forbidden("Insufficient role".to_string())),
        }
    }
}

/// Middleware that validates bearer tokens and adds the identity to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req).map_err(IntoResponse::into_response)?;

    let claims = state
        .auth_service
        .verify_token(token)
        .map_err(|e| ApiError::from(e).into_response())?;

    // An unrecognised role grants nothing rather than failing the request
    let role = claims.role.as_deref().and_then(|role| match role.parse::<Role>() {
        Ok(role) => Some(role),
        Err(e) => {
            tracing::warn!(error = %e, "Token carries unknown role");
            None
        }
    });

    req.extensions_mut().insert(AuthenticatedIdentity {
        email: claims.sub,
        role,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    })
}
