use axum::extract::State;

use super::ApiError;
use crate::inbound::http::router::AppState;

/// Serve the token verification key as PEM text.
///
/// Only the RSA scheme has a public half to hand out; with a shared secret
/// there is nothing that may be published.
pub async fn public_key(State(state): State<AppState>) -> Result<String, ApiError> {
    state.auth_service.public_key_pem().ok_or_else(|| {
        ApiError::NotFound("No public key for the configured signing scheme".to_string())
    })
}
