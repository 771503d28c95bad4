use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::Role;
use crate::inbound::http::middleware::AuthenticatedIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoResponseData {
    pub message: String,
    pub email: String,
}

fn respond(identity: AuthenticatedIdentity, message: &str) -> ApiSuccess<DemoResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        DemoResponseData {
            message: message.to_string(),
            email: identity.email,
        },
    )
}

pub async fn hello_user(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<DemoResponseData>, ApiError> {
    identity.require_any_role(&[Role::User])?;
    Ok(respond(identity, "You accessed a USER endpoint!"))
}

pub async fn hello_admin(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<DemoResponseData>, ApiError> {
    identity.require_any_role(&[Role::Admin])?;
    Ok(respond(identity, "You accessed a ADMIN endpoint!"))
}

pub async fn hello_public(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<DemoResponseData>, ApiError> {
    identity.require_any_role(&[Role::User, Role::Admin])?;
    Ok(respond(identity, "You accessed a PUBLIC endpoint!"))
}
