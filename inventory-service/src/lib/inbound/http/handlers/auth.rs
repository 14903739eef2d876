use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CredentialsBody;
use crate::inbound::http::router::AppState;
use crate::session::models::AuthenticatedSession;
use crate::session::models::PresentedToken;
use crate::session::models::SessionToken;

pub async fn login(
    State(state): State<AppState>,
    CredentialsBody(credentials): CredentialsBody,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    state
        .session_service
        .login(&credentials)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, LoginResponseData::from(&token)))
}

pub async fn refresh(
    State(state): State<AppState>,
    Extension(session): Extension<AuthenticatedSession>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    state.session_service.refresh(&session).await?;

    Ok(ApiSuccess::new(StatusCode::OK, "Token refreshed"))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(PresentedToken(token)): Extension<PresentedToken>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    state.session_service.revoke(&token).await?;

    Ok(ApiSuccess::new(StatusCode::OK, "Logged out"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: TokenData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub id: String,
    pub expire: String,
}

impl From<&SessionToken> for LoginResponseData {
    fn from(token: &SessionToken) -> Self {
        Self {
            token: TokenData {
                id: token.id.to_string(),
                expire: token.expire_display(),
            },
        }
    }
}
