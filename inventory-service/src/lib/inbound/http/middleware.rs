use auth::TokenId;
use axum::async_trait;
use axum::body::Body;
use axum::body::Bytes;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use axum::Form;
use axum::Json;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::session::errors::SessionError;
use crate::session::models::Credentials;

/// Upper bound on a request body buffered for stale-token re-verification.
const MAX_REVERIFY_BODY_BYTES: usize = 64 * 1024;

/// Username/password read from a JSON or form-encoded body.
///
/// A present but unsupported content type is a 400; anything else that goes
/// wrong, a missing Content-Type included, is a 401.
pub struct CredentialsBody(pub Credentials);

#[async_trait]
impl<S> FromRequest<S> for CredentialsBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Some(content_type) = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
        else {
            tracing::warn!("Credentials sent without a Content-Type");
            return Err(ApiError::Unauthorized);
        };

        let credentials = if content_type.starts_with("application/json") {
            Json::<Credentials>::from_request(req, state)
                .await
                .map(|Json(credentials)| credentials)
                .map_err(|e| {
                    tracing::warn!(error = %e, "Malformed JSON credentials");
                    ApiError::Unauthorized
                })?
        } else if content_type.contains("form") {
            Form::<Credentials>::from_request(req, state)
                .await
                .map(|Form(credentials)| credentials)
                .map_err(|e| {
                    tracing::warn!(error = %e, "Malformed form credentials");
                    ApiError::Unauthorized
                })?
        } else {
            return Err(ApiError::BadRequest("Unsupported Content-Type".to_string()));
        };

        Ok(Self(credentials))
    }
}

/// Middleware that resolves the bearer token to an account and adds an
/// `AuthenticatedSession` to request extensions.
///
/// A stale token is accepted only if the body carries the owner's
/// credentials; the body is buffered and handed on unchanged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(req.headers())?;

    let session = match state.session_service.authenticate(&token, None).await {
        Ok(session) => session,
        Err(SessionError::ReverificationRequired) => {
            let (parts, body) = req.into_parts();
            let bytes = axum::body::to_bytes(body, MAX_REVERIFY_BODY_BYTES)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "Unreadable body on stale token request");
                    ApiError::Unauthorized
                })?;

            let credentials = credentials_from_bytes(&parts.headers, bytes.clone(), &state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

            let session = state
                .session_service
                .authenticate(&token, Some(&credentials))
                .await?;

            req = Request::from_parts(parts, Body::from(bytes));
            session
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(username = %session.username, "Request authenticated");
    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

/// Middleware that only checks the bearer token exists and is not dead,
/// adding a `PresentedToken` to request extensions.
pub async fn authenticate_without_account(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(req.headers())?;

    let presented = state
        .session_service
        .authenticate_without_account(&token)
        .await?;

    req.extensions_mut().insert(presented);

    Ok(next.run(req).await)
}

async fn credentials_from_bytes(
    headers: &HeaderMap,
    bytes: Bytes,
    state: &AppState,
) -> Result<Credentials, ApiError> {
    let mut probe = Request::new(Body::from(bytes));
    *probe.method_mut() = Method::POST;
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        probe
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }

    CredentialsBody::from_request(probe, state)
        .await
        .map(|CredentialsBody(credentials)| credentials)
}

fn extract_token_from_header(headers: &HeaderMap) -> Result<TokenId, ApiError> {
    let auth_header = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        tracing::debug!("Missing Authorization header");
        ApiError::Unauthorized
    })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::warn!("Authorization header is not valid ASCII");
        ApiError::Unauthorized
    })?;

    let raw = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Authorization header is not a bearer token");
        ApiError::Unauthorized
    })?;

    TokenId::parse(raw).map_err(|e| {
        tracing::warn!(error = %e, "Malformed bearer token");
        ApiError::Unauthorized
    })
}
