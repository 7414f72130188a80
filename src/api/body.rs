use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};

use crate::models::RequestBody;

/// Extracts the request body as a [`RequestBody`].
///
/// Unlike `axum::Json`, this ignores the content type and never rejects a
/// malformed payload, so every operation answers with its own validation
/// message instead of a framework error.
pub struct JsonBody(pub RequestBody);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(RequestBody::from_slice(&bytes)))
    }
}
