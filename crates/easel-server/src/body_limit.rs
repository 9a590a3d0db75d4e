//! Request body size limit with a JSON rejection

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use easel_core::ErrorEnvelope;
use http::StatusCode;

/// Buffer the request body, rejecting anything over `limit` bytes with a
/// `413` error envelope
pub async fn body_limit_middleware(limit: usize, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let Ok(bytes) = axum::body::to_bytes(body, limit).await else {
        tracing::warn!(limit, path = %parts.uri.path(), "request body rejected");
        return too_large(limit);
    };

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn too_large(limit: usize) -> Response {
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        axum::Json(ErrorEnvelope {
            ok: false,
            error: format!("Request body exceeds {limit} bytes."),
            needs_verification: None,
        }),
    )
        .into_response()
}
