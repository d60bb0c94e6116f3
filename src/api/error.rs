//! `TodoError` to HTTP response mapping.

use crate::error::{ErrorCode, TodoError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError | ErrorCode::DepthExceeded => StatusCode::BAD_REQUEST,
        ErrorCode::NotFoundOrUnauthorized => StatusCode::NOT_FOUND,
        ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = status_for(self.code);
        if status.is_server_error() {
            error!(code = ?self.code, "Request failed: {}", self.message);
        }

        let mut body = json!({ "error": self.message, "code": self.code });
        if let Some(field) = self.field {
            body["field"] = json!(field);
        }
        (status, Json(body)).into_response()
    }
}
