use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Circulation service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum CirculationError {
    #[error("book not found")]
    BookNotFound,
    #[error("book out of stock")]
    EmptyStock,
    #[error("return not authorized")]
    ReturnUnauthorized,
    #[error("borrow record not found")]
    BorrowNotFound,
    #[error("borrow record already returned")]
    AlreadyReturned,
    #[error("invalid request")]
    InvalidRequest,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CirculationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BookNotFound => "BOOK_NOT_FOUND",
            Self::EmptyStock => "EMPTY_STOCK",
            Self::ReturnUnauthorized => "RETURN_UNAUTHORIZED",
            Self::BorrowNotFound => "BORROW_NOT_FOUND",
            Self::AlreadyReturned => "ALREADY_RETURNED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for CirculationError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BookNotFound | Self::BorrowNotFound => StatusCode::NOT_FOUND,
            Self::EmptyStock | Self::AlreadyReturned => StatusCode::CONFLICT,
            Self::ReturnUnauthorized => StatusCode::FORBIDDEN,
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only internal errors carry an anyhow chain worth logging; 4xx are
        // expected traffic and TraceLayer already records those.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
