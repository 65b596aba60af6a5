use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::types::BorrowRecord;
use crate::error::CirculationError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::usecase::borrow::{BorrowBookUseCase, ReturnBookUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BorrowRecordResponse {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub status: &'static str,
    #[serde(serialize_with = "crate::serde::to_rfc3339_ms")]
    pub borrowed_at: chrono::DateTime<chrono::Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serde::to_rfc3339_ms_opt"
    )]
    pub returned_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<BorrowRecord> for BorrowRecordResponse {
    fn from(record: BorrowRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            book_id: record.book_id,
            status: record.status.as_str(),
            borrowed_at: record.borrowed_at,
            returned_at: record.returned_at,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BorrowRequest {
    pub book_id: i32,
}

#[derive(Deserialize)]
pub struct ReturnRequest {
    pub record_id: i32,
}

// ── POST /borrows ────────────────────────────────────────────────────────────

pub async fn borrow_book(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<BorrowRequest>,
) -> Result<(StatusCode, Json<BorrowRecordResponse>), CirculationError> {
    if body.book_id <= 0 {
        return Err(CirculationError::InvalidRequest);
    }
    let usecase = BorrowBookUseCase {
        uow: state.unit_of_work(),
        inventory: state.inventory_repo(),
        ledger: state.ledger_repo(),
    };
    let record = usecase.execute(identity.user_id, body.book_id).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

// ── PATCH /borrows ───────────────────────────────────────────────────────────

pub async fn return_book(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ReturnRequest>,
) -> Result<Json<BorrowRecordResponse>, CirculationError> {
    if body.record_id <= 0 {
        return Err(CirculationError::InvalidRequest);
    }
    let usecase = ReturnBookUseCase {
        uow: state.unit_of_work(),
        inventory: state.inventory_repo(),
        ledger: state.ledger_repo(),
    };
    let record = usecase.execute(identity.user_id, body.record_id).await?;
    Ok(Json(record.into()))
}
