use chrono::{DateTime, Utc};

/// Lifecycle state of a borrow record. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

impl BorrowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Borrowed => "borrowed",
            Self::Returned => "returned",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "borrowed" => Some(Self::Borrowed),
            "returned" => Some(Self::Returned),
            _ => None,
        }
    }
}

/// Snapshot of one borrow record as seen by callers of the workflow.
///
/// `returned_at` is set exactly when `status` is [`BorrowStatus::Returned`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub status: BorrowStatus,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}
