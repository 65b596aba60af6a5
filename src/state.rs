use sea_orm::DatabaseConnection;

use crate::infra::db::{DbBorrowLedgerRepository, DbInventoryRepository, SeaOrmUnitOfWork};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn unit_of_work(&self) -> SeaOrmUnitOfWork {
        SeaOrmUnitOfWork {
            db: self.db.clone(),
        }
    }

    pub fn inventory_repo(&self) -> DbInventoryRepository {
        DbInventoryRepository
    }

    pub fn ledger_repo(&self) -> DbBorrowLedgerRepository {
        DbBorrowLedgerRepository
    }
}
