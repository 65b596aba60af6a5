use anyhow::Context as _;
use chrono::Utc;
use futures::future::BoxFuture;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QuerySelect, TransactionError, TransactionTrait, sea_query::Expr,
};

use circulation_schema::{books, borrows};

use crate::domain::repository::{BorrowLedgerRepository, InventoryRepository, UnitOfWork};
use crate::domain::types::{BorrowRecord, BorrowStatus};
use crate::error::CirculationError;

// ── Unit of work ─────────────────────────────────────────────────────────────

/// [`UnitOfWork`] backed by a sea-orm Postgres connection.
#[derive(Clone)]
pub struct SeaOrmUnitOfWork {
    pub db: DatabaseConnection,
}

impl UnitOfWork for SeaOrmUnitOfWork {
    type Tx = DatabaseTransaction;

    async fn run_in_transaction<T, F>(&self, work: F) -> Result<T, CirculationError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<T, CirculationError>>
            + Send,
    {
        self.db
            .transaction::<_, T, CirculationError>(work)
            .await
            .map_err(|err| match err {
                // Begin or commit failed outside the workflow's own steps.
                TransactionError::Connection(e) => {
                    CirculationError::Internal(anyhow::Error::new(e).context("run transaction"))
                }
                // The workflow failed; sea-orm has already rolled back.
                TransactionError::Transaction(e) => e,
            })
    }
}

// ── Inventory repository ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Default)]
pub struct DbInventoryRepository;

impl InventoryRepository for DbInventoryRepository {
    type Tx = DatabaseTransaction;

    async fn exists(
        &self,
        tx: &DatabaseTransaction,
        book_id: i32,
    ) -> Result<bool, CirculationError> {
        let model = books::Entity::find_by_id(book_id)
            .lock_exclusive()
            .one(tx)
            .await
            .context("check book exists")?;
        Ok(model.is_some())
    }

    async fn has_stock(
        &self,
        tx: &DatabaseTransaction,
        book_id: i32,
    ) -> Result<bool, CirculationError> {
        let model = books::Entity::find_by_id(book_id)
            .lock_exclusive()
            .one(tx)
            .await
            .context("read book stock for update")?;
        Ok(model.is_some_and(|book| book.quantity > 0))
    }

    async fn decrement_stock(
        &self,
        tx: &DatabaseTransaction,
        book_id: i32,
    ) -> Result<(), CirculationError> {
        let result = books::Entity::update_many()
            .filter(books::Column::Id.eq(book_id))
            .col_expr(
                books::Column::Quantity,
                Expr::col(books::Column::Quantity).sub(1),
            )
            .col_expr(books::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(tx)
            .await
            .context("decrement book stock")?;
        if result.rows_affected == 0 {
            return Err(CirculationError::Internal(anyhow::anyhow!(
                "book {book_id} missing during stock decrement"
            )));
        }
        Ok(())
    }

    async fn increment_stock(
        &self,
        tx: &DatabaseTransaction,
        book_id: i32,
    ) -> Result<(), CirculationError> {
        let result = books::Entity::update_many()
            .filter(books::Column::Id.eq(book_id))
            .col_expr(
                books::Column::Quantity,
                Expr::col(books::Column::Quantity).add(1),
            )
            .col_expr(books::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(tx)
            .await
            .context("increment book stock")?;
        if result.rows_affected == 0 {
            return Err(CirculationError::Internal(anyhow::anyhow!(
                "book {book_id} missing during stock increment"
            )));
        }
        Ok(())
    }
}

// ── Borrow ledger repository ─────────────────────────────────────────────────

#[derive(Clone, Copy, Default)]
pub struct DbBorrowLedgerRepository;

impl BorrowLedgerRepository for DbBorrowLedgerRepository {
    type Tx = DatabaseTransaction;

    async fn is_owned_by(
        &self,
        tx: &DatabaseTransaction,
        record_id: i32,
        user_id: i32,
    ) -> Result<bool, CirculationError> {
        let model = borrows::Entity::find_by_id(record_id)
            .lock_exclusive()
            .one(tx)
            .await
            .context("read borrow record owner")?;
        Ok(model.is_some_and(|record| record.user_id == user_id))
    }

    async fn exists(
        &self,
        tx: &DatabaseTransaction,
        record_id: i32,
    ) -> Result<bool, CirculationError> {
        let model = borrows::Entity::find_by_id(record_id)
            .one(tx)
            .await
            .context("check borrow record exists")?;
        Ok(model.is_some())
    }

    async fn is_returned(
        &self,
        tx: &DatabaseTransaction,
        record_id: i32,
    ) -> Result<bool, CirculationError> {
        let model = borrows::Entity::find_by_id(record_id)
            .one(tx)
            .await
            .context("read borrow record status")?;
        Ok(model.is_some_and(|record| record.status == BorrowStatus::Returned.as_str()))
    }

    async fn book_id_of(
        &self,
        tx: &DatabaseTransaction,
        record_id: i32,
    ) -> Result<i32, CirculationError> {
        let model = borrows::Entity::find_by_id(record_id)
            .one(tx)
            .await
            .context("read borrow record book id")?;
        model
            .map(|record| record.book_id)
            .ok_or(CirculationError::BorrowNotFound)
    }

    async fn create(
        &self,
        tx: &DatabaseTransaction,
        user_id: i32,
        book_id: i32,
    ) -> Result<BorrowRecord, CirculationError> {
        let now = Utc::now();
        let model = borrows::ActiveModel {
            user_id: Set(user_id),
            book_id: Set(book_id),
            status: Set(BorrowStatus::Borrowed.as_str().to_owned()),
            borrowed_at: Set(now),
            returned_at: Set(None),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(tx)
        .await
        .context("create borrow record")?;
        record_from_model(model)
    }

    async fn complete_return(
        &self,
        tx: &DatabaseTransaction,
        record_id: i32,
        user_id: i32,
    ) -> Result<BorrowRecord, CirculationError> {
        let now = Utc::now();
        let result = borrows::Entity::update_many()
            .filter(borrows::Column::Id.eq(record_id))
            .filter(borrows::Column::UserId.eq(user_id))
            .col_expr(
                borrows::Column::Status,
                Expr::value(BorrowStatus::Returned.as_str()),
            )
            .col_expr(borrows::Column::ReturnedAt, Expr::value(now))
            .col_expr(borrows::Column::UpdatedAt, Expr::value(now))
            .exec(tx)
            .await
            .context("complete borrow return")?;
        // The id/user guard means zero rows only when the record stopped
        // belonging to this user after the ownership check.
        if result.rows_affected == 0 {
            return Err(CirculationError::ReturnUnauthorized);
        }
        let model = borrows::Entity::find_by_id(record_id)
            .one(tx)
            .await
            .context("reload returned borrow record")?
            .ok_or_else(|| {
                CirculationError::Internal(anyhow::anyhow!(
                    "borrow record {record_id} missing after return update"
                ))
            })?;
        record_from_model(model)
    }
}

fn record_from_model(model: borrows::Model) -> Result<BorrowRecord, CirculationError> {
    let status = BorrowStatus::parse(&model.status).ok_or_else(|| {
        CirculationError::Internal(anyhow::anyhow!(
            "unknown borrow status {:?} on record {}",
            model.status,
            model.id
        ))
    })?;
    Ok(BorrowRecord {
        id: model.id,
        user_id: model.user_id,
        book_id: model.book_id,
        status,
        borrowed_at: model.borrowed_at,
        returned_at: model.returned_at,
    })
}
