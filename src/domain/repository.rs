#![allow(async_fn_in_trait)]

use std::future::Future;

use futures::future::BoxFuture;

use crate::domain::types::BorrowRecord;
use crate::error::CirculationError;

/// Atomic transaction boundary. `run_in_transaction` begins a transaction,
/// hands the handle to `work`, commits on `Ok` and rolls back on `Err`,
/// propagating the exact failure unchanged. Begin/commit failures surface as
/// [`CirculationError::Internal`].
pub trait UnitOfWork: Send + Sync {
    /// Transaction handle threaded through every storage call.
    type Tx: Send + Sync;

    async fn run_in_transaction<T, F>(&self, work: F) -> Result<T, CirculationError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t Self::Tx) -> BoxFuture<'t, Result<T, CirculationError>> + Send;
}

// The repository methods below are declared as `fn -> impl Future + Send`
// rather than `async fn`: they are awaited inside the boxed transaction
// future, which must prove `Send` for generic repositories. Impls can still
// use `async fn`.

/// Storage for book stock. All operations run inside the caller's transaction.
pub trait InventoryRepository: Send + Sync {
    type Tx: Send + Sync;

    /// Whether the book exists. Takes the book row's exclusive lock, so the
    /// answer stays true for the rest of the transaction.
    fn exists(
        &self,
        tx: &Self::Tx,
        book_id: i32,
    ) -> impl Future<Output = Result<bool, CirculationError>> + Send;

    /// Whether the book has at least one lendable copy. Reads `quantity` under
    /// the row's exclusive lock (`SELECT ... FOR UPDATE`), serializing
    /// concurrent borrow attempts on the same book.
    fn has_stock(
        &self,
        tx: &Self::Tx,
        book_id: i32,
    ) -> impl Future<Output = Result<bool, CirculationError>> + Send;

    /// Consume one copy. The caller must have verified stock within the same
    /// transaction.
    fn decrement_stock(
        &self,
        tx: &Self::Tx,
        book_id: i32,
    ) -> impl Future<Output = Result<(), CirculationError>> + Send;

    /// Release one copy back into stock.
    fn increment_stock(
        &self,
        tx: &Self::Tx,
        book_id: i32,
    ) -> impl Future<Output = Result<(), CirculationError>> + Send;
}

/// Storage for borrow records. All operations run inside the caller's
/// transaction.
pub trait BorrowLedgerRepository: Send + Sync {
    type Tx: Send + Sync;

    /// Whether the record exists and belongs to `user_id`. Takes the record
    /// row's exclusive lock when the record matches, so concurrent returns of
    /// the same record serialize here.
    fn is_owned_by(
        &self,
        tx: &Self::Tx,
        record_id: i32,
        user_id: i32,
    ) -> impl Future<Output = Result<bool, CirculationError>> + Send;

    fn exists(
        &self,
        tx: &Self::Tx,
        record_id: i32,
    ) -> impl Future<Output = Result<bool, CirculationError>> + Send;

    fn is_returned(
        &self,
        tx: &Self::Tx,
        record_id: i32,
    ) -> impl Future<Output = Result<bool, CirculationError>> + Send;

    /// Which book the record refers to.
    fn book_id_of(
        &self,
        tx: &Self::Tx,
        record_id: i32,
    ) -> impl Future<Output = Result<i32, CirculationError>> + Send;

    /// Insert a new record with status `Borrowed` and the borrowing timestamp
    /// set to now. Returns the full record including the assigned id.
    fn create(
        &self,
        tx: &Self::Tx,
        user_id: i32,
        book_id: i32,
    ) -> impl Future<Output = Result<BorrowRecord, CirculationError>> + Send;

    /// Transition the record matching both `record_id` and `user_id` to
    /// `Returned`, setting the returning timestamp. Matching on both keys is a
    /// second guard against acting on another user's record.
    fn complete_return(
        &self,
        tx: &Self::Tx,
        record_id: i32,
        user_id: i32,
    ) -> impl Future<Output = Result<BorrowRecord, CirculationError>> + Send;
}
