use crate::domain::repository::{BorrowLedgerRepository, InventoryRepository, UnitOfWork};
use crate::domain::types::BorrowRecord;
use crate::error::CirculationError;

// ── BorrowBook ───────────────────────────────────────────────────────────────

pub struct BorrowBookUseCase<
    U: UnitOfWork,
    I: InventoryRepository<Tx = U::Tx>,
    L: BorrowLedgerRepository<Tx = U::Tx>,
> {
    pub uow: U,
    pub inventory: I,
    pub ledger: L,
}

impl<U, I, L> BorrowBookUseCase<U, I, L>
where
    U: UnitOfWork,
    I: InventoryRepository<Tx = U::Tx> + Clone + 'static,
    L: BorrowLedgerRepository<Tx = U::Tx> + Clone + 'static,
{
    /// Record a borrow: verify the book exists and has stock, insert the
    /// ledger record, consume one copy. All inside one transaction; any
    /// failing step rolls the whole sequence back.
    pub async fn execute(
        &self,
        user_id: i32,
        book_id: i32,
    ) -> Result<BorrowRecord, CirculationError> {
        // Owned clones move into the transaction future; the `for<'t>` closure
        // cannot borrow `self`.
        let inventory = self.inventory.clone();
        let ledger = self.ledger.clone();
        self.uow
            .run_in_transaction(move |tx| {
                Box::pin(async move {
                    if !inventory.exists(tx, book_id).await? {
                        return Err(CirculationError::BookNotFound);
                    }
                    if !inventory.has_stock(tx, book_id).await? {
                        return Err(CirculationError::EmptyStock);
                    }
                    let record = ledger.create(tx, user_id, book_id).await?;
                    inventory.decrement_stock(tx, book_id).await?;
                    Ok(record)
                })
            })
            .await
    }
}

// ── ReturnBook ───────────────────────────────────────────────────────────────

pub struct ReturnBookUseCase<
    U: UnitOfWork,
    I: InventoryRepository<Tx = U::Tx>,
    L: BorrowLedgerRepository<Tx = U::Tx>,
> {
    pub uow: U,
    pub inventory: I,
    pub ledger: L,
}

impl<U, I, L> ReturnBookUseCase<U, I, L>
where
    U: UnitOfWork,
    I: InventoryRepository<Tx = U::Tx> + Clone + 'static,
    L: BorrowLedgerRepository<Tx = U::Tx> + Clone + 'static,
{
    /// Complete a return: verify ownership, existence, and that the record is
    /// still open, transition it to returned, release the copy back into
    /// stock. Ownership is checked before existence, so a caller cannot learn
    /// from the error kind whether someone else's record exists.
    pub async fn execute(
        &self,
        user_id: i32,
        record_id: i32,
    ) -> Result<BorrowRecord, CirculationError> {
        let inventory = self.inventory.clone();
        let ledger = self.ledger.clone();
        self.uow
            .run_in_transaction(move |tx| {
                Box::pin(async move {
                    if !ledger.is_owned_by(tx, record_id, user_id).await? {
                        return Err(CirculationError::ReturnUnauthorized);
                    }
                    if !ledger.exists(tx, record_id).await? {
                        return Err(CirculationError::BorrowNotFound);
                    }
                    if ledger.is_returned(tx, record_id).await? {
                        return Err(CirculationError::AlreadyReturned);
                    }
                    let record = ledger.complete_return(tx, record_id, user_id).await?;
                    let book_id = ledger.book_id_of(tx, record_id).await?;
                    inventory.increment_stock(tx, book_id).await?;
                    Ok(record)
                })
            })
            .await
    }
}
