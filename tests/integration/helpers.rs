use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::future::BoxFuture;

use circulation::domain::repository::{BorrowLedgerRepository, InventoryRepository, UnitOfWork};
use circulation::domain::types::{BorrowRecord, BorrowStatus};
use circulation::error::CirculationError;
use circulation::usecase::borrow::{BorrowBookUseCase, ReturnBookUseCase};

// ── InMemoryLibrary ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct LibraryState {
    books: HashMap<i32, i32>,
    records: HashMap<i32, BorrowRecord>,
    next_record_id: i32,
}

/// In-memory stand-in for the Postgres-backed store, implementing all three
/// storage traits at once. One tokio mutex plays the row lock: it is held for
/// the whole transaction, so concurrent workflows serialize the way they do
/// on the real row locks. State is snapshotted at begin and restored on
/// failure, which makes rollback observable from tests.
#[derive(Clone, Default)]
pub struct InMemoryLibrary {
    state: Arc<Mutex<LibraryState>>,
    tx_gate: Arc<tokio::sync::Mutex<()>>,
    fail_decrement: bool,
    fail_increment: bool,
}

impl InMemoryLibrary {
    /// Seed the inventory with `(book_id, quantity)` pairs.
    pub fn with_books(books: &[(i32, i32)]) -> Self {
        let library = Self::default();
        {
            let mut state = library.state.lock().unwrap();
            for (book_id, quantity) in books {
                state.books.insert(*book_id, *quantity);
            }
        }
        library
    }

    /// Make stock decrements fail, after the ledger insert already succeeded.
    pub fn failing_decrement(mut self) -> Self {
        self.fail_decrement = true;
        self
    }

    /// Make stock increments fail, after the record already transitioned.
    pub fn failing_increment(mut self) -> Self {
        self.fail_increment = true;
        self
    }

    /// Insert a borrow record directly, bypassing the workflow. Returns its id.
    pub fn seed_record(&self, user_id: i32, book_id: i32, status: BorrowStatus) -> i32 {
        let mut state = self.state.lock().unwrap();
        state.next_record_id += 1;
        let id = state.next_record_id;
        let returned_at = matches!(status, BorrowStatus::Returned).then(Utc::now);
        state.records.insert(
            id,
            BorrowRecord {
                id,
                user_id,
                book_id,
                status,
                borrowed_at: Utc::now(),
                returned_at,
            },
        );
        id
    }

    pub fn quantity_of(&self, book_id: i32) -> i32 {
        self.state.lock().unwrap().books[&book_id]
    }

    pub fn record(&self, record_id: i32) -> Option<BorrowRecord> {
        self.state.lock().unwrap().records.get(&record_id).cloned()
    }

    pub fn record_count(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }
}

impl UnitOfWork for InMemoryLibrary {
    type Tx = ();

    async fn run_in_transaction<T, F>(&self, work: F) -> Result<T, CirculationError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t ()) -> BoxFuture<'t, Result<T, CirculationError>> + Send,
    {
        let _gate = self.tx_gate.lock().await;
        let snapshot = self.state.lock().unwrap().clone();
        let result = work(&()).await;
        if result.is_err() {
            *self.state.lock().unwrap() = snapshot;
        }
        result
    }
}

impl InventoryRepository for InMemoryLibrary {
    type Tx = ();

    async fn exists(&self, _tx: &(), book_id: i32) -> Result<bool, CirculationError> {
        Ok(self.state.lock().unwrap().books.contains_key(&book_id))
    }

    async fn has_stock(&self, _tx: &(), book_id: i32) -> Result<bool, CirculationError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .books
            .get(&book_id)
            .is_some_and(|quantity| *quantity > 0))
    }

    async fn decrement_stock(&self, _tx: &(), book_id: i32) -> Result<(), CirculationError> {
        if self.fail_decrement {
            return Err(CirculationError::Internal(anyhow::anyhow!(
                "injected decrement failure"
            )));
        }
        let mut state = self.state.lock().unwrap();
        let quantity = state.books.get_mut(&book_id).expect("book seeded");
        *quantity -= 1;
        Ok(())
    }

    async fn increment_stock(&self, _tx: &(), book_id: i32) -> Result<(), CirculationError> {
        if self.fail_increment {
            return Err(CirculationError::Internal(anyhow::anyhow!(
                "injected increment failure"
            )));
        }
        let mut state = self.state.lock().unwrap();
        let quantity = state.books.get_mut(&book_id).expect("book seeded");
        *quantity += 1;
        Ok(())
    }
}

impl BorrowLedgerRepository for InMemoryLibrary {
    type Tx = ();

    async fn is_owned_by(
        &self,
        _tx: &(),
        record_id: i32,
        user_id: i32,
    ) -> Result<bool, CirculationError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .records
            .get(&record_id)
            .is_some_and(|record| record.user_id == user_id))
    }

    async fn exists(&self, _tx: &(), record_id: i32) -> Result<bool, CirculationError> {
        Ok(self.state.lock().unwrap().records.contains_key(&record_id))
    }

    async fn is_returned(&self, _tx: &(), record_id: i32) -> Result<bool, CirculationError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .records
            .get(&record_id)
            .is_some_and(|record| record.status == BorrowStatus::Returned))
    }

    async fn book_id_of(&self, _tx: &(), record_id: i32) -> Result<i32, CirculationError> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(&record_id)
            .map(|record| record.book_id)
            .ok_or(CirculationError::BorrowNotFound)
    }

    async fn create(
        &self,
        _tx: &(),
        user_id: i32,
        book_id: i32,
    ) -> Result<BorrowRecord, CirculationError> {
        let mut state = self.state.lock().unwrap();
        state.next_record_id += 1;
        let record = BorrowRecord {
            id: state.next_record_id,
            user_id,
            book_id,
            status: BorrowStatus::Borrowed,
            borrowed_at: Utc::now(),
            returned_at: None,
        };
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn complete_return(
        &self,
        _tx: &(),
        record_id: i32,
        user_id: i32,
    ) -> Result<BorrowRecord, CirculationError> {
        let mut state = self.state.lock().unwrap();
        let record = state
            .records
            .get_mut(&record_id)
            .filter(|record| record.user_id == user_id)
            .ok_or(CirculationError::ReturnUnauthorized)?;
        record.status = BorrowStatus::Returned;
        record.returned_at = Some(Utc::now());
        Ok(record.clone())
    }
}

// ── Usecase constructors ─────────────────────────────────────────────────────

pub fn borrow_usecase(
    store: &InMemoryLibrary,
) -> BorrowBookUseCase<InMemoryLibrary, InMemoryLibrary, InMemoryLibrary> {
    BorrowBookUseCase {
        uow: store.clone(),
        inventory: store.clone(),
        ledger: store.clone(),
    }
}

pub fn return_usecase(
    store: &InMemoryLibrary,
) -> ReturnBookUseCase<InMemoryLibrary, InMemoryLibrary, InMemoryLibrary> {
    ReturnBookUseCase {
        uow: store.clone(),
        inventory: store.clone(),
        ledger: store.clone(),
    }
}
