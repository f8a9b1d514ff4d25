use std::cell::{Cell, RefCell};

use crate::{
    error::AppResult,
    model::collection::Collection,
    persisters::storage::Storage,
};

/// Keeps the collection in memory only. Counts saves so callers can check
/// whether an operation actually wrote anything.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    collection: RefCell<Collection>,
    saves: Cell<usize>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(collection: Collection) -> Self {
        InMemoryStorage {
            collection: RefCell::new(collection),
            saves: Cell::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn snapshot(&self) -> Collection {
        self.collection.borrow().clone()
    }
}

impl Storage for InMemoryStorage {
    fn load(&self) -> AppResult<Collection> {
        Ok(self.snapshot())
    }

    fn save(&self, collection: &Collection) -> AppResult<()> {
        *self.collection.borrow_mut() = collection.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
