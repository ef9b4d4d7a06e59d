//! Repository layer for local entity state
//!
//! Local mutations run as commands against a `Repository`, so the same
//! logic works with the in-memory copy used today or a real store later.
//! `save` replaces a record with the same id in place, or appends it.

use super::models::*;

/// Any record addressable by a string id
pub trait Entity: Clone {
    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_entity!(
    User,
    Project,
    Event,
    Task,
    Meeting,
    FileMetadata,
    Folder,
    BudgetRequest,
);

/// Storage capability required by local mutation commands
pub trait Repository<T: Entity> {
    /// Get a record by id; absence is not an error
    fn get(&self, id: &str) -> Option<T>;

    /// Insert or replace a record
    fn save(&mut self, entity: T);

    /// All records in insertion order
    fn list(&self) -> Vec<T>;
}

/// Repository over a local copy of a dataset collection
#[derive(Debug, Clone)]
pub struct InMemoryRepository<T> {
    records: Vec<T>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow the records without cloning
    pub fn records(&self) -> &[T] {
        &self.records
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn get(&self, id: &str) -> Option<T> {
        self.records.iter().find(|r| r.id() == id).cloned()
    }

    fn save(&mut self, entity: T) {
        match self.records.iter_mut().find(|r| r.id() == entity.id()) {
            Some(slot) => {
                tracing::debug!("Replaced record: {}", entity.id());
                *slot = entity;
            }
            None => {
                tracing::debug!("Appended record: {}", entity.id());
                self.records.push(entity);
            }
        }
    }

    fn list(&self) -> Vec<T> {
        self.records.clone()
    }
}
