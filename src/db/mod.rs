// src/db/mod.rs
pub mod board;
pub mod models;
pub mod mongodb;
pub mod storage;

pub use board::{split_guest_names, DayStore, TableSummary, DEFAULT_KEY_PREFIX};
pub use models::{
    is_known_table, Day, DaySnapshot, Field, Reservation, TableState, UnknownDay, UnknownField,
    STATUS_CONFIRMED, STATUS_PENDING, TABLES,
};
pub use mongodb::MongoStorage;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageResult};
