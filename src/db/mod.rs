//! MongoDB access layer.

pub mod mongo;
pub mod schemas;
pub mod stores;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection};
pub use stores::MigrationDb;
