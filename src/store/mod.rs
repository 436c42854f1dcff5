//! Datastore module - published-image persistence behind the `FeedStore` trait

pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use traits::{FeedStore, NewPublishedImage, PublishedImage};
