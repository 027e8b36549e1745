pub mod store;

pub use store::{BuildingStore, InMemoryStore};
