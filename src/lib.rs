//! Reconciliation and statistics engine for staged real-estate sale
//! contracts.
//!
//! Tracks, per sold unit, a four-milestone payment plan (preliminary
//! contract, Act 14, Act 15, Act 16) against a ledger of received payments:
//! how much has been paid, how much is owed, which milestones are overdue
//! and by how much, and how a whole building's collection performs.
//!
//! The engine computes over fully-loaded in-memory graphs; persistence is a
//! collaborator behind [`repository::BuildingStore`], and every operation is
//! synchronous. HTTP, auth and import/export surfaces live in the embedding
//! application.

pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod schemas;
pub mod services;

pub use config::CoreConfig;
pub use domain::{Building, Milestone, Payment, PaymentPlan, Unit};
pub use error::CoreError;
pub use repository::{BuildingStore, InMemoryStore};
pub use services::workspace::WorkspaceSelector;
