//! Storage boundary of the platform.
//!
//! Persistence is an external collaborator: the engine consumes already
//! fetched snapshots and hands mutations to whatever implements the traits
//! in [`traits`]. The [`MemoryStore`] implementation backs the composition
//! root and the integration tests; a production deployment substitutes its
//! own database-backed implementation behind the same traits.
//!
//! The re-authentication collaborator for destructive admin operations
//! ([`Reauthenticator`], [`PasswordGate`]) also lives here, next to the user
//! records it verifies against.

pub mod error;
pub mod memory;
pub mod reauth;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use reauth::{hash_password, verify_password, PasswordGate, Reauthenticator};
pub use traits::{AssignmentStore, CaseStore, EvidenceStore, OrganizationStore, UserStore};
