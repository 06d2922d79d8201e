//! Domain records for the investigation platform.
//!
//! Everything here is a plain serde-serializable snapshot: the authorization
//! core and the mutation services receive these records fully fetched and
//! treat them as immutable for the duration of a single decision.

pub mod actor;
pub mod assignment;
pub mod case;
pub mod error;
pub mod evidence;
pub mod organization;
pub mod role;
pub mod user;

pub use actor::Actor;
pub use assignment::{Assignment, CaseAssignment};
pub use case::{Case, CasePriority, CaseStatus};
pub use error::{EntityError, Result};
pub use evidence::{Evidence, EvidenceKind};
pub use organization::Organization;
pub use role::Role;
pub use user::User;
