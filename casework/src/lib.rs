//! Case, evidence and assignment mutation services.
//!
//! These are the operations surrounding the decision core: every one of
//! them re-validates authorization server-side with the `authz` predicates
//! (the UI's own checks are advisory only), applies the business rules that
//! sit outside authorization (quotas, the terminal-state evidence lock,
//! legacy-assignment immutability), and records an audit entry.

pub mod assignments;
pub mod cases;
pub mod error;
pub mod evidence;

pub use assignments::AssignmentService;
pub use cases::{CaseService, CaseUpdate, NewCase};
pub use error::{CaseworkError, Result};
pub use evidence::{EvidenceService, EvidenceUpdate, NewEvidence};
