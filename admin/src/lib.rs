//! Account and tenant administration.
//!
//! User and organization management carry the strictest rules on the
//! platform: role handling is asymmetric between creation and edit, nobody
//! touches a peer or higher role, and the hard-delete paths demand a fresh
//! password check on top of authorization.

pub mod error;
pub mod organizations;
pub mod users;

pub use error::{AdminError, Result};
pub use organizations::{NewOrganization, OrganizationService, OrganizationUpdate};
pub use users::{NewUser, UserService, UserUpdate};
