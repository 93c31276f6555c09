//!
//! Core of the org rights manager
//!
//! Shared types for managing which rights an org has enabled, plus the
//! pure right-set reconciliation the vCloud client builds on.
#![deny(missing_docs)]

pub use error::{ObjectKind, Result, RightsError};
pub use rights::{OrgRightAssignment, OrgRightsDocument, Right};
pub use session::{ServerVersion, SessionContext};

pub mod csv_bridge;
pub mod error;
pub mod logging;
pub mod project;
pub mod reconcile;
pub mod rights;
pub mod session;
