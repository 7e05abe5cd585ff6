//! # MarketOps Permissions
//!
//! The access control engine consulted before every catalog write.
//!
//! ## Overview
//!
//! Users own sets of `ACTION:TARGET` permission strings. Permissions are
//! added either directly ([`AccessControl::force_grant`], used for
//! bootstrap) or through a one-line grant command:
//!
//! ```text
//! GRANT <ACTION> ON <TARGET> TO <USER>
//! ```
//!
//! ## Key Concepts
//!
//! - **Canonical form**: user names lower-case, actions and targets upper-case.
//!   Storage and lookup always go through the same canonicalization.
//! - **Wildcard target**: `ALL` matches every object for its action.
//! - **Superuser**: `ADMIN:ALL` authorizes every action on every object.
//!   `ADMIN` on a single target is an ordinary action there.
//! - **Monotone**: permission sets only grow; there is no revoke.
//!
//! ## Usage
//!
//! ```rust
//! use marketops_perms::AccessControl;
//!
//! let engine = AccessControl::new();
//! engine.force_grant("admin_user", "ADMIN:ALL");
//!
//! let message = engine.execute_grant("GRANT READ ON ALL TO alice");
//! assert!(message.starts_with("SUCCESS"));
//!
//! assert!(engine.has_access("alice", "read", "gold"));
//! assert!(!engine.has_access("alice", "write", "gold"));
//! assert!(engine.has_access("admin_user", "delete", "gold"));
//! ```

pub mod error;
pub mod grant;
pub mod permission;
pub mod state;

pub use error::{PermsError, Result};
pub use grant::{GrantCommand, GrantOutcome};
pub use permission::{canonical_token, canonical_user, Permission, ADMIN, SEPARATOR, WILDCARD};
pub use state::AccessControl;
