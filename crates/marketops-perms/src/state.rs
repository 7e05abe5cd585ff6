//! The access control engine.
//!
//! Maps canonical user names to permission sets. Sets only grow: there is
//! no revoke. Every public operation returns a plain value for every input.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::grant::{GrantCommand, GrantOutcome};
use crate::permission::{canonical_token, canonical_user, Permission};

/// User to permission-set mapping.
///
/// Thread-safe via RwLock. Each mutation touches one user's set under the
/// write lock, so concurrent grants to the same user merge.
#[derive(Debug, Default)]
pub struct AccessControl {
    users: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl AccessControl {
    /// Create an engine with no users.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, BTreeSet<String>>> {
        // Sets of strings cannot be left half-written, so a poisoned lock is safe to reuse.
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, BTreeSet<String>>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ensure a user exists. Idempotent.
    pub fn register_user(&self, name: &str) {
        self.write().entry(canonical_user(name)).or_default();
    }

    /// Add a permission to a user, creating the user if needed.
    ///
    /// The permission is upper-cased before storage. Returns `true` if the
    /// permission was not already held.
    pub fn force_grant(&self, username: &str, permission: &str) -> bool {
        let username = canonical_user(username);
        let permission = canonical_token(permission);

        let inserted = self
            .write()
            .entry(username.clone())
            .or_default()
            .insert(permission.clone());

        debug!(user = %username, %permission, inserted, "granted permission");
        inserted
    }

    /// Apply a parsed grant command.
    pub fn grant(&self, command: &GrantCommand) -> bool {
        self.force_grant(&command.username, &command.permission().to_string())
    }

    /// Parse and apply a textual grant command.
    ///
    /// Malformed commands change nothing.
    pub fn apply_grant(&self, command: &str) -> GrantOutcome {
        match GrantCommand::parse(command) {
            Ok(parsed) => {
                self.grant(&parsed);
                GrantOutcome::Granted(parsed)
            }
            Err(e) => {
                debug!(error = %e, "rejected grant command");
                GrantOutcome::Rejected(e)
            }
        }
    }

    /// Parse and apply a textual grant command, returning the outcome message.
    pub fn execute_grant(&self, command: &str) -> String {
        self.apply_grant(command).to_string()
    }

    /// Check whether a user may perform `action` on `object_id`.
    ///
    /// Holds if the user has `ACTION:OBJECT` or `ACTION:ALL`, or is a
    /// superuser with `ADMIN:ALL`. Unknown users have no access.
    pub fn has_access(&self, username: &str, action: &str, object_id: &str) -> bool {
        let users = self.read();
        let Some(permissions) = users.get(&canonical_user(username)) else {
            return false;
        };

        Permission::candidates(action, object_id)
            .iter()
            .any(|candidate| permissions.contains(candidate))
    }

    /// A user's permissions. Empty for unknown users.
    pub fn permissions(&self, username: &str) -> BTreeSet<String> {
        self.read()
            .get(&canonical_user(username))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the user has been registered or granted anything.
    pub fn contains_user(&self, username: &str) -> bool {
        self.read().contains_key(&canonical_user(username))
    }

    /// Canonical names of every known user, sorted.
    pub fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }
}
