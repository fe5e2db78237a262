//! Record ownership rule.
//!
//! To-do items and comments are visible to, and mutable by, their owner
//! and superusers only. Callers that fail the rule are answered exactly as
//! if the record did not exist.

use crate::types::DbId;

/// Whether `user_id` may read or modify a record owned by `owner_id`.
pub fn can_access(owner_id: DbId, user_id: DbId, is_superuser: bool) -> bool {
    is_superuser || owner_id == user_id
}

/// Owner filter for list queries: `None` means every owner.
pub fn visible_owner(user_id: DbId, is_superuser: bool) -> Option<DbId> {
    if is_superuser {
        None
    } else {
        Some(user_id)
    }
}
