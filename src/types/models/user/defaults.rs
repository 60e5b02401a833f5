use std::collections::HashSet;

use super::{role::Role, user_status::UserStatus};

pub fn default_status() -> UserStatus {
    UserStatus::Active
}

pub fn default_roles() -> HashSet<Role> {
    HashSet::from([Role::Mentee])
}
