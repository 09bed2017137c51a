//! Self-profile resolution for the `me` alias.

use crate::accounts::AccountRef;
use crate::policy::{AccountTarget, Principal};
use crate::roles::Role;
use crate::types::DbId;

/// The account an account-path operation resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTarget<'a> {
    /// The caller's own record, reached through `me`.
    Own { user_id: DbId },
    /// Any account looked up by username.
    ByUsername(&'a str),
}

/// Whether an update arrives through the self-service alias or the
/// administrative endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateScope {
    SelfService,
    Administrative,
}

impl AccountRef {
    pub fn target(&self) -> AccountTarget {
        match self {
            Self::Me => AccountTarget::Me,
            Self::Username(_) => AccountTarget::Named,
        }
    }

    pub fn scope(&self) -> UpdateScope {
        match self {
            Self::Me => UpdateScope::SelfService,
            Self::Username(_) => UpdateScope::Administrative,
        }
    }
}

/// Resolve `account` relative to the authenticated caller.
pub fn resolve_target<'a>(caller: &Principal, account: &'a AccountRef) -> ProfileTarget<'a> {
    match account {
        AccountRef::Me => ProfileTarget::Own {
            user_id: caller.user_id,
        },
        AccountRef::Username(username) => ProfileTarget::ByUsername(username),
    }
}

/// The role value an update may actually write.
///
/// A plain `user` editing their own profile cannot change their role: any
/// requested role is replaced with `user` instead of being rejected.
/// Administrative updates pass the request through unchanged.
pub fn effective_role_change(
    scope: UpdateScope,
    caller_role: Role,
    requested: Option<Role>,
) -> Option<Role> {
    match (scope, caller_role) {
        (UpdateScope::SelfService, Role::User) => requested.map(|_| Role::User),
        (UpdateScope::SelfService, Role::Moderator | Role::Admin) => requested,
        (UpdateScope::Administrative, _) => requested,
    }
}
