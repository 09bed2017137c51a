//! Role-based authorization policy.
//!
//! [`authorize`] is a pure function of the caller, the attempted [`Action`]
//! and the targeted [`Resource`]. The HTTP layer translates requests into
//! these values and the returned [`Decision`] into an error; nothing here
//! knows about axum or the database.
//!
//! Rule precedence:
//!
//! 1. Verbs other than `GET`/`PATCH` on the `me` alias are
//!    [`Denial::MethodNotAllowed`], whoever the caller is.
//! 2. Public operations (registration, catalog and content reads) are allowed.
//! 3. Anything else requires an authenticated caller ([`Denial::Unauthenticated`]).
//! 4. Role and ownership rules ([`Denial::Forbidden`]).

use std::fmt;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Caller identity
// ---------------------------------------------------------------------------

/// An authenticated account as seen by the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub username: String,
    pub role: Role,
    pub is_superuser: bool,
}

impl Principal {
    /// Admin-level access: the `admin` role or the superuser flag.
    pub fn is_admin(&self) -> bool {
        self.is_superuser
            || match self.role {
                Role::Admin => true,
                Role::User | Role::Moderator => false,
            }
    }
}

/// Whoever issued the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(Principal),
}

impl Caller {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(principal) => Some(principal),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.principal().is_some_and(Principal::is_admin)
    }
}

// ---------------------------------------------------------------------------
// Actions and resources
// ---------------------------------------------------------------------------

/// The operation a request attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Replace,
    PartialUpdate,
    Delete,
}

impl Action {
    /// `List` and `Retrieve` never change state.
    pub fn is_read_only(&self) -> bool {
        match self {
            Self::List | Self::Retrieve => true,
            Self::Create | Self::Replace | Self::PartialUpdate | Self::Delete => false,
        }
    }

    /// The HTTP verb conventionally mapped to this action.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::List | Self::Retrieve => "GET",
            Self::Create => "POST",
            Self::Replace => "PUT",
            Self::PartialUpdate => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Category,
    Genre,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Review,
    Comment,
}

/// Which account(s) an account operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTarget {
    /// `/users` itself.
    Collection,
    /// The `me` alias.
    Me,
    /// Any account addressed by username, including the caller's own.
    Named,
}

/// What the request operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Signup and token exchange.
    Registration,
    Catalog(CatalogKind),
    Account(AccountTarget),
    /// A review or comment. `author_id` is `None` for collection operations.
    Content {
        kind: ContentKind,
        author_id: Option<DbId>,
    },
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    MethodNotAllowed,
    Unauthenticated,
    Forbidden,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Convert into a `Result`, mapping each denial to its [`CoreError`].
    pub fn into_result(self, action: Action) -> Result<(), CoreError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(Denial::MethodNotAllowed) => Err(CoreError::MethodNotAllowed(format!(
                "Method \"{action}\" not allowed"
            ))),
            Self::Deny(Denial::Unauthenticated) => Err(CoreError::Unauthorized(
                "Authentication credentials were not provided".into(),
            )),
            Self::Deny(Denial::Forbidden) => Err(CoreError::Forbidden(
                "You do not have permission to perform this action".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Decide whether `caller` may perform `action` on `resource`.
pub fn authorize(caller: &Caller, action: Action, resource: &Resource) -> Decision {
    if let Resource::Account(AccountTarget::Me) = resource {
        if !matches!(action, Action::Retrieve | Action::PartialUpdate) {
            return Decision::Deny(Denial::MethodNotAllowed);
        }
    }

    let principal = match (resource, caller) {
        (Resource::Registration, _) => return Decision::Allow,
        (Resource::Catalog(_) | Resource::Content { .. }, _) if action.is_read_only() => {
            return Decision::Allow
        }
        (_, Caller::Anonymous) => return Decision::Deny(Denial::Unauthenticated),
        (_, Caller::Authenticated(principal)) => principal,
    };

    let allowed = match resource {
        Resource::Registration => true,
        Resource::Catalog(_) => principal.is_admin(),
        Resource::Account(AccountTarget::Me) => true,
        Resource::Account(AccountTarget::Collection | AccountTarget::Named) => {
            principal.is_admin()
        }
        Resource::Content { author_id, .. } => match action {
            Action::List | Action::Retrieve | Action::Create => true,
            Action::Replace | Action::PartialUpdate | Action::Delete => {
                *author_id == Some(principal.user_id)
                    || principal.role.moderates_content()
                    || principal.is_superuser
            }
        },
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(Denial::Forbidden)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
