//! Role-based access control.
//!
//! Every handler states the action it performs and the resource it touches;
//! [`require`] asks the pure policy in `yamdb_core::policy` and turns a
//! denial into the matching HTTP error (405, 401 or 403).

use yamdb_core::policy::{authorize, Action, Caller, Resource};

use crate::error::AppResult;

/// Fail unless `caller` may perform `action` on `resource`.
pub fn require(caller: &Caller, action: Action, resource: Resource) -> AppResult<()> {
    let decision = authorize(caller, action, &resource);
    if !decision.is_allowed() {
        tracing::debug!(
            user_id = caller.principal().map(|p| p.user_id),
            %action,
            ?resource,
            ?decision,
            "Request denied by policy",
        );
    }
    Ok(decision.into_result(action)?)
}
