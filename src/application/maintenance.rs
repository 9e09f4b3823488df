//! Maintenance policy execution
//!
//! Interprets a repository's action list and applies it against the
//! registry when the external timer fires its job. Actions run in order
//! and independently: one failure is logged and never prevents the
//! remaining actions from running, including actions that follow a
//! successful delete and therefore find the repository gone.

use tracing::{info, warn};

use crate::application::registry::RepositoryRegistry;
use crate::domain::entities::Action;
use crate::error::{DepotError, DepotResult};

/// Entry point for the timer host: look up the repository's configured
/// action list and execute it.
pub fn run(registry: &RepositoryRegistry, name: &str) -> DepotResult<()> {
    let repo = registry
        .repository(name)
        .ok_or_else(|| DepotError::NotFound {
            name: name.to_string(),
        })?;
    let actions = repo
        .scheduling_action
        .as_deref()
        .map(Action::parse_list)
        .unwrap_or_default();
    if actions.is_empty() {
        info!(name, "maintenance fired with no actions configured");
        return Ok(());
    }
    execute(registry, name, &actions);
    Ok(())
}

/// Execute maintenance actions against a repository, in order.
pub fn execute(registry: &RepositoryRegistry, name: &str, actions: &[Action]) {
    for action in actions {
        let result = match action {
            Action::Purge => registry.purge(name),
            Action::Delete => registry.remove(name, true),
            Action::Copy(destination) => registry.copy(name, destination).map(|_| ()),
        };
        match result {
            Ok(()) => info!(name, ?action, "maintenance action completed"),
            Err(e) => {
                warn!(name, ?action, error = %e, "maintenance action failed, continuing");
            }
        }
    }
}
