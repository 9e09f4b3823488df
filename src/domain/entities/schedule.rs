//! Scheduling specification
//!
//! A repository's `scheduling` string parses to a trigger and its
//! `scheduling_action` string to an ordered action list. The timer engine
//! itself lives outside the crate; these types only decide what runs and
//! under which trigger.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{DepotError, DepotResult};

/// Parsed scheduling trigger.
///
/// `cron:<expr>` and `at:<timestamp>` carry an explicit prefix; a spec
/// without any `:` is taken as a bare cron expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleTrigger {
    Cron(String),
    At(DateTime<Utc>),
    BareCron(String),
}

impl ScheduleTrigger {
    /// Parse a scheduling spec string.
    pub fn parse(spec: &str) -> DepotResult<Self> {
        match spec.split_once(':') {
            Some(("cron", expr)) => Ok(ScheduleTrigger::Cron(expr.to_string())),
            Some(("at", timestamp)) => {
                let parsed = DateTime::parse_from_rfc3339(timestamp).map_err(|e| {
                    DepotError::InvalidSchedule {
                        spec: spec.to_string(),
                        reason: format!("bad timestamp: {e}"),
                    }
                })?;
                Ok(ScheduleTrigger::At(parsed.with_timezone(&Utc)))
            }
            Some((prefix, _)) => Err(DepotError::InvalidSchedule {
                spec: spec.to_string(),
                reason: format!("unknown prefix '{prefix}'"),
            }),
            None => Ok(ScheduleTrigger::BareCron(spec.to_string())),
        }
    }
}

/// One maintenance action from a repository's action list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Purge,
    Delete,
    Copy(String),
}

impl Action {
    /// Parse a comma-separated action list.
    ///
    /// Unknown tokens are logged and skipped; they never fail the rest of
    /// the list.
    pub fn parse_list(spec: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        for token in spec.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let lowered = token.to_lowercase();
            if lowered == "purge" {
                actions.push(Action::Purge);
            } else if lowered == "delete" {
                actions.push(Action::Delete);
            } else if lowered.contains("copy") {
                let fields: Vec<&str> = token.split_whitespace().collect();
                if fields.len() == 2 {
                    actions.push(Action::Copy(fields[1].to_string()));
                } else {
                    warn!(token, "unknown scheduling action, skipping");
                }
            } else {
                warn!(token, "unknown scheduling action, skipping");
            }
        }
        actions
    }
}
