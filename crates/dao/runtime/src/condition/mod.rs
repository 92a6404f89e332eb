//! Condition Engine: stateless predicates over a ballot
//!
//! A condition captures only its configuration (thresholds, role names, and
//! membership lookups). Every query takes the [`Ballot`] explicitly, so one
//! condition value can be shared by any number of proposals and evaluated
//! any number of times.
//!
//! Two questions are answered for every ballot:
//!
//! - [`Condition::eval`]: is the condition satisfied?
//! - [`Condition::signal`]: how close is it, as a fraction in `[0, 1]`?
//!
//! Built-in leaves ([`MembersThreshold`], [`RoleThreshold`], [`RoleCount`])
//! count only `Yes` votes. [`And`] and [`Or`] compose any conditions,
//! including custom implementations of the trait.

mod combinators;
mod role_count;
mod spec;
mod threshold;

pub use combinators::{And, Or};
pub use role_count::RoleCount;
pub use spec::ConditionSpec;
pub use threshold::{MembersThreshold, RoleThreshold};

use dao_types::{Ballot, DaoError, DaoResult};
use std::fmt;
use std::sync::Arc;

/// A stateless predicate and progress measure over a ballot
pub trait Condition: Send + Sync {
    /// Whether the ballot satisfies the condition.
    fn eval(&self, ballot: &Ballot) -> bool;

    /// Progress towards satisfaction, always within `[0, 1]`.
    fn signal(&self, ballot: &Ballot) -> f64;

    /// Static description, e.g. `60% of members`.
    fn render(&self) -> String;

    /// Description including the current tally for `ballot`.
    fn render_with_votes(&self, ballot: &Ballot) -> String;
}

impl fmt::Debug for dyn Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Shared handle to any condition
pub type SharedCondition = Arc<dyn Condition>;

/// `approvals / total`, clamped to `[0, 1]`; zero when `total` is zero.
pub(crate) fn ratio(approvals: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (approvals as f64 / total as f64).min(1.0)
}

pub(crate) fn validate_threshold(threshold: f64) -> DaoResult<f64> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(DaoError::InvalidCondition(format!(
            "threshold must be in (0, 1], got {threshold}"
        )))
    }
}

/// `0.6` → `60%`, `0.125` → `12.5%`
pub(crate) fn format_percent(fraction: f64) -> String {
    let formatted = format!("{:.2}", fraction * 100.0);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}
