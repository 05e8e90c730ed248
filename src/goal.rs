//! Goal evaluation for crafting plan search.
//!
//! A goal is a set of minimum-quantity thresholds over the item catalog,
//! compiled once into an index-resolved predicate before the search is
//! attempted. Items not mentioned in the goal are unconstrained, so the
//! predicate is monotonic: any state that item-wise dominates a satisfying
//! state also satisfies the goal.

use crate::error::{PlanError, Result};
use crate::state::{ItemCatalog, State};

/// Minimum-quantity thresholds a state must meet to count as a solution.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use craftplan::{Goal, ItemCatalog, State};
///
/// let catalog = Arc::new(ItemCatalog::new(["wood", "plank"]));
/// let goal = Goal::compile([("plank", 4)], &catalog).unwrap();
///
/// let short = State::from_quantities(Arc::clone(&catalog), [("plank", 3)]).unwrap();
/// let exact = State::from_quantities(Arc::clone(&catalog), [("plank", 4)]).unwrap();
/// let extra = State::from_quantities(catalog, [("plank", 9), ("wood", 2)]).unwrap();
///
/// assert!(!goal.is_satisfied(&short));
/// assert!(goal.is_satisfied(&exact));
/// assert!(goal.is_satisfied(&extra)); // surplus and unmentioned items are fine
/// ```
#[derive(Debug, Clone)]
pub struct Goal {
    /// Required minimums by catalog index
    thresholds: Vec<(usize, u64)>,
}

impl Goal {
    /// Compiles goal thresholds against a catalog. Runs once, before the
    /// search is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownItem`] if a threshold names an item
    /// outside the catalog.
    pub fn compile<I, S>(required: I, catalog: &ItemCatalog) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut thresholds = Vec::new();
        for (item, minimum) in required {
            let idx = catalog
                .index_of(item.as_ref())
                .ok_or_else(|| PlanError::UnknownItem(item.as_ref().to_string()))?;
            thresholds.push((idx, minimum));
        }
        thresholds.sort_unstable();
        Ok(Self { thresholds })
    }

    /// Whether the state meets every threshold.
    pub fn is_satisfied(&self, state: &State) -> bool {
        self.thresholds
            .iter()
            .all(|&(idx, minimum)| state.quantity(idx) >= minimum)
    }

    /// Number of thresholds the state still falls short of.
    pub fn unmet(&self, state: &State) -> usize {
        self.thresholds
            .iter()
            .filter(|&&(idx, minimum)| state.quantity(idx) < minimum)
            .count()
    }
}
