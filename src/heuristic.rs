//! Heuristic strategies for guiding the plan search.
//!
//! A heuristic estimates remaining cost to the goal and only biases the
//! order in which the search explores states. With an admissible heuristic
//! (one that never overestimates) the returned plan is minimum-cost; with an
//! inadmissible one the search still terminates and still returns a plan if
//! it finds one, just without the optimality guarantee. An estimate of
//! `f64::INFINITY` effectively prunes a state from consideration.

use crate::error::{PlanError, Result};
use crate::goal::Goal;
use crate::state::{ItemCatalog, State};

/// A cost-to-go estimate used to order search exploration.
pub trait Heuristic: Send + Sync {
    /// Estimates the remaining cost from `state` to the goal.
    /// `f64::INFINITY` marks the state as not worth exploring.
    fn estimate(&self, state: &State) -> f64;
}

/// The always-zero estimate. Degrades A* to uniform-cost (Dijkstra) search,
/// which is optimal unconditionally.
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _state: &State) -> f64 {
        0.0
    }
}

/// Prunes states holding a surplus of a durable tool.
///
/// Possessing more than one of a tool like a bench or a pickaxe is never
/// beneficial: a second copy costs resources and unlocks nothing. This
/// heuristic returns `f64::INFINITY` when any listed tool's quantity exceeds
/// one, and zero otherwise, so it stays admissible for every state that can
/// lie on a minimum-cost path.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use craftplan::{Heuristic, ItemCatalog, State, ToolSurplusHeuristic};
///
/// let catalog = Arc::new(ItemCatalog::new(["bench", "wood_pickaxe", "plank"]));
/// let pruner = ToolSurplusHeuristic::compile(["bench", "wood_pickaxe"], &catalog).unwrap();
///
/// let one_each =
///     State::from_quantities(Arc::clone(&catalog), [("bench", 1), ("wood_pickaxe", 1)]).unwrap();
/// assert_eq!(pruner.estimate(&one_each), 0.0);
///
/// let spare_pickaxe =
///     State::from_quantities(catalog, [("bench", 1), ("wood_pickaxe", 2)]).unwrap();
/// assert!(pruner.estimate(&spare_pickaxe).is_infinite());
/// ```
pub struct ToolSurplusHeuristic {
    /// Durable tools by catalog index
    tools: Vec<usize>,
}

impl ToolSurplusHeuristic {
    /// Compiles a list of durable-tool item names against a catalog. Runs
    /// once, before the search is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownItem`] if a tool name is outside the
    /// catalog.
    pub fn compile<I, S>(tools: I, catalog: &ItemCatalog) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = Vec::new();
        for tool in tools {
            let idx = catalog
                .index_of(tool.as_ref())
                .ok_or_else(|| PlanError::UnknownItem(tool.as_ref().to_string()))?;
            resolved.push(idx);
        }
        resolved.sort_unstable();
        Ok(Self { tools: resolved })
    }
}

impl Heuristic for ToolSurplusHeuristic {
    /// Every listed tool is inspected; a surplus of any one of them prunes
    /// the state.
    fn estimate(&self, state: &State) -> f64 {
        for &idx in &self.tools {
            if state.quantity(idx) > 1 {
                return f64::INFINITY;
            }
        }
        0.0
    }
}

/// Counts the goal thresholds a state still falls short of.
///
/// The crafting analogue of counting unsatisfied goal conditions. Not
/// admissible in general: one recipe application can close several
/// thresholds at once, or a single cheap application can close one, so the
/// count may overestimate the true remaining cost. Use [`ZeroHeuristic`]
/// when strict optimality is required.
pub struct UnmetGoalsHeuristic {
    goal: Goal,
}

impl UnmetGoalsHeuristic {
    /// Creates the heuristic from a compiled goal.
    pub fn new(goal: Goal) -> Self {
        Self { goal }
    }
}

impl Heuristic for UnmetGoalsHeuristic {
    fn estimate(&self, state: &State) -> f64 {
        self.goal.unmet(state) as f64
    }
}
