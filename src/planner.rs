//! # Planner Module for Crafting Plan Search
//!
//! The planner is the central component of the crate, responsible for:
//! - Holding the compiled recipes, goal, heuristic, and time budget together
//! - Running the time-bounded A* search over the transition graph
//! - Returning the chronological plan, or the no-plan outcome
//!
//! ## Overview
//!
//! Planning proceeds in two phases:
//! 1. Compilation, once per problem: rules, goal thresholds, and heuristics
//!    are resolved against the item catalog
//! 2. Search, once per query: the compiled parts are handed to
//!    [`search`](crate::search()) with the start state and the wall-clock
//!    budget
//!
//! ## Basic Usage
//!
//! ```
//! use std::sync::Arc;
//! use craftplan::{Goal, ItemCatalog, Planner, Recipe, Rule, State};
//!
//! // Step 1: declare the item universe
//! let catalog = Arc::new(ItemCatalog::new(["wood", "plank"]));
//!
//! // Step 2: compile the rules
//! let rule = Rule {
//!     requires: None,
//!     consumes: Some([("wood".to_string(), 1)].into()),
//!     produces: Some([("plank".to_string(), 4)].into()),
//!     time: 1.0,
//! };
//! let recipe = Recipe::compile("craft plank", &rule, &catalog).unwrap();
//!
//! // Step 3: compile the goal and build the planner
//! let goal = Goal::compile([("plank", 4)], &catalog).unwrap();
//! let planner = Planner::new(vec![recipe], goal);
//!
//! // Step 4: plan from the starting inventory
//! let start = State::from_quantities(catalog, [("wood", 1)]).unwrap();
//! let plan = planner.plan(&start).unwrap();
//!
//! assert_eq!(plan.total_cost(), 1.0);
//! let actions: Vec<_> = plan.actions().collect();
//! assert_eq!(actions, ["craft plank"]);
//! ```

use std::time::Duration;

use crate::error::Result;
use crate::goal::Goal;
use crate::graph::TransitionGraph;
use crate::heuristic::{Heuristic, ZeroHeuristic};
use crate::problem::Problem;
use crate::recipe::Recipe;
use crate::search::{search, Plan};
use crate::state::State;

/// The crafting planner: compiled recipes, goal, heuristic, and time budget.
///
/// The planner owns the compiled recipe set and references it read-only for
/// the duration of each search; each call to [`Planner::plan`] gets its own
/// private bookkeeping, so a planner can be reused for any number of
/// queries.
///
/// # Examples
///
/// Loading a whole problem file and planning from its initial inventory:
///
/// ```
/// use craftplan::{Planner, Problem};
///
/// let problem: Problem = r#"{
///     "Items": ["wood", "plank"],
///     "Initial": {"wood": 1},
///     "Goal": {"plank": 4},
///     "Recipes": {
///         "craft plank": {"Consumes": {"wood": 1}, "Produces": {"plank": 4}, "Time": 1}
///     }
/// }"#
/// .parse()
/// .unwrap();
///
/// let (planner, start) = Planner::from_problem(&problem).unwrap();
/// let plan = planner.plan(&start).unwrap();
/// assert_eq!(plan.total_cost(), 1.0);
/// ```
///
/// Handling the no-plan outcome:
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use craftplan::{Goal, ItemCatalog, PlanError, Planner, State};
///
/// let catalog = Arc::new(ItemCatalog::new(["diamond"]));
/// let goal = Goal::compile([("diamond", 1)], &catalog).unwrap();
///
/// // No recipes at all: the goal is unreachable
/// let planner = Planner::new(Vec::new(), goal).time_limit(Duration::from_millis(100));
/// let start = State::zeroed(catalog);
/// let result = planner.plan(&start);
/// assert!(matches!(result, Err(PlanError::NoPlanFound)));
/// ```
pub struct Planner {
    /// Compiled recipes in declaration order
    recipes: Vec<Recipe>,
    /// Compiled goal thresholds
    goal: Goal,
    /// Cost-to-go estimate guiding exploration
    heuristic: Box<dyn Heuristic>,
    /// Hard cap on search wall-clock duration
    time_limit: Duration,
}

impl Planner {
    /// The default search budget, in wall-clock time.
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);

    /// Creates a planner with the zero heuristic and the default time limit.
    ///
    /// The zero heuristic degrades A* to uniform-cost search, which returns
    /// a minimum-cost plan unconditionally. Use [`Planner::with_heuristic`]
    /// to guide the search with domain knowledge.
    pub fn new(recipes: Vec<Recipe>, goal: Goal) -> Self {
        Self::with_heuristic(recipes, goal, Box::new(ZeroHeuristic))
    }

    /// Creates a planner with a custom heuristic.
    ///
    /// An admissible, consistent heuristic preserves optimality; an
    /// inadmissible one only affects which plan is found, never whether the
    /// search terminates.
    pub fn with_heuristic(
        recipes: Vec<Recipe>,
        goal: Goal,
        heuristic: Box<dyn Heuristic>,
    ) -> Self {
        Self {
            recipes,
            goal,
            heuristic,
            time_limit: Self::DEFAULT_TIME_LIMIT,
        }
    }

    /// Builds a planner from a parsed problem file, returning it together
    /// with the problem's initial state.
    ///
    /// # Errors
    ///
    /// Propagates compilation errors: [`PlanError::UnknownItem`] for
    /// initial/goal/rule items outside the declared universe,
    /// [`PlanError::InvalidCost`] for a rule with a bad `Time`.
    ///
    /// [`PlanError::UnknownItem`]: crate::PlanError::UnknownItem
    /// [`PlanError::InvalidCost`]: crate::PlanError::InvalidCost
    pub fn from_problem(problem: &Problem) -> Result<(Self, State)> {
        let catalog = problem.item_catalog();
        let recipes = problem.compile_recipes(&catalog)?;
        let goal = problem.compile_goal(&catalog)?;
        let initial = problem.initial_state(&catalog)?;
        Ok((Self::new(recipes, goal), initial))
    }

    /// Sets the wall-clock budget for each search.
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Finds a minimum-cost plan from `start` to the goal.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoPlanFound`](crate::PlanError::NoPlanFound)
    /// when no goal-satisfying state was reached within the time limit.
    /// This is a normal negative outcome, not an internal failure.
    pub fn plan(&self, start: &State) -> Result<Plan> {
        log::debug!(
            "planning with {} recipes, budget {:?}",
            self.recipes.len(),
            self.time_limit
        );
        let graph = TransitionGraph::new(&self.recipes);
        search(
            &graph,
            start,
            &self.goal,
            self.time_limit,
            self.heuristic.as_ref(),
        )
    }

    /// The compiled recipes this planner searches over.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}
