//! Problem-file model for crafting planning.
//!
//! A problem file declares the item universe, the starting inventory, the
//! goal thresholds, and the named recipes:
//!
//! ```json
//! {
//!     "Items": ["wood", "plank", "bench"],
//!     "Initial": {"wood": 1},
//!     "Goal": {"plank": 4},
//!     "Recipes": {
//!         "craft plank": {"Consumes": {"wood": 1}, "Produces": {"plank": 4}, "Time": 1}
//!     }
//! }
//! ```
//!
//! [`Problem`] is the parsed form plus the compilation helpers that turn it
//! into the core's data structures: the item catalog, the initial state,
//! the compiled recipes, and the goal. Recipe declaration order is
//! preserved (`IndexMap`), and it is the order the transition graph
//! enumerates in.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::goal::Goal;
use crate::recipe::{Recipe, Rule};
use crate::state::{ItemCatalog, State};

/// A complete planning problem as declared in a problem file.
///
/// # Examples
///
/// ```
/// use craftplan::Problem;
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
/// assert_eq!(problem.items, ["wood", "plank"]);
/// assert_eq!(problem.recipes.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    /// The item universe, in declaration order
    #[serde(rename = "Items")]
    pub items: Vec<String>,
    /// Starting quantities; unspecified items default to zero
    #[serde(rename = "Initial")]
    pub initial: HashMap<String, u64>,
    /// Minimum quantities required at the end of the plan
    #[serde(rename = "Goal")]
    pub goal: HashMap<String, u64>,
    /// Named rules, in declaration order
    #[serde(rename = "Recipes")]
    pub recipes: IndexMap<String, Rule>,
}

impl Problem {
    /// Loads a problem from a JSON file.
    ///
    /// # Errors
    ///
    /// [`PlanError::Io`] if the file cannot be read, [`PlanError::Parse`]
    /// if it is not a valid problem document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Builds the shared item catalog for this problem.
    pub fn item_catalog(&self) -> Arc<ItemCatalog> {
        Arc::new(ItemCatalog::new(self.items.iter().map(String::as_str)))
    }

    /// Builds the initial state over a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownItem`] if the initial inventory names an
    /// item outside the declared universe.
    pub fn initial_state(&self, catalog: &Arc<ItemCatalog>) -> Result<State> {
        State::from_quantities(
            Arc::clone(catalog),
            self.initial.iter().map(|(item, &qty)| (item.as_str(), qty)),
        )
    }

    /// Compiles every rule against a catalog, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first rule's [`PlanError::UnknownItem`] or
    /// [`PlanError::InvalidCost`] encountered.
    pub fn compile_recipes(&self, catalog: &ItemCatalog) -> Result<Vec<Recipe>> {
        self.recipes
            .iter()
            .map(|(name, rule)| Recipe::compile(name.as_str(), rule, catalog))
            .collect()
    }

    /// Compiles the goal thresholds against a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownItem`] if the goal names an item outside
    /// the declared universe.
    pub fn compile_goal(&self, catalog: &ItemCatalog) -> Result<Goal> {
        Goal::compile(
            self.goal.iter().map(|(item, &qty)| (item.as_str(), qty)),
            catalog,
        )
    }
}

impl FromStr for Problem {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
