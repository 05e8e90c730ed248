//! # Recipe Module for Crafting Plan Search
//!
//! This module provides the declarative [`Rule`] and its compiled form,
//! [`Recipe`].
//!
//! ## Key Components
//!
//! * `Rule`: the raw clauses of a crafting rule as they appear in problem
//!   data (`Requires`, `Consumes`, `Produces`, and a `Time` cost)
//! * `Recipe`: the rule compiled against an item catalog, with every item
//!   name resolved to its canonical index
//!
//! ## Why compile?
//!
//! Compilation runs once, before the search is attempted; the compiled
//! precondition ([`Recipe::check`]) and effect ([`Recipe::apply`]) are then
//! called for every expansion of every state, potentially millions of times,
//! and operate on plain index lookups instead of string hashing.
//!
//! ## Basic Usage
//!
//! ```
//! use std::sync::Arc;
//! use craftplan::{ItemCatalog, Recipe, Rule, State};
//!
//! let catalog = Arc::new(ItemCatalog::new(["wood", "plank"]));
//!
//! let rule = Rule {
//!     requires: None,
//!     consumes: Some([("wood".to_string(), 1)].into()),
//!     produces: Some([("plank".to_string(), 4)].into()),
//!     time: 1.0,
//! };
//! let recipe = Recipe::compile("craft plank", &rule, &catalog).unwrap();
//!
//! let start = State::from_quantities(catalog, [("wood", 1)]).unwrap();
//! assert!(recipe.check(&start));
//!
//! let next = recipe.apply(&start);
//! assert_eq!(next.get("wood"), 0);
//! assert_eq!(next.get("plank"), 4);
//! assert!(!recipe.check(&next)); // no wood left to consume
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::state::{ItemCatalog, State};

/// The declarative clauses of one crafting rule.
///
/// This is the wire form rules arrive in (see [`Problem`](crate::Problem)
/// for the surrounding file format). All three clauses are optional; an
/// absent clause imposes no constraint and causes no change.
///
/// * `Requires`: items that must be present (quantity above zero) but are
///   not used up, such as a crafting bench. The mapped flag is a presence
///   marker; listing an item is what constrains it.
/// * `Consumes`: items removed from the inventory, with amounts.
/// * `Produces`: items added to the inventory, with amounts.
/// * `Time`: the scalar cost of applying the rule, in time units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "Requires", skip_serializing_if = "Option::is_none")]
    pub requires: Option<HashMap<String, bool>>,
    #[serde(rename = "Consumes", skip_serializing_if = "Option::is_none")]
    pub consumes: Option<HashMap<String, u64>>,
    #[serde(rename = "Produces", skip_serializing_if = "Option::is_none")]
    pub produces: Option<HashMap<String, u64>>,
    #[serde(rename = "Time")]
    pub time: f64,
}

/// A crafting rule compiled against an item catalog.
///
/// A `Recipe` is an immutable record of a name, a compiled precondition, a
/// compiled effect, and a cost. It is built once per rule before search
/// begins and referenced read-only throughout; the compiled clauses hold
/// canonical item indices, sorted for reproducible iteration.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use craftplan::{ItemCatalog, Recipe, Rule, State};
///
/// let catalog = Arc::new(ItemCatalog::new(["bench", "wood", "plank"]));
/// let rule = Rule {
///     requires: Some([("bench".to_string(), true)].into()),
///     consumes: Some([("wood".to_string(), 1)].into()),
///     produces: Some([("plank".to_string(), 4)].into()),
///     time: 0.5,
/// };
/// let recipe = Recipe::compile("craft plank at bench", &rule, &catalog).unwrap();
/// assert_eq!(recipe.name(), "craft plank at bench");
/// assert_eq!(recipe.cost(), 0.5);
///
/// // Without the bench the precondition fails even though wood is available
/// let no_bench = State::from_quantities(Arc::clone(&catalog), [("wood", 5)]).unwrap();
/// assert!(!recipe.check(&no_bench));
///
/// let ready = State::from_quantities(catalog, [("wood", 5), ("bench", 1)]).unwrap();
/// assert!(recipe.check(&ready));
/// ```
#[derive(Debug, Clone)]
pub struct Recipe {
    /// The name of the recipe
    name: String,
    /// Items that must be present, by catalog index
    requires: Vec<usize>,
    /// Items consumed, by catalog index with amounts
    consumes: Vec<(usize, u64)>,
    /// Items produced, by catalog index with amounts
    produces: Vec<(usize, u64)>,
    /// The cost of applying this recipe
    cost: f64,
}

impl Recipe {
    /// Compiles a rule against a catalog.
    ///
    /// Runs once per rule, before the search is attempted. Resolves every
    /// item name in the rule's clauses to its canonical index and validates
    /// the declared cost.
    ///
    /// # Errors
    ///
    /// * [`PlanError::UnknownItem`] if a clause names an item outside the
    ///   catalog
    /// * [`PlanError::InvalidCost`] if `Time` is negative or not finite
    pub fn compile(name: impl Into<String>, rule: &Rule, catalog: &ItemCatalog) -> Result<Self> {
        if rule.time < 0.0 || !rule.time.is_finite() {
            return Err(PlanError::InvalidCost);
        }

        let resolve = |item: &str| {
            catalog
                .index_of(item)
                .ok_or_else(|| PlanError::UnknownItem(item.to_string()))
        };

        // Listing an item under Requires is what constrains it; the mapped
        // flag is not consulted.
        let mut requires = Vec::new();
        if let Some(required) = &rule.requires {
            for item in required.keys() {
                requires.push(resolve(item)?);
            }
        }
        requires.sort_unstable();

        let mut consumes = Vec::new();
        if let Some(consumed) = &rule.consumes {
            for (item, &quantity) in consumed {
                consumes.push((resolve(item)?, quantity));
            }
        }
        consumes.sort_unstable();

        let mut produces = Vec::new();
        if let Some(produced) = &rule.produces {
            for (item, &quantity) in produced {
                produces.push((resolve(item)?, quantity));
            }
        }
        produces.sort_unstable();

        Ok(Self {
            name: name.into(),
            requires,
            consumes,
            produces,
            cost: rule.time,
        })
    }

    /// The name of the recipe.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cost of applying this recipe.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The compiled precondition: whether this recipe may be applied to a
    /// state.
    ///
    /// Returns `false` if any required item has zero quantity, or if any
    /// consumed item's available quantity is below the amount needed.
    pub fn check(&self, state: &State) -> bool {
        self.requires.iter().all(|&idx| state.quantity(idx) > 0)
            && self
                .consumes
                .iter()
                .all(|&(idx, quantity)| state.quantity(idx) >= quantity)
    }

    /// The compiled effect: the state resulting from applying this recipe.
    ///
    /// Pure; returns a new state with produced quantities added and consumed
    /// quantities removed. Only ever invoked on states that passed
    /// [`Recipe::check`], so the resulting quantities are non-negative under
    /// correct rule data; debug builds assert this rather than re-validating.
    pub fn apply(&self, state: &State) -> State {
        state.apply_indexed(&self.produces, &self.consumes)
    }
}
