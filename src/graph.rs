//! Lazy transition enumeration over the compiled recipe set.
//!
//! The transition graph is implicit: given a state, it yields one successor
//! per recipe whose precondition holds, in recipe-declaration order. It
//! borrows the recipe slice at construction, so nothing is global and the
//! same graph can serve any number of enumerations without side effects.

use crate::recipe::Recipe;
use crate::state::State;

/// One applicable transition out of a state.
#[derive(Debug, Clone)]
pub struct Successor<'a> {
    /// Name of the recipe that produces this transition
    pub action: &'a str,
    /// The state after applying the recipe
    pub state: State,
    /// The recipe's cost
    pub cost: f64,
}

/// The implicit search graph: recipes applied to inventory states.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use craftplan::{ItemCatalog, Recipe, Rule, State, TransitionGraph};
///
/// let catalog = Arc::new(ItemCatalog::new(["wood", "plank"]));
/// let rules = [
///     ("gather wood", Rule {
///         requires: None,
///         consumes: None,
///         produces: Some([("wood".to_string(), 1)].into()),
///         time: 4.0,
///     }),
///     ("craft plank", Rule {
///         requires: None,
///         consumes: Some([("wood".to_string(), 1)].into()),
///         produces: Some([("plank".to_string(), 4)].into()),
///         time: 1.0,
///     }),
/// ];
/// let recipes: Vec<Recipe> = rules
///     .iter()
///     .map(|(name, rule)| Recipe::compile(*name, rule, &catalog).unwrap())
///     .collect();
///
/// let graph = TransitionGraph::new(&recipes);
/// let empty = State::zeroed(Arc::clone(&catalog));
///
/// // Only "gather wood" applies to an empty inventory
/// let moves: Vec<_> = graph.successors(&empty).collect();
/// assert_eq!(moves.len(), 1);
/// assert_eq!(moves[0].action, "gather wood");
/// assert_eq!(moves[0].cost, 4.0);
///
/// // With wood in hand both recipes apply, in declaration order
/// let with_wood = State::from_quantities(catalog, [("wood", 1)]).unwrap();
/// let moves: Vec<_> = graph.successors(&with_wood).collect();
/// assert_eq!(moves.len(), 2);
/// assert_eq!(moves[0].action, "gather wood");
/// assert_eq!(moves[1].action, "craft plank");
/// ```
pub struct TransitionGraph<'a> {
    /// Compiled recipes in declaration order
    recipes: &'a [Recipe],
}

impl<'a> TransitionGraph<'a> {
    /// Creates a graph over a compiled recipe slice.
    pub fn new(recipes: &'a [Recipe]) -> Self {
        Self { recipes }
    }

    /// Lazily yields `(action, next state, cost)` for every recipe whose
    /// precondition holds against `state`, in declaration order.
    ///
    /// Re-enumerable: calling this again for an equal state yields the same
    /// successors. Neither the input state nor any recipe is mutated.
    pub fn successors<'s>(&'s self, state: &'s State) -> impl Iterator<Item = Successor<'a>> + 's {
        self.recipes
            .iter()
            .filter(move |recipe| recipe.check(state))
            .map(move |recipe| Successor {
                action: recipe.name(),
                state: recipe.apply(state),
                cost: recipe.cost(),
            })
    }

    /// The recipes this graph enumerates over.
    pub fn recipes(&self) -> &'a [Recipe] {
        self.recipes
    }
}
