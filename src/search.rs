use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use crate::error::{PlanError, Result};
use crate::goal::Goal;
use crate::graph::TransitionGraph;
use crate::heuristic::Heuristic;
use crate::state::State;

/// One step of a returned plan: a state and the action that produced it.
///
/// The first step of every plan is the start state with `action` of `None`;
/// every later step's action is the recipe name whose effect, applied to the
/// previous step's state, yields this step's state.
#[derive(Debug, Clone)]
pub struct PlanStep {
    /// The inventory snapshot at this point of the plan
    pub state: State,
    /// The recipe that produced this state, or `None` for the start
    pub action: Option<String>,
}

/// A chronological sequence of crafting steps from start to goal.
#[derive(Debug, Clone)]
pub struct Plan {
    steps: Vec<PlanStep>,
    total_cost: f64,
}

impl Plan {
    /// The steps in chronological order, start state first.
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Sum of the costs of all applied recipes.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Number of steps, including the start state.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A plan always contains at least the start state.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The applied recipe names in order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .filter_map(|step| step.action.as_deref())
    }

    /// The goal-satisfying state the plan ends in.
    ///
    /// # Panics
    ///
    /// Panics if the plan has no steps; plans returned by [`search`] always
    /// have at least one.
    pub fn final_state(&self) -> &State {
        &self.steps.last().expect("plan has at least the start state").state
    }
}

/// A frontier entry: a state pending expansion at a recorded priority.
///
/// The heap may hold several entries for one state at different priorities;
/// stale ones are discarded on pop against the authoritative cost table.
#[derive(Debug, Clone)]
struct FrontierEntry {
    /// cost_so_far + heuristic at push time
    priority: f64,
    /// cost_so_far at push time, for the staleness check
    cost: f64,
    state: State,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    /// Priority first; ties broken by the state's total order so pops are
    /// deterministic across runs.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .partial_cmp(&other.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.state.cmp(&other.state))
            .then_with(|| {
                self.cost
                    .partial_cmp(&other.cost)
                    .unwrap_or(Ordering::Equal)
            })
    }
}

/// Time-bounded A* over the implicit transition graph.
///
/// Explores states best-first by `cost so far + heuristic estimate` until a
/// goal-satisfying state is popped, the frontier is exhausted, or the
/// wall-clock budget runs out. The budget is checked at the top of each
/// iteration, so it caps search duration, not path length.
///
/// With an admissible, consistent heuristic the returned plan is
/// minimum-cost; with an inadmissible one a plan is still returned if found.
/// Running out of budget or of frontier is the normal negative outcome
/// ([`PlanError::NoPlanFound`]), not an internal failure.
///
/// # Errors
///
/// Returns [`PlanError::NoPlanFound`] if no goal-satisfying state was
/// reached within the time limit.
pub fn search(
    graph: &TransitionGraph<'_>,
    start: &State,
    goal: &Goal,
    limit: Duration,
    heuristic: &dyn Heuristic,
) -> Result<Plan> {
    let started = Instant::now();

    let mut frontier = BinaryHeap::new();
    let mut cost_so_far: HashMap<State, f64> = HashMap::new();
    let mut came_from: HashMap<State, Option<State>> = HashMap::new();
    let mut actions: HashMap<State, Option<String>> = HashMap::new();

    cost_so_far.insert(start.clone(), 0.0);
    came_from.insert(start.clone(), None);
    actions.insert(start.clone(), None);
    frontier.push(Reverse(FrontierEntry {
        priority: 0.0,
        cost: 0.0,
        state: start.clone(),
    }));

    let mut expanded: u64 = 0;
    let mut skipped_stale: u64 = 0;

    while let Some(Reverse(entry)) = frontier.pop() {
        if started.elapsed() >= limit {
            log::warn!(
                "search budget {:?} exhausted after {} expansions ({} stale entries skipped)",
                limit,
                expanded,
                skipped_stale
            );
            return Err(PlanError::NoPlanFound);
        }

        let Some(&best) = cost_so_far.get(&entry.state) else {
            // Every pushed state is recorded first; a miss means the
            // bookkeeping invariant was broken.
            unreachable!("frontier state missing from the cost table");
        };
        // Lazy deletion: a cheaper path to this state was recorded after
        // this entry was pushed.
        if entry.cost > best {
            skipped_stale += 1;
            continue;
        }

        if goal.is_satisfied(&entry.state) {
            let plan = reconstruct(&entry.state, &came_from, &actions, best);
            log::info!(
                "plan found in {:?}: {} actions, total cost {}, {} expansions",
                started.elapsed(),
                plan.len() - 1,
                best,
                expanded
            );
            return Ok(plan);
        }

        expanded += 1;
        for successor in graph.successors(&entry.state) {
            let candidate = best + successor.cost;
            let improved = match cost_so_far.get(&successor.state) {
                Some(&recorded) => candidate < recorded,
                None => true,
            };
            if improved {
                let priority = candidate + heuristic.estimate(&successor.state);
                cost_so_far.insert(successor.state.clone(), candidate);
                came_from.insert(successor.state.clone(), Some(entry.state.clone()));
                actions.insert(
                    successor.state.clone(),
                    Some(successor.action.to_string()),
                );
                frontier.push(Reverse(FrontierEntry {
                    priority,
                    cost: candidate,
                    state: successor.state,
                }));
            }
        }
    }

    // Frontier exhausted: the reachable state space holds no goal state.
    log::debug!(
        "frontier exhausted after {} expansions; goal unreachable",
        expanded
    );
    Err(PlanError::NoPlanFound)
}

/// Walks the predecessor links back from the goal state and reverses them
/// into a chronological plan.
fn reconstruct(
    goal_state: &State,
    came_from: &HashMap<State, Option<State>>,
    actions: &HashMap<State, Option<String>>,
    total_cost: f64,
) -> Plan {
    let mut steps = Vec::new();
    let mut cursor = Some(goal_state.clone());
    while let Some(state) = cursor {
        let action = actions.get(&state).cloned().flatten();
        cursor = came_from.get(&state).cloned().flatten();
        steps.push(PlanStep { state, action });
    }
    steps.reverse();
    Plan { steps, total_cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::ZeroHeuristic;
    use crate::recipe::{Recipe, Rule};
    use crate::state::ItemCatalog;
    use std::sync::Arc;

    fn compile(
        catalog: &ItemCatalog,
        rules: &[(&str, Option<Vec<(&str, u64)>>, Option<Vec<(&str, u64)>>, f64)],
    ) -> Vec<Recipe> {
        rules
            .iter()
            .map(|(name, consumes, produces, time)| {
                let rule = Rule {
                    requires: None,
                    consumes: consumes.as_ref().map(|pairs| {
                        pairs
                            .iter()
                            .map(|&(item, qty)| (item.to_string(), qty))
                            .collect()
                    }),
                    produces: produces.as_ref().map(|pairs| {
                        pairs
                            .iter()
                            .map(|&(item, qty)| (item.to_string(), qty))
                            .collect()
                    }),
                    time: *time,
                };
                Recipe::compile(*name, &rule, catalog).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_single_step_plan() {
        let catalog = Arc::new(ItemCatalog::new(["wood", "plank"]));
        let recipes = compile(
            &catalog,
            &[(
                "craft plank",
                Some(vec![("wood", 1)]),
                Some(vec![("plank", 4)]),
                1.0,
            )],
        );
        let graph = TransitionGraph::new(&recipes);
        let start = State::from_quantities(Arc::clone(&catalog), [("wood", 1)]).unwrap();
        let goal = Goal::compile([("plank", 4)], &catalog).unwrap();

        let plan = search(
            &graph,
            &start,
            &goal,
            Duration::from_secs(5),
            &ZeroHeuristic,
        )
        .unwrap();

        assert_eq!(plan.total_cost(), 1.0);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps()[0].action, None);
        assert_eq!(plan.steps()[0].state, start);
        assert_eq!(plan.steps()[1].action.as_deref(), Some("craft plank"));
        assert_eq!(plan.final_state().get("plank"), 4);
        assert_eq!(plan.final_state().get("wood"), 0);
    }

    #[test]
    fn test_goal_already_satisfied_at_start() {
        let catalog = Arc::new(ItemCatalog::new(["plank"]));
        let recipes = compile(&catalog, &[]);
        let graph = TransitionGraph::new(&recipes);
        let start = State::from_quantities(Arc::clone(&catalog), [("plank", 4)]).unwrap();
        let goal = Goal::compile([("plank", 4)], &catalog).unwrap();

        let plan = search(
            &graph,
            &start,
            &goal,
            Duration::from_secs(5),
            &ZeroHeuristic,
        )
        .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps()[0].action, None);
        assert_eq!(plan.total_cost(), 0.0);
    }

    #[test]
    fn test_cheaper_of_two_routes_wins() {
        let catalog = Arc::new(ItemCatalog::new(["ore", "ingot"]));
        let recipes = compile(
            &catalog,
            &[
                (
                    "smelt slowly",
                    Some(vec![("ore", 1)]),
                    Some(vec![("ingot", 1)]),
                    5.0,
                ),
                (
                    "smelt quickly",
                    Some(vec![("ore", 1)]),
                    Some(vec![("ingot", 1)]),
                    3.0,
                ),
            ],
        );
        let graph = TransitionGraph::new(&recipes);
        let start = State::from_quantities(Arc::clone(&catalog), [("ore", 1)]).unwrap();
        let goal = Goal::compile([("ingot", 1)], &catalog).unwrap();

        let plan = search(
            &graph,
            &start,
            &goal,
            Duration::from_secs(5),
            &ZeroHeuristic,
        )
        .unwrap();
        assert_eq!(plan.total_cost(), 3.0);
        let actions: Vec<_> = plan.actions().collect();
        assert_eq!(actions, ["smelt quickly"]);
    }

    #[test]
    fn test_unreachable_goal_exhausts_frontier() {
        let catalog = Arc::new(ItemCatalog::new(["wood", "diamond"]));
        let recipes = compile(
            &catalog,
            &[(
                "whittle",
                Some(vec![("wood", 1)]),
                None,
                1.0,
            )],
        );
        let graph = TransitionGraph::new(&recipes);
        let start = State::from_quantities(Arc::clone(&catalog), [("wood", 3)]).unwrap();
        let goal = Goal::compile([("diamond", 1)], &catalog).unwrap();

        let result = search(
            &graph,
            &start,
            &goal,
            Duration::from_secs(5),
            &ZeroHeuristic,
        );
        assert!(matches!(result, Err(PlanError::NoPlanFound)));
    }

    #[test]
    fn test_time_limit_is_respected() {
        // An infinite state space with an unreachable goal: only the clock
        // can stop this search.
        let catalog = Arc::new(ItemCatalog::new(["wood", "diamond"]));
        let recipes = compile(
            &catalog,
            &[("gather wood", None, Some(vec![("wood", 1)]), 1.0)],
        );
        let graph = TransitionGraph::new(&recipes);
        let start = State::zeroed(Arc::clone(&catalog));
        let goal = Goal::compile([("diamond", 1)], &catalog).unwrap();

        let limit = Duration::from_millis(50);
        let began = Instant::now();
        let result = search(&graph, &start, &goal, limit, &ZeroHeuristic);
        assert!(matches!(result, Err(PlanError::NoPlanFound)));
        // Generous upper bound; the check happens once per pop
        assert!(began.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_multi_step_chain_reconstructs_in_order() {
        let catalog = Arc::new(ItemCatalog::new(["wood", "plank", "stick"]));
        let recipes = compile(
            &catalog,
            &[
                ("gather wood", None, Some(vec![("wood", 1)]), 2.0),
                (
                    "craft plank",
                    Some(vec![("wood", 1)]),
                    Some(vec![("plank", 4)]),
                    1.0,
                ),
                (
                    "craft stick",
                    Some(vec![("plank", 2)]),
                    Some(vec![("stick", 4)]),
                    1.0,
                ),
            ],
        );
        let graph = TransitionGraph::new(&recipes);
        let start = State::zeroed(Arc::clone(&catalog));
        let goal = Goal::compile([("stick", 4)], &catalog).unwrap();

        let plan = search(
            &graph,
            &start,
            &goal,
            Duration::from_secs(5),
            &ZeroHeuristic,
        )
        .unwrap();

        let actions: Vec<_> = plan.actions().collect();
        assert_eq!(actions, ["gather wood", "craft plank", "craft stick"]);
        assert_eq!(plan.total_cost(), 4.0);

        // Reconstruction invariant: each step's state follows from applying
        // its action to the previous step's state, only the last satisfies
        // the goal, and the first is the start.
        assert_eq!(plan.steps()[0].state, start);
        for window in plan.steps().windows(2) {
            let action = window[1].action.as_deref().unwrap();
            let recipe = recipes.iter().find(|r| r.name() == action).unwrap();
            assert!(recipe.check(&window[0].state));
            assert_eq!(recipe.apply(&window[0].state), window[1].state);
        }
        for step in &plan.steps()[..plan.len() - 1] {
            assert!(!goal.is_satisfied(&step.state));
        }
        assert!(goal.is_satisfied(plan.final_state()));
    }

    #[test]
    fn test_deterministic_total_cost_across_runs() {
        let catalog = Arc::new(ItemCatalog::new(["a", "b", "goal"]));
        let recipes = compile(
            &catalog,
            &[
                ("make a", None, Some(vec![("a", 1)]), 1.0),
                ("make b", None, Some(vec![("b", 1)]), 1.0),
                (
                    "a to goal",
                    Some(vec![("a", 1)]),
                    Some(vec![("goal", 1)]),
                    1.0,
                ),
                (
                    "b to goal",
                    Some(vec![("b", 1)]),
                    Some(vec![("goal", 1)]),
                    1.0,
                ),
            ],
        );
        let graph = TransitionGraph::new(&recipes);
        let start = State::zeroed(Arc::clone(&catalog));
        let goal = Goal::compile([("goal", 1)], &catalog).unwrap();

        let first = search(
            &graph,
            &start,
            &goal,
            Duration::from_secs(5),
            &ZeroHeuristic,
        )
        .unwrap();
        let second = search(
            &graph,
            &start,
            &goal,
            Duration::from_secs(5),
            &ZeroHeuristic,
        )
        .unwrap();
        assert_eq!(first.total_cost(), second.total_cost());
        // Equal-priority pops tie-break on the state order, so even the
        // action sequences agree
        let a: Vec<_> = first.actions().collect();
        let b: Vec<_> = second.actions().collect();
        assert_eq!(a, b);
    }
}
