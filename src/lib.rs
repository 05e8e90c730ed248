mod error;
mod goal;
mod graph;
mod heuristic;
mod planner;
mod problem;
mod recipe;
mod search;
mod state;
mod visualizer;

pub use error::{PlanError, Result};
pub use goal::Goal;
pub use graph::{Successor, TransitionGraph};
pub use heuristic::{Heuristic, ToolSurplusHeuristic, UnmetGoalsHeuristic, ZeroHeuristic};
pub use planner::Planner;
pub use problem::Problem;
pub use recipe::{Recipe, Rule};
pub use search::{search, Plan, PlanStep};
pub use state::{ItemCatalog, State};
pub use visualizer::PlanVisualizer;
