use crate::error::Result;
use crate::search::Plan;
use std::fs::File;
use std::io::Write;

/// A visualizer for crafting plans that generates Graphviz DOT files
pub struct PlanVisualizer;

impl PlanVisualizer {
    /// Create a new plan visualizer
    pub fn new() -> Self {
        Self
    }

    /// Generate a DOT file rendering the plan as a chain of inventory
    /// states, with the applied recipe on each edge
    pub fn write_dot(&self, plan: &Plan, filename: &str) -> Result<()> {
        let mut file = File::create(filename)?;

        // Write DOT file header
        writeln!(file, "digraph plan {{")?;
        writeln!(file, "    rankdir=LR;")?;
        writeln!(
            file,
            "    node [shape=box, style=filled, fillcolor=lightblue];"
        )?;
        writeln!(file, "    edge [fontsize=10];")?;

        // One node per step; start and goal states highlighted
        let last = plan.len().saturating_sub(1);
        for (i, step) in plan.steps().iter().enumerate() {
            let fill = if i == 0 {
                "lightgreen"
            } else if i == last {
                "lightpink"
            } else {
                "lightblue"
            };
            writeln!(
                file,
                "    step_{} [label=\"{}\", fillcolor={}];",
                i, step.state, fill
            )?;
        }

        // One edge per applied recipe, in chronological order
        for (i, step) in plan.steps().iter().enumerate().skip(1) {
            let action = step.action.as_deref().unwrap_or("none");
            writeln!(
                file,
                "    step_{} -> step_{} [label=\"{}\"];",
                i - 1,
                i,
                action
            )?;
        }

        writeln!(file, "}}")?;

        Ok(())
    }
}

impl Default for PlanVisualizer {
    fn default() -> Self {
        Self::new()
    }
}
