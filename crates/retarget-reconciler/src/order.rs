//! Module evaluation order.
//!
//! A workspace may name an evaluation root that every other member waits
//! for, and members may wait on each other explicitly. Independent modules
//! keep their declaration order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use retarget_core::module::Module;
use retarget_util::errors::RetargetError;

/// Modules in the order they are evaluated, as indices into the module slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOrder {
    names: Vec<String>,
    indices: Vec<usize>,
}

impl EvaluationOrder {
    /// Declaration order, no constraints.
    pub fn declaration(modules: &[Module]) -> Self {
        Self {
            names: modules.iter().map(|m| m.name.clone()).collect(),
            indices: (0..modules.len()).collect(),
        }
    }

    /// Topologically sort `modules` by `evaluation-depends-on` and the root.
    pub fn compute(modules: &[Module], evaluation_root: Option<&str>) -> miette::Result<Self> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let mut by_name: HashMap<&str, NodeIndex> = HashMap::new();
        for (i, module) in modules.iter().enumerate() {
            by_name.insert(module.name.as_str(), graph.add_node(i));
        }

        if let Some(root) = evaluation_root {
            let &root_idx = by_name.get(root).ok_or_else(|| RetargetError::Workspace {
                message: format!("evaluation-root '{root}' is not a workspace member"),
            })?;
            for (&name, &idx) in &by_name {
                if name != root {
                    graph.add_edge(root_idx, idx, ());
                }
            }
        }

        for module in modules {
            let to = by_name[module.name.as_str()];
            for dep in &module.evaluation_depends_on {
                let &from = by_name.get(dep.as_str()).ok_or_else(|| RetargetError::Workspace {
                    message: format!(
                        "module '{}' is evaluated after unknown module '{dep}'",
                        module.name
                    ),
                })?;
                graph.add_edge(from, to, ());
            }
        }

        let indices = stable_topological_order(&graph).map_err(|stuck| RetargetError::Workspace {
            message: format!(
                "evaluation order has a cycle involving module '{}'",
                modules[stuck].name
            ),
        })?;

        Ok(Self {
            names: indices.iter().map(|&i| modules[i].name.clone()).collect(),
            indices,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Kahn's algorithm, always picking the lowest declaration index available.
/// On a cycle, returns the declaration index of a module stuck in it.
fn stable_topological_order(graph: &DiGraph<usize, ()>) -> Result<Vec<usize>, usize> {
    let mut in_degree: HashMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|n| (n, graph.neighbors_directed(n, Direction::Incoming).count()))
        .collect();

    let mut ready: BinaryHeap<Reverse<(usize, NodeIndex)>> = graph
        .node_indices()
        .filter(|n| in_degree[n] == 0)
        .map(|n| Reverse((graph[n], n)))
        .collect();

    let mut ordered = Vec::with_capacity(graph.node_count());
    while let Some(Reverse((module, node))) = ready.pop() {
        ordered.push(module);
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            if let Some(degree) = in_degree.get_mut(&next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse((graph[next], next)));
                }
            }
        }
    }

    if ordered.len() == graph.node_count() {
        Ok(ordered)
    } else {
        let stuck = graph
            .node_indices()
            .filter(|n| in_degree[n] > 0)
            .map(|n| graph[n])
            .min()
            .unwrap_or_default();
        Err(stuck)
    }
}
