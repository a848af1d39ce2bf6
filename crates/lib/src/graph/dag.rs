//! Dependency DAG over the actions of one build graph.
//!
//! Action A depends on action B when one of A's inputs is one of B's outputs.
//! The runner works this out on its own; the DAG exists so the emitter can
//! reject cycles and callers can reason about execution order.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::action::BuildAction;
use crate::error::{GenerateError, Result};

/// A DAG whose nodes are indices into an action list.
pub struct ActionDag {
  /// Edges run from producer to consumer.
  graph: DiGraph<usize, ()>,
  /// First output of each action, for error reporting.
  labels: Vec<PathBuf>,
}

impl ActionDag {
  pub fn from_actions(actions: &[BuildAction]) -> Self {
    let mut graph = DiGraph::with_capacity(actions.len(), actions.len());
    let nodes: Vec<NodeIndex> = (0..actions.len()).map(|i| graph.add_node(i)).collect();

    let mut producers: HashMap<&Path, NodeIndex> = HashMap::new();
    for (action, &node) in actions.iter().zip(&nodes) {
      for output in &action.outputs {
        producers.entry(output.as_path()).or_insert(node);
      }
    }

    for (action, &consumer) in actions.iter().zip(&nodes) {
      let mut linked = HashSet::new();
      for input in &action.inputs {
        if let Some(&producer) = producers.get(input.as_path())
          && linked.insert(producer)
        {
          graph.add_edge(producer, consumer, ());
        }
      }
    }

    let labels = actions
      .iter()
      .map(|a| a.outputs.first().cloned().unwrap_or_default())
      .collect();

    Self { graph, labels }
  }

  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  /// Indices of the actions `index` directly depends on, ascending.
  pub fn dependencies(&self, index: usize) -> Vec<usize> {
    let mut deps: Vec<usize> = self
      .graph
      .neighbors_directed(NodeIndex::new(index), Direction::Incoming)
      .map(|n| self.graph[n])
      .collect();
    deps.sort_unstable();
    deps
  }

  /// Action indices in an order where producers precede consumers.
  pub fn topological_order(&self) -> Result<Vec<usize>> {
    let sorted = toposort(&self.graph, None)
      .map_err(|cycle| GenerateError::CycleDetected(self.labels[self.graph[cycle.node_id()]].clone()))?;
    Ok(sorted.into_iter().map(|n| self.graph[n]).collect())
  }

  /// Group actions into waves: every action's dependencies sit in earlier
  /// waves. Indices within a wave are ascending.
  pub fn waves(&self) -> Result<Vec<Vec<usize>>> {
    let mut in_degree: HashMap<NodeIndex, usize> = self
      .graph
      .node_indices()
      .map(|n| (n, self.graph.neighbors_directed(n, Direction::Incoming).count()))
      .collect();
    let mut remaining: HashSet<NodeIndex> = self.graph.node_indices().collect();
    let mut waves = Vec::new();

    while !remaining.is_empty() {
      let mut ready: Vec<NodeIndex> = remaining.iter().filter(|n| in_degree[n] == 0).copied().collect();

      if ready.is_empty() {
        let stuck = remaining.iter().map(|n| self.graph[*n]).min().unwrap_or_default();
        return Err(GenerateError::CycleDetected(self.labels[stuck].clone()));
      }

      ready.sort_unstable();
      for node in &ready {
        remaining.remove(node);
        for dependent in self.graph.neighbors_directed(*node, Direction::Outgoing) {
          if let Some(degree) = in_degree.get_mut(&dependent) {
            *degree = degree.saturating_sub(1);
          }
        }
      }

      waves.push(ready.into_iter().map(|n| self.graph[n]).collect());
    }

    Ok(waves)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::action::Rule;

  fn action(rule: Rule, inputs: &[&str], outputs: &[&str]) -> BuildAction {
    outputs
      .iter()
      .fold(BuildAction::new(rule).inputs(inputs.iter().copied()), |a, o| a.output(*o))
  }

  fn pipeline() -> Vec<BuildAction> {
    vec![
      action(Rule::Compile, &["a.m"], &["a.o"]),
      action(Rule::Compile, &["b.m"], &["b.o"]),
      action(Rule::Link, &["a.o", "b.o"], &["app"]),
      action(Rule::IbtoolCompile, &["Main.storyboard"], &["tmp/Main.storyboardc"]),
      action(Rule::IbtoolLink, &["tmp/Main.storyboardc"], &["app.app/Main.storyboardc"]),
      action(Rule::FinalLink, &["app", "app.app/Main.storyboardc"], &["app.html"]),
    ]
  }

  #[test]
  fn dependencies_follow_shared_paths() {
    let dag = ActionDag::from_actions(&pipeline());
    assert_eq!(dag.len(), 6);
    assert_eq!(dag.dependencies(0), Vec::<usize>::new());
    assert_eq!(dag.dependencies(2), vec![0, 1]);
    assert_eq!(dag.dependencies(4), vec![3]);
    assert_eq!(dag.dependencies(5), vec![2, 4]);
  }

  #[test]
  fn topological_order_puts_producers_first() {
    let order = ActionDag::from_actions(&pipeline()).topological_order().unwrap();
    let position = |i: usize| order.iter().position(|&x| x == i).unwrap();
    assert!(position(0) < position(2));
    assert!(position(1) < position(2));
    assert!(position(3) < position(4));
    assert!(position(2) < position(5));
    assert!(position(4) < position(5));
  }

  #[test]
  fn waves_group_independent_actions() {
    let waves = ActionDag::from_actions(&pipeline()).waves().unwrap();
    assert_eq!(waves, vec![vec![0, 1, 3], vec![2, 4], vec![5]]);
  }

  #[test]
  fn cycles_are_reported_with_a_path() {
    let actions = vec![
      action(Rule::Copy, &["b"], &["a"]),
      action(Rule::Copy, &["a"], &["b"]),
    ];
    let dag = ActionDag::from_actions(&actions);
    assert!(matches!(dag.topological_order(), Err(GenerateError::CycleDetected(_))));
    assert!(matches!(dag.waves(), Err(GenerateError::CycleDetected(_))));
  }

  #[test]
  fn empty_graph_has_no_waves() {
    let dag = ActionDag::from_actions(&[]);
    assert!(dag.is_empty());
    assert!(dag.waves().unwrap().is_empty());
  }
}
