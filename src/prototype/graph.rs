//! Parent graph over prototypes that failed to resolve.
//!
//! Only used on the error path, to explain why inheritance resolution made
//! no progress: either a parent id that nothing defines, or a cycle.

use std::collections::{BTreeMap, BTreeSet};

/// Why a set of prototypes cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    /// `child` names a parent that is defined nowhere.
    MissingParent { child: String, parent: String },
    /// The ids form a loop; the first id is repeated at the end.
    Cycle(Vec<String>),
}

/// Child → declared parents, restricted to unresolved prototypes.
#[derive(Debug, Default)]
pub struct ParentGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl ParentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `child` inherits from `parent`.
    pub fn add_edge(&mut self, child: impl Into<String>, parent: impl Into<String>) {
        self.edges
            .entry(child.into())
            .or_default()
            .insert(parent.into());
    }

    /// Ensure `id` is a node even if it has no edges.
    pub fn register(&mut self, id: impl Into<String>) {
        self.edges.entry(id.into()).or_default();
    }

    pub fn parents_of(&self, id: &str) -> impl Iterator<Item = &String> {
        self.edges.get(id).into_iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Explain why nothing in the graph can resolve.
    ///
    /// `known` holds ids that did resolve. A parent that is neither known
    /// nor a node of this graph is a dangling reference; otherwise every
    /// node waits on another node, so a cycle exists.
    pub fn blocker(&self, known: impl Fn(&str) -> bool) -> Option<Blocker> {
        for (child, parents) in &self.edges {
            if let Some(parent) = parents
                .iter()
                .find(|p| !known(p.as_str()) && !self.edges.contains_key(p.as_str()))
            {
                return Some(Blocker::MissingParent {
                    child: child.clone(),
                    parent: parent.clone(),
                });
            }
        }

        self.find_cycle().map(Blocker::Cycle)
    }

    /// Depth-first search for a cycle, in id order for stable reporting.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited = BTreeSet::new();
        let mut on_stack = BTreeSet::new();
        let mut path = Vec::new();

        for start in self.edges.keys() {
            if visited.contains(start) {
                continue;
            }
            if let Some(cycle) = self.walk(start, &mut visited, &mut on_stack, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn walk<'a>(
        &'a self,
        node: &'a String,
        visited: &mut BTreeSet<&'a String>,
        on_stack: &mut BTreeSet<&'a String>,
        path: &mut Vec<&'a String>,
    ) -> Option<Vec<String>> {
        visited.insert(node);
        on_stack.insert(node);
        path.push(node);

        for next in self.parents_of(node) {
            if !self.edges.contains_key(next) {
                continue;
            }
            if on_stack.contains(next) {
                let start = path.iter().position(|n| *n == next).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
                cycle.push(next.clone());
                return Some(cycle);
            }
            if !visited.contains(next) {
                if let Some(cycle) = self.walk(next, visited, on_stack, path) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        on_stack.remove(node);
        None
    }
}
