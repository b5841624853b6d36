//! The brain-region ontology tree.

use std::collections::HashMap;

use cmn::{CmnError, CmnResult};

/// One node of the region hierarchy.
#[derive(Debug, Clone)]
pub struct RegionNode {
    pub id: u32,
    pub parent_id: Option<u32>,
    pub acronym: String,
}

impl RegionNode {
    pub fn new<S: Into<String>>(id: u32, parent_id: Option<u32>, acronym: S)
            -> RegionNode {
        RegionNode { id, parent_id, acronym: acronym.into() }
    }
}

/// An immutable tree of brain regions.
///
/// Built once from parsed hierarchy data, then shared by reference across
/// every component that needs it. Lookups never mutate.
#[derive(Debug, Clone)]
pub struct RegionHierarchy {
    nodes: HashMap<u32, RegionNode>,
    children: HashMap<u32, Vec<u32>>,
}

impl RegionHierarchy {
    pub fn new(nodes: Vec<RegionNode>) -> CmnResult<RegionHierarchy> {
        let mut node_map = HashMap::with_capacity(nodes.len());
        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();

        for node in nodes {
            let id = node.id;
            if let Some(parent_id) = node.parent_id {
                children.entry(parent_id).or_insert_with(Vec::new).push(id);
            }
            if node_map.insert(id, node).is_some() {
                return CmnError::err(format!("RegionHierarchy::new: \
                    duplicate region id: {}.", id));
            }
        }

        // Re-scan for structural problems now that all ids are known:
        // every parent must exist and every parent chain must terminate.
        for node in node_map.values() {
            let mut hops = 0;
            let mut current = node;

            while let Some(parent_id) = current.parent_id {
                current = match node_map.get(&parent_id) {
                    Some(parent) => parent,
                    None => return CmnError::err(format!(
                        "RegionHierarchy::new: region {} ('{}') references \
                        unknown parent {}.", current.id, current.acronym,
                        parent_id)),
                };
                hops += 1;
                if hops > node_map.len() {
                    return CmnError::err(format!("RegionHierarchy::new: \
                        the parent chain of region {} ('{}') does not \
                        terminate.", node.id, node.acronym));
                }
            }
        }

        Ok(RegionHierarchy { nodes: node_map, children })
    }

    pub fn node(&self, id: u32) -> Option<&RegionNode> {
        self.nodes.get(&id)
    }

    pub fn acronym(&self, id: u32) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.acronym.as_str())
    }

    pub fn parent(&self, id: u32) -> Option<&RegionNode> {
        self.nodes.get(&id)
            .and_then(|n| n.parent_id)
            .and_then(|pid| self.nodes.get(&pid))
    }

    /// The first region carrying `acronym`, if any.
    pub fn find_by_acronym(&self, acronym: &str) -> Option<&RegionNode> {
        self.nodes.values().find(|n| n.acronym == acronym)
    }

    /// Ids of `id` and every region beneath it.
    pub fn descendants(&self, id: u32) -> Vec<u32> {
        let mut ids = Vec::new();
        let mut pending = vec![id];

        while let Some(next) = pending.pop() {
            if self.nodes.contains_key(&next) {
                ids.push(next);
                if let Some(kids) = self.children.get(&next) {
                    pending.extend(kids.iter().cloned());
                }
            }
        }

        ids
    }

    /// Walks from `id` up the parent chain (inclusive) and returns the
    /// first node satisfying `pred`, or `None` when the root is passed
    /// without a match.
    pub fn ascend_until<F>(&self, id: u32, pred: F) -> Option<&RegionNode>
            where F: Fn(&RegionNode) -> bool {
        let mut current = self.nodes.get(&id);

        while let Some(node) = current {
            if pred(node) {
                return Some(node);
            }
            current = node.parent_id.and_then(|pid| self.nodes.get(&pid));
        }

        None
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
