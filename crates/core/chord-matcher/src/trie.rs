use std::collections::HashMap;
use std::hash::Hash;

use crate::error::TrieError;

type NodeId = usize;

const ROOT: NodeId = 0;

/// How a looked-up path relates to the stored paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    ValueWithChildren,
    ValueNoChildren,
    /// The path is a strict prefix of at least one stored path.
    NoValueWithChildren,
    NoValueNoChildren,
}

impl LookupStatus {
    pub fn has_value(self) -> bool {
        matches!(
            self,
            LookupStatus::ValueWithChildren | LookupStatus::ValueNoChildren
        )
    }

    pub fn has_children(self) -> bool {
        matches!(
            self,
            LookupStatus::ValueWithChildren | LookupStatus::NoValueWithChildren
        )
    }
}

#[derive(Debug)]
struct Node<K, V> {
    value: Option<V>,
    children: HashMap<K, NodeId>,
}

impl<K, V> Default for Node<K, V> {
    fn default() -> Self {
        Self {
            value: None,
            children: HashMap::new(),
        }
    }
}

/// Prefix tree over key sequences. Nodes live in an arena and are addressed by index; pruned
/// nodes go to a free list and get reused by later inserts.
///
/// Every node other than the root either carries a value or has children.
#[derive(Debug)]
pub struct ChordTrie<K, V> {
    nodes: Vec<Node<K, V>>,
    free: Vec<NodeId>,
    len: usize,
    longest: usize,
}

impl<K, V> Default for ChordTrie<K, V>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChordTrie<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            free: Vec::new(),
            len: 0,
            longest: 0,
        }
    }

    /// Number of value-bearing paths.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn longest_path_len(&self) -> usize {
        self.longest
    }

    pub fn insert(&mut self, path: &[K], value: V) -> Result<(), TrieError> {
        if path.is_empty() {
            return Err(TrieError::EmptyPath);
        }
        if self.find(path).is_some_and(|id| self.nodes[id].value.is_some()) {
            return Err(TrieError::DuplicatePath);
        }

        let mut current = ROOT;
        for key in path {
            current = match self.nodes[current].children.get(key) {
                Some(&child) => child,
                None => {
                    let child = self.alloc();
                    self.nodes[current].children.insert(key.clone(), child);
                    child
                }
            };
        }

        self.nodes[current].value = Some(value);
        self.len += 1;
        self.longest = self.longest.max(path.len());
        Ok(())
    }

    pub fn lookup(&self, path: &[K]) -> (Option<&V>, LookupStatus) {
        let Some(id) = self.find(path) else {
            return (None, LookupStatus::NoValueNoChildren);
        };

        let node = &self.nodes[id];
        let has_children = !node.children.is_empty();
        let status = match (node.value.is_some(), has_children) {
            (true, true) => LookupStatus::ValueWithChildren,
            (true, false) => LookupStatus::ValueNoChildren,
            (false, true) => LookupStatus::NoValueWithChildren,
            (false, false) => LookupStatus::NoValueNoChildren,
        };
        (node.value.as_ref(), status)
    }

    pub fn get(&self, path: &[K]) -> Option<&V> {
        self.lookup(path).0
    }

    pub fn get_mut(&mut self, path: &[K]) -> Option<&mut V> {
        let id = self.find(path)?;
        self.nodes[id].value.as_mut()
    }

    pub fn contains_path(&self, path: &[K]) -> bool {
        self.lookup(path).1.has_value()
    }

    /// True if `prefix` leads into the tree, i.e. it is the leading part of at least one stored
    /// path (or a stored path itself). The empty prefix always matches.
    pub fn contains_subpath(&self, prefix: &[K]) -> bool {
        self.find(prefix).is_some()
    }

    /// Removes the value stored at `path` and prunes every ancestor that is left without value
    /// and without children. Pruning stops at the first ancestor that still holds a value or
    /// other children, so prefixes shared with other paths survive.
    pub fn remove(&mut self, path: &[K]) -> Option<V> {
        let mut trail = Vec::with_capacity(path.len() + 1);
        let mut current = ROOT;
        trail.push(current);
        for key in path {
            current = *self.nodes[current].children.get(key)?;
            trail.push(current);
        }

        let value = self.nodes[current].value.take()?;
        self.len -= 1;

        for depth in (1..trail.len()).rev() {
            let id = trail[depth];
            let node = &self.nodes[id];
            if node.value.is_some() || !node.children.is_empty() {
                break;
            }
            let parent = trail[depth - 1];
            self.nodes[parent].children.remove(&path[depth - 1]);
            self.free.push(id);
        }

        self.longest = self
            .all_paths()
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0);

        Some(value)
    }

    /// Every value-bearing path, in no particular order.
    pub fn all_paths(&self) -> Vec<Vec<K>> {
        let mut paths = Vec::with_capacity(self.len);
        let mut stack: Vec<(NodeId, Vec<K>)> = vec![(ROOT, Vec::new())];

        while let Some((id, prefix)) = stack.pop() {
            let node = &self.nodes[id];
            if node.value.is_some() {
                paths.push(prefix.clone());
            }
            for (key, &child) in &node.children {
                let mut path = prefix.clone();
                path.push(key.clone());
                stack.push((child, path));
            }
        }

        paths
    }

    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT] = Node::default();
        self.free.clear();
        self.len = 0;
        self.longest = 0;
    }

    fn find(&self, path: &[K]) -> Option<NodeId> {
        path.iter()
            .try_fold(ROOT, |id, key| self.nodes[id].children.get(key).copied())
    }

    fn alloc(&mut self) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Node::default();
                id
            }
            None => {
                self.nodes.push(Node::default());
                self.nodes.len() - 1
            }
        }
    }

    #[cfg(test)]
    fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}
