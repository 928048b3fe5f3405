//! A single edge of the compressed prefix tree.
//!
//! # Responsibilities
//! - Hold the edge label, the owned child edges and an optional terminal value
//! - Derive the edge priority from its label
//! - Keep children ordered by descending priority
//!
//! # Design Decisions
//! - Children are exclusively owned (`Vec<Node<T>>`); traversal is strictly top-down
//! - Sorting is stable, so equal priorities keep insertion order

/// Label byte that starts a named parameter token.
pub const PARAM: u8 = b':';

/// Label byte that starts a wildcard token.
pub const WILDCARD: u8 = b'*';

/// An edge of the route tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    label: String,
    children: Vec<Node<T>>,
    value: Option<T>,
    priority: u32,
}

impl<T> Node<T> {
    /// Create a node with the given label and terminal value.
    pub fn new(label: impl Into<String>, value: Option<T>) -> Self {
        let label = label.into();
        let priority = priority(&label);
        Self {
            label,
            children: Vec::new(),
            value,
            priority,
        }
    }

    /// The substring of the path this edge represents.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the label, recomputing the priority.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.priority = priority(&self.label);
    }

    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node<T>> {
        &mut self.children
    }

    /// Take all children, leaving this node a leaf.
    pub(crate) fn take_children(&mut self) -> Vec<Node<T>> {
        std::mem::take(&mut self.children)
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<T>) {
        self.value = value;
    }

    pub(crate) fn take_value(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Whether the label starts with a `:` or `*` token.
    pub fn is_dynamic(&self) -> bool {
        matches!(self.label.as_bytes().first(), Some(&PARAM) | Some(&WILDCARD))
    }

    /// Append a child and restore the priority order.
    pub(crate) fn push_child(&mut self, child: Node<T>) {
        self.children.push(child);
        self.sort();
    }

    /// Order children by descending priority.
    pub fn sort(&mut self) {
        self.children.sort_by(|a, b| b.priority.cmp(&a.priority));
    }
}

/// Priority of an edge label.
///
/// A label starting with `*` scores 0 and one starting with `:` scores 1.
/// Any other label scores one more than the number of literal characters
/// before its first token (or its whole length), so literal edges always
/// outrank parameter edges, which outrank wildcard edges.
pub fn priority(label: &str) -> u32 {
    let mut weight = 1;
    for (index, c) in label.chars().enumerate() {
        match c {
            '*' if index == 0 => return 0,
            ':' if index == 0 => return 1,
            '*' | ':' => break,
            _ => weight += 1,
        }
    }
    weight
}
