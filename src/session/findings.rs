use crate::models::Finding;

/// Append-only collection of findings in arrival order.
///
/// Never deduplicates: the backend may legitimately report the same
/// location under several categories. Cleared wholesale on a new
/// submission, never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct FindingsStore {
    items: Vec<Finding>,
}

impl FindingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, finding: Finding) {
        self.items.push(finding);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Finding] {
        &self.items
    }
}
