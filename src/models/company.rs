//! Company directory models

/// Ordered list of IBEX35 company names, 1-indexed when shown to the user.
///
/// The order matches the remote listing at the time the cache was created.
/// The directory is never mutated in place; it is only regenerated by
/// deleting the cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDirectory {
    names: Vec<String>,
}

impl CompanyDirectory {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 1-based lookup, matching the numbers printed in the menu.
    pub fn get(&self, index: usize) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.names.get(index - 1).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
