use indexmap::IndexSet;

/// Insertion-ordered string table; the position of a string is its wire index.
#[derive(Debug, Default)]
pub struct StringInterner {
    data: IndexSet<String>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, inserting it at the end if unseen.
    pub fn intern(&mut self, value: &str) -> u64 {
        if let Some(idx) = self.data.get_index_of(value) {
            return idx as u64;
        }
        self.data.insert_full(value.to_string()).0 as u64
    }

    /// Index of `value` without inserting it.
    pub fn index_of(&self, value: &str) -> Option<u64> {
        self.data.get_index_of(value).map(|idx| idx as u64)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drain the table in index order.
    pub fn take(&mut self) -> Vec<String> {
        self.data.drain(..).collect()
    }
}
