use std::collections::HashSet;

/// Bookmarked posting ids for the current session. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSet {
    ids: HashSet<u32>,
}

impl SavedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves `id` if absent, removes it otherwise. Returns true if `id` is now saved.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<u32> for SavedSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_inserts_then_removes() {
        let mut saved = SavedSet::new();
        assert!(saved.toggle(3));
        assert!(saved.contains(3));
        assert_eq!(saved.len(), 1);
        assert!(!saved.toggle(3));
        assert!(!saved.contains(3));
        assert!(saved.is_empty());
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let starts: [SavedSet; 3] = [
            SavedSet::new(),
            [1].into_iter().collect(),
            [1, 4, 9].into_iter().collect(),
        ];
        for start in starts {
            for id in [1, 4, 7, 42] {
                let mut saved = start.clone();
                saved.toggle(id);
                saved.toggle(id);
                assert_eq!(saved, start, "id {}", id);
            }
        }
    }
}
