/// Postings shown before any "load more".
pub const INITIAL_VISIBLE: usize = 8;
/// Postings added per "load more".
pub const LOAD_MORE_STEP: usize = 4;

pub fn reveal(cursor: usize, increment: usize) -> usize {
    cursor.saturating_add(increment)
}

/// How many postings of the filtered result are currently revealed.
///
/// The cursor only grows. It may exceed the length of the result it is applied
/// to (for instance after a narrower search); slicing clamps, the cursor does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealCursor(usize);

impl Default for RevealCursor {
    fn default() -> Self {
        Self(INITIAL_VISIBLE)
    }
}

impl RevealCursor {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.0
    }

    pub fn load_more(self) -> Self {
        Self(reveal(self.0, LOAD_MORE_STEP))
    }

    pub fn with_count(count: usize) -> Self {
        Self(count)
    }

    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.0.min(items.len())]
    }

    pub fn has_more(&self, len: usize) -> bool {
        len > self.0
    }
}
