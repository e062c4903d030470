use serde::{Deserialize, Serialize};

/// Persisted shape of the history stack.
///
/// `index` is -1 when empty. `base` is the absolute sequence number of entry 0;
/// records written without it read back as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMeta {
    pub length: usize,
    pub index: isize,
    #[serde(default)]
    pub base: u64,
}

impl HistoryMeta {
    pub const EMPTY: HistoryMeta = HistoryMeta {
        length: 0,
        index: -1,
        base: 0,
    };

    /// An index inside the stack, or -1 for an empty one.
    pub fn is_consistent(&self) -> bool {
        if self.length == 0 {
            self.index == -1
        } else {
            self.index >= 0 && (self.index as usize) < self.length
        }
    }
}

impl Default for HistoryMeta {
    fn default() -> Self {
        Self::EMPTY
    }
}
