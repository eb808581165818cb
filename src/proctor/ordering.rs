//! Ordering of overlapping verification responses.
//!
//! Cycles fire on a fixed period whether or not the previous request has
//! finished, so responses can complete out of order.

use serde::{Deserialize, Serialize};

/// How responses that complete out of order are applied.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Apply every response in completion order. An older, slower response
    /// can overwrite a newer one.
    #[default]
    Unordered,
    /// Drop any response issued before the last applied one.
    LatestWins,
}

/// Tracks the last applied request sequence number.
#[derive(Debug, Clone)]
pub struct SequenceGate {
    ordering: ResponseOrdering,
    last_applied: u64,
}

impl SequenceGate {
    pub fn new(ordering: ResponseOrdering) -> Self {
        Self {
            ordering,
            last_applied: 0,
        }
    }

    /// Decides whether the response to request `sequence` may be applied,
    /// and records it if so.
    pub fn admit(&mut self, sequence: u64) -> bool {
        match self.ordering {
            ResponseOrdering::Unordered => {
                self.last_applied = self.last_applied.max(sequence);
                true
            }
            ResponseOrdering::LatestWins => {
                if sequence > self.last_applied {
                    self.last_applied = sequence;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Highest sequence number applied so far (0 before the first).
    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unordered_admits_everything() {
        let mut gate = SequenceGate::new(ResponseOrdering::Unordered);
        assert!(gate.admit(2));
        assert!(gate.admit(1));
        assert!(gate.admit(1));
        assert_eq!(gate.last_applied(), 2);
    }

    #[test]
    fn test_latest_wins_drops_stale() {
        let mut gate = SequenceGate::new(ResponseOrdering::LatestWins);
        assert!(gate.admit(1));
        assert!(gate.admit(3));
        assert!(!gate.admit(2));
        assert!(!gate.admit(3));
        assert!(gate.admit(4));
        assert_eq!(gate.last_applied(), 4);
    }
}
