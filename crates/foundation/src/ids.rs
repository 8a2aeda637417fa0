use serde::{Deserialize, Serialize};

/// Registry-assigned layer identifier.
///
/// Values start at 1 and are handed out by an [`IdSequence`]; an id is never
/// reissued by the sequence that produced it, even after its layer is removed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl LayerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next call to [`IdSequence::next_id`] will return.
    pub fn peek(&self) -> LayerId {
        LayerId(self.next)
    }

    pub fn next_id(&mut self) -> LayerId {
        let id = LayerId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::{IdSequence, LayerId};

    #[test]
    fn sequence_starts_at_one_and_increments() {
        let mut ids = IdSequence::new();
        assert_eq!(ids.peek(), LayerId(1));
        assert_eq!(ids.next_id(), LayerId(1));
        assert_eq!(ids.next_id(), LayerId(2));
        assert_eq!(ids.peek(), LayerId(3));
    }

    #[test]
    fn ids_order_by_value() {
        assert!(LayerId(2) < LayerId(10));
        assert_eq!(LayerId(7).to_string(), "#7");
    }
}
