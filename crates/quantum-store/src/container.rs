//! # Record Container
//!
//! The generic container backing every entity store: an ordered list of
//! records plus the ID counter, serialized together as one snapshot.
//!
//! ## ID Generation
//! IDs keep the human-readable sequential format (`V001`, `ORD007`,
//! `COM0012`) but are allocated from a monotonic counter that is
//! persisted *inside* the container. Deriving the next ordinal from the
//! current record count hands out a duplicate after a delete-then-create
//! sequence; the stored counter never goes backwards, so an ID is never
//! reused. Containers saved before the counter existed are healed on
//! load by [`Container::restore`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Implemented by every record type a container can hold.
pub trait HasId {
    fn record_id(&self) -> &str;
}

/// An ordered record container with a persisted ID counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container<T> {
    records: Vec<T>,
    /// Next ordinal to hand out. Monotonic; never derived from
    /// `records.len()`.
    #[serde(default)]
    next_seq: u64,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Container {
            records: Vec::new(),
            next_seq: 1,
        }
    }
}

impl<T> Container<T>
where
    T: HasId + Clone + Serialize + DeserializeOwned,
{
    /// Repairs the counter after deserializing a snapshot.
    ///
    /// Legacy payloads carry no counter (deserialized as 0), and a
    /// hand-edited one could carry a counter behind its own records.
    /// Advance past both the record count and the highest ordinal
    /// embedded in an existing ID.
    pub fn restore(&mut self) {
        let floor = self.records.len() as u64 + 1;
        if self.next_seq < floor {
            self.next_seq = floor;
        }
        for record in &self.records {
            if let Some(ordinal) = parse_ordinal(record.record_id()) {
                if self.next_seq <= ordinal {
                    self.next_seq = ordinal + 1;
                }
            }
        }
    }

    /// Hands out the next ID in `<prefix><zero-padded ordinal>` form.
    pub fn allocate_id(&mut self, prefix: &str, width: usize) -> String {
        let id = format!("{prefix}{:0width$}", self.next_seq);
        self.next_seq += 1;
        id
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    /// First record with the given ID, in insertion order.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.record_id() == id)
    }

    /// Applies `mutate` to the record if present. Returns whether a
    /// record was found; a missing ID is a silent no-op.
    pub fn update_with<F>(&mut self, id: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.records.iter_mut().find(|r| r.record_id() == id) {
            Some(record) => {
                mutate(record);
                true
            }
            None => false,
        }
    }

    /// Removes the record if present; missing ID is a silent no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.record_id() != id);
        self.records.len() != before
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Extracts the numeric ordinal from an ID like `COM0012` → 12.
fn parse_ordinal(id: &str) -> Option<u64> {
    let digits = id.trim_start_matches(|c: char| !c.is_ascii_digit());
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Rec {
        id: String,
    }

    impl HasId for Rec {
        fn record_id(&self) -> &str {
            &self.id
        }
    }

    fn rec(container: &mut Container<Rec>) -> String {
        let id = container.allocate_id("V", 3);
        container.push(Rec { id: id.clone() });
        id
    }

    #[test]
    fn test_sequential_ids() {
        let mut c = Container::<Rec>::default();
        assert_eq!(rec(&mut c), "V001");
        assert_eq!(rec(&mut c), "V002");
        assert_eq!(rec(&mut c), "V003");
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut c = Container::<Rec>::default();
        rec(&mut c);
        rec(&mut c);
        let third = rec(&mut c);
        assert!(c.remove(&third));
        // A count-derived ordinal would hand out V003 again here.
        assert_eq!(rec(&mut c), "V004");
    }

    #[test]
    fn test_restore_heals_missing_counter() {
        let raw = r#"{"records":[{"id":"V001"},{"id":"V007"}]}"#;
        let mut c: Container<Rec> = serde_json::from_str(raw).unwrap();
        c.restore();
        assert_eq!(rec(&mut c), "V008");
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut c = Container::<Rec>::default();
        rec(&mut c);
        assert!(!c.update_with("V999", |_| panic!("must not run")));
        assert!(!c.remove("V999"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_get_returns_first_match() {
        let mut c = Container::<Rec>::default();
        c.push(Rec {
            id: "X001".to_string(),
        });
        c.push(Rec {
            id: "X001".to_string(),
        });
        assert_eq!(c.len(), 2);
        assert!(c.get("X001").is_some());
    }
}
