//! Meet selector keyed by meet id.
//!
//! Labels are for display only; two meets sharing a label stay distinct.

use std::collections::HashMap;

use crate::types::{Meet, MeetOption};

/// Options over a list of meets, in upstream order
#[derive(Debug, Clone, Default)]
pub struct MeetSelector {
    meets: Vec<Meet>,
    by_id: HashMap<String, usize>,
}

impl MeetSelector {
    pub fn new(meets: Vec<Meet>) -> Self {
        let mut selector = Self::default();
        for meet in meets {
            // A repeated id replaces the earlier record in place
            match selector.by_id.get(&meet.meet_id) {
                Some(&idx) => selector.meets[idx] = meet,
                None => {
                    selector.by_id.insert(meet.meet_id.clone(), selector.meets.len());
                    selector.meets.push(meet);
                }
            }
        }
        selector
    }

    pub fn is_empty(&self) -> bool {
        self.meets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.meets.len()
    }

    pub fn meets(&self) -> &[Meet] {
        &self.meets
    }

    /// Options as (id, label) pairs
    pub fn options(&self) -> Vec<MeetOption> {
        self.meets
            .iter()
            .map(|m| MeetOption {
                meet_id: m.meet_id.clone(),
                label: m.label(),
            })
            .collect()
    }

    /// Labels for an interactive list. Colliding labels get the meet id appended.
    pub fn display_labels(&self) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for meet in &self.meets {
            *counts.entry(meet.label()).or_default() += 1;
        }

        self.meets
            .iter()
            .map(|m| {
                let label = m.label();
                if counts.get(&label).copied().unwrap_or(0) > 1 {
                    format!("{} [{}]", label, m.meet_id)
                } else {
                    label
                }
            })
            .collect()
    }

    /// Meet at a list position
    pub fn select_index(&self, index: usize) -> Option<&Meet> {
        self.meets.get(index)
    }

    /// Meet by id
    pub fn select(&self, meet_id: &str) -> Option<&Meet> {
        self.by_id.get(meet_id).map(|&idx| &self.meets[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meet(id: &str, track: &str, country: &str) -> Meet {
        Meet {
            meet_id: id.to_string(),
            track_name: track.to_string(),
            country: country.to_string(),
            date: "2024-05-04".to_string(),
        }
    }

    #[test]
    fn test_single_meet() {
        let selector = MeetSelector::new(vec![meet("1", "Saratoga", "USA")]);
        let options = selector.options();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "Saratoga (USA)");
        assert_eq!(selector.select_index(0).unwrap().meet_id, "1");
        assert_eq!(selector.select("1").unwrap().track_name, "Saratoga");
    }

    #[test]
    fn test_duplicate_labels_resolve_to_chosen_id() {
        let selector = MeetSelector::new(vec![
            meet("A", "Saratoga", "USA"),
            meet("B", "Saratoga", "USA"),
        ]);

        assert_eq!(selector.len(), 2);
        assert_eq!(selector.select_index(0).unwrap().meet_id, "A");
        assert_eq!(selector.select_index(1).unwrap().meet_id, "B");
        assert_eq!(selector.select("A").unwrap().meet_id, "A");
        assert_eq!(selector.select("B").unwrap().meet_id, "B");

        let options = selector.options();
        assert_eq!(options[0].label, options[1].label);
    }

    #[test]
    fn test_display_labels_disambiguate_collisions() {
        let selector = MeetSelector::new(vec![
            meet("A", "Saratoga", "USA"),
            meet("B", "Saratoga", "USA"),
            meet("C", "Woodbine", "CAN"),
        ]);
        assert_eq!(
            selector.display_labels(),
            vec!["Saratoga (USA) [A]", "Saratoga (USA) [B]", "Woodbine (CAN)"]
        );
    }

    #[test]
    fn test_repeated_id_keeps_position() {
        let selector = MeetSelector::new(vec![
            meet("1", "Old Name", "USA"),
            meet("2", "Keeneland", "USA"),
            meet("1", "Churchill Downs", "USA"),
        ]);
        assert_eq!(selector.len(), 2);
        assert_eq!(selector.select_index(0).unwrap().track_name, "Churchill Downs");
    }

    #[test]
    fn test_unknown_selection() {
        let selector = MeetSelector::new(vec![]);
        assert!(selector.is_empty());
        assert!(selector.select("missing").is_none());
        assert!(selector.select_index(0).is_none());
    }
}
