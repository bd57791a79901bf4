//! The canonical consent record and the merge rules that advance it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Tri-state consent for one category. `Unknown` covers both "not yet asked"
/// and any wire token we don't recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentStatus {
    Yes,
    No,
    Unknown,
}

impl ConsentStatus {
    /// Fixed token map. Unrecognized tokens are accepted silently as
    /// `Unknown` — categories added by newer callers must not break us.
    pub fn from_token(token: &str) -> Self {
        match token {
            "y" => ConsentStatus::Yes,
            "n" => ConsentStatus::No,
            _ => ConsentStatus::Unknown,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            ConsentStatus::Yes => "y",
            ConsentStatus::No => "n",
            ConsentStatus::Unknown => "u",
        }
    }
}

/// One consent snapshot: category → status, plus the time of the most recent
/// contributing update.
///
/// Immutable by convention — merge produces a new record, the old one is
/// replaced wholesale. An empty `categories` map is valid and means "no
/// consent information known". `last_updated` is `None` only for a record
/// that has never absorbed an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsentRecord {
    pub categories: BTreeMap<String, ConsentStatus>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A partial update: only the categories the caller wants to change.
/// Absence means "leave unchanged", never "clear".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentUpdate {
    pub categories: BTreeMap<String, ConsentStatus>,
    pub time: DateTime<Utc>,
}

impl ConsentUpdate {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl ConsentRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn status(&self, category: &str) -> Option<ConsentStatus> {
        self.categories.get(category).copied()
    }

    /// Merge a partial update into this record, producing the next record.
    ///
    /// Every category present in `update` overwrites the current value,
    /// including yes→no and no→yes. Categories absent from `update` are
    /// retained. `last_updated` is always the update's time — arrival order
    /// wins; this function never compares timestamps.
    ///
    /// Pure and total: no I/O, no failure path. Applying the same update
    /// twice yields the same categories as applying it once.
    pub fn merged(&self, update: &ConsentUpdate) -> ConsentRecord {
        let mut categories = self.categories.clone();
        for (category, status) in &update.categories {
            categories.insert(category.clone(), *status);
        }
        ConsentRecord {
            categories,
            last_updated: Some(update.time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(entries: &[(&str, ConsentStatus)], time: DateTime<Utc>) -> ConsentUpdate {
        ConsentUpdate {
            categories: entries
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            time,
        }
    }

    #[test]
    fn token_map_is_tolerant() {
        assert_eq!(ConsentStatus::from_token("y"), ConsentStatus::Yes);
        assert_eq!(ConsentStatus::from_token("n"), ConsentStatus::No);
        assert_eq!(ConsentStatus::from_token("u"), ConsentStatus::Unknown);
        assert_eq!(ConsentStatus::from_token("p"), ConsentStatus::Unknown);
        assert_eq!(ConsentStatus::from_token(""), ConsentStatus::Unknown);
    }

    #[test]
    fn merge_overwrites_present_and_retains_absent() {
        let t1 = Utc::now();
        let record = ConsentRecord::empty().merged(&update(
            &[("adId", ConsentStatus::No), ("collect", ConsentStatus::Yes)],
            t1,
        ));

        let t2 = t1 + chrono::Duration::seconds(5);
        let merged = record.merged(&update(&[("collect", ConsentStatus::No)], t2));

        assert_eq!(merged.status("adId"), Some(ConsentStatus::No));
        assert_eq!(merged.status("collect"), Some(ConsentStatus::No));
        assert_eq!(merged.last_updated, Some(t2));
        // Source record untouched.
        assert_eq!(record.status("collect"), Some(ConsentStatus::Yes));
    }

    #[test]
    fn merge_flips_in_both_directions() {
        let t = Utc::now();
        let record =
            ConsentRecord::empty().merged(&update(&[("collect", ConsentStatus::Yes)], t));
        let flipped = record.merged(&update(&[("collect", ConsentStatus::No)], t));
        let back = flipped.merged(&update(&[("collect", ConsentStatus::Yes)], t));

        assert_eq!(flipped.status("collect"), Some(ConsentStatus::No));
        assert_eq!(back.status("collect"), Some(ConsentStatus::Yes));
    }

    #[test]
    fn merge_is_idempotent_on_categories() {
        let t = Utc::now();
        let u = update(&[("adId", ConsentStatus::No)], t);

        let once = ConsentRecord::empty().merged(&u);
        let twice = once.merged(&u);

        assert_eq!(once.categories, twice.categories);
        assert_eq!(twice.last_updated, Some(t));
    }

    #[test]
    fn merge_does_not_reject_earlier_timestamps() {
        let later = Utc::now();
        let earlier = later - chrono::Duration::hours(1);

        let record =
            ConsentRecord::empty().merged(&update(&[("collect", ConsentStatus::Yes)], later));
        let merged = record.merged(&update(&[("collect", ConsentStatus::No)], earlier));

        // Arrival order wins unconditionally.
        assert_eq!(merged.status("collect"), Some(ConsentStatus::No));
        assert_eq!(merged.last_updated, Some(earlier));
    }

    #[test]
    fn empty_update_still_bumps_last_updated() {
        let t1 = Utc::now();
        let t2 = t1 + chrono::Duration::seconds(1);
        let record =
            ConsentRecord::empty().merged(&update(&[("collect", ConsentStatus::Yes)], t1));

        let merged = record.merged(&update(&[], t2));

        // Callers filter empty updates before merging; the engine itself
        // treats them as a metadata-only merge.
        assert_eq!(merged.categories, record.categories);
        assert_eq!(merged.last_updated, Some(t2));
    }

    #[test]
    fn unknown_is_a_first_class_merge_value() {
        let t = Utc::now();
        let record =
            ConsentRecord::empty().merged(&update(&[("collect", ConsentStatus::Yes)], t));
        let merged = record.merged(&update(&[("collect", ConsentStatus::Unknown)], t));

        assert_eq!(merged.status("collect"), Some(ConsentStatus::Unknown));
    }
}
