//! Capability filters and their canonical lookup keys.
//!
//! A filter names an unordered set of capability tags; an entity matches when
//! its component map is a superset of that set. Filter identity is set
//! membership, so the canonical [`FilterKey`] is a bitmask over
//! [`Capability`] bits: any order or duplication of tags collapses to the
//! same key. The key is computed once when the filter is built, never per
//! query.

use serde::{Deserialize, Serialize};

use crate::component::Capability;

/// Canonical lookup key for a set of capability tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterKey(u32);

impl FilterKey {
    /// The key of the empty tag set. Matches every entity.
    pub const EMPTY: FilterKey = FilterKey(0);

    /// Compute the canonical key for a sequence of tags.
    #[must_use]
    pub fn from_tags(tags: &[Capability]) -> Self {
        Self(tags.iter().fold(0, |mask, tag| mask | tag.bit()))
    }

    /// Returns `true` if an entity exposing `mask` satisfies this key, i.e.
    /// the mask covers every tag in the key.
    #[must_use]
    pub const fn matches(self, mask: u32) -> bool {
        self.0 & mask == self.0
    }

    /// The raw bitmask.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// An unordered set of capability tags an entity must expose to match.
///
/// Controllers hold one of these for their working set. The sorted tag list
/// is kept alongside the key for logs and introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFilter {
    tags: Vec<Capability>,
    key: FilterKey,
}

impl CapabilityFilter {
    /// Build a filter from tags in any order; duplicates collapse.
    #[must_use]
    pub fn new(tags: &[Capability]) -> Self {
        let mut tags = tags.to_vec();
        tags.sort_unstable();
        tags.dedup();
        let key = FilterKey::from_tags(&tags);
        Self { tags, key }
    }

    /// The canonical lookup key.
    #[must_use]
    pub fn key(&self) -> FilterKey {
        self.key
    }

    /// The tags, sorted and deduplicated.
    #[must_use]
    pub fn tags(&self) -> &[Capability] {
        &self.tags
    }

    /// Returns `true` if an entity exposing `mask` matches the filter.
    #[must_use]
    pub fn matches_mask(&self, mask: u32) -> bool {
        self.key.matches(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_independent() {
        let ab = CapabilityFilter::new(&[Capability::GuiElement, Capability::View]);
        let ba = CapabilityFilter::new(&[Capability::View, Capability::GuiElement]);
        assert_eq!(ab.key(), ba.key());
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_duplicates_collapse() {
        let once = CapabilityFilter::new(&[Capability::Transform]);
        let thrice = CapabilityFilter::new(&[
            Capability::Transform,
            Capability::Transform,
            Capability::Transform,
        ]);
        assert_eq!(once.key(), thrice.key());
        assert_eq!(thrice.tags(), &[Capability::Transform]);
    }

    #[test]
    fn test_matches_superset_masks_only() {
        let filter = CapabilityFilter::new(&[Capability::Projection, Capability::View]);
        let exact = Capability::Projection.bit() | Capability::View.bit();
        let superset = exact | Capability::Transform.bit();
        let partial = Capability::View.bit();

        assert!(filter.matches_mask(exact));
        assert!(filter.matches_mask(superset));
        assert!(!filter.matches_mask(partial));
        assert!(!filter.matches_mask(0));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CapabilityFilter::new(&[]);
        assert_eq!(filter.key(), FilterKey::EMPTY);
        assert!(filter.matches_mask(0));
        assert!(filter.matches_mask(Capability::GuiText.bit()));
    }
}
