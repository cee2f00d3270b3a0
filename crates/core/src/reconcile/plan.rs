//! Pure diff between existing and desired association maps.

use std::collections::BTreeMap;

use medmatch_domain::TagId;

/// The minimal set of writes turning `existing` associations into `desired`.
///
/// The three sets are disjoint by construction: a tag id appears in at most
/// one of them. `BTreeMap` inputs keep every set ordered by ascending tag id,
/// so the same inputs always produce the same plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan<A> {
    /// Desired associations with no existing row.
    pub to_add: Vec<(TagId, A)>,
    /// Associations present on both sides whose attribute differs.
    pub to_update: Vec<(TagId, A)>,
    /// Existing associations absent from the desired set.
    pub to_remove: Vec<TagId>,
}

impl<A: Clone + PartialEq> ReconcilePlan<A> {
    /// Diff `desired` against `existing`, both keyed by tag id.
    ///
    /// Attribute comparison is exact equality, so attribute-less kinds
    /// (`A = ()`) never produce updates.
    pub fn compute(existing: &BTreeMap<TagId, A>, desired: &BTreeMap<TagId, A>) -> Self {
        let mut to_add = Vec::new();
        let mut to_update = Vec::new();

        for (tag_id, attr) in desired {
            match existing.get(tag_id) {
                None => to_add.push((*tag_id, attr.clone())),
                Some(current) if current != attr => to_update.push((*tag_id, attr.clone())),
                Some(_) => {}
            }
        }

        let to_remove =
            existing.keys().filter(|tag_id| !desired.contains_key(tag_id)).copied().collect();

        Self { to_add, to_update, to_remove }
    }

    /// True when the plan contains no writes at all.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of writes the plan will issue.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_update.len() + self.to_remove.len()
    }
}
