//! Reconciliation engine driver
//!
//! Orchestrates one reconciliation pass: read the user's existing
//! associations, resolve the desired names through the catalog, diff, and
//! apply the resulting plan through the store. The engine holds no state and
//! opens no transaction; callers wrap it in one and roll back on error.

use std::collections::{BTreeMap, HashSet};

use medmatch_domain::{MedMatchError, Result, TagKind};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::plan::ReconcilePlan;
use super::ports::{AssociationStore, TagCatalog};

/// Desired tag set for one reconciliation pass, deduplicated by name.
///
/// When the same name is requested twice the first occurrence wins,
/// including its attribute; later duplicates are dropped before resolution.
#[derive(Debug, Clone)]
pub struct DesiredTags<A> {
    pairs: Vec<(String, A)>,
}

impl<A: Clone + PartialEq> DesiredTags<A> {
    /// Build a desired set from `(name, attribute)` pairs.
    pub fn new(pairs: Vec<(String, A)>) -> Self {
        let mut seen = HashSet::new();
        let mut deduped = Vec::with_capacity(pairs.len());
        for (name, attr) in pairs {
            if seen.insert(name.clone()) {
                deduped.push((name, attr));
            }
        }
        Self { pairs: deduped }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// The deduplicated names, in request order.
    pub fn names(&self) -> Vec<String> {
        self.pairs.iter().map(|(name, _)| name.clone()).collect()
    }

    fn attr_of(&self, name: &str) -> Option<&A> {
        self.pairs.iter().find(|(candidate, _)| candidate == name).map(|(_, attr)| attr)
    }
}

impl DesiredTags<()> {
    /// Build an attribute-less desired set from bare names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(|name| (name.into(), ())).collect())
    }
}

/// Counts of writes applied by one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

impl ReconcileOutcome {
    /// True when the pass performed no writes.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.removed == 0
    }
}

/// Reconcile one tag dimension of a user against the desired set.
///
/// Steps:
/// 1. Read the user's existing associations through the store.
/// 2. Resolve desired names through the catalog (skipped entirely when the
///    desired set is empty); unknown names contribute nothing.
/// 3. Diff the two maps into a [`ReconcilePlan`].
/// 4. Apply inserts, per-entry attribute updates, then removals, skipping
///    empty batches.
///
/// Failures in the write phase come back as
/// [`MedMatchError::Reconciliation`] with the store error as source; read
/// and resolution failures propagate unwrapped. Re-running with an unchanged
/// desired set is a no-op.
pub fn reconcile<S, C>(
    store: &S,
    catalog: &C,
    user_id: Uuid,
    kind: TagKind,
    desired: &DesiredTags<S::Attr>,
) -> Result<ReconcileOutcome>
where
    S: AssociationStore + ?Sized,
    C: TagCatalog + ?Sized,
{
    let existing: BTreeMap<_, _> =
        store.find_by_user(user_id)?.into_iter().map(|link| (link.tag_id, link.attr)).collect();

    let desired_map = if desired.is_empty() {
        BTreeMap::new()
    } else {
        resolve_desired(catalog, kind, desired)?
    };

    let plan = ReconcilePlan::compute(&existing, &desired_map);
    if plan.is_empty() {
        debug!(user_id = %user_id, kind = %kind, "associations already reconciled");
        return Ok(ReconcileOutcome::default());
    }

    apply_plan(store, user_id, &plan).map_err(MedMatchError::reconciliation)?;

    let outcome = ReconcileOutcome {
        added: plan.to_add.len(),
        updated: plan.to_update.len(),
        removed: plan.to_remove.len(),
    };
    debug!(
        user_id = %user_id,
        kind = %kind,
        added = outcome.added,
        updated = outcome.updated,
        removed = outcome.removed,
        "associations reconciled"
    );
    Ok(outcome)
}

fn resolve_desired<A: Clone + PartialEq>(
    catalog: &(impl TagCatalog + ?Sized),
    kind: TagKind,
    desired: &DesiredTags<A>,
) -> Result<BTreeMap<medmatch_domain::TagId, A>> {
    let names = desired.names();
    let entries = catalog.resolve(kind, &names)?;

    if entries.len() < names.len() {
        debug!(
            kind = %kind,
            requested = names.len(),
            resolved = entries.len(),
            "unknown tag names dropped"
        );
    }

    let mut map = BTreeMap::new();
    for entry in entries {
        if let Some(attr) = desired.attr_of(&entry.name) {
            map.insert(entry.id, attr.clone());
        }
    }
    Ok(map)
}

fn apply_plan<S>(store: &S, user_id: Uuid, plan: &ReconcilePlan<S::Attr>) -> Result<()>
where
    S: AssociationStore + ?Sized,
{
    if !plan.to_add.is_empty() {
        store.insert_many(user_id, &plan.to_add)?;
    }
    for (tag_id, attr) in &plan.to_update {
        store.update_attribute(user_id, *tag_id, attr)?;
    }
    if !plan.to_remove.is_empty() {
        store.remove_many(user_id, &plan.to_remove)?;
    }
    Ok(())
}
