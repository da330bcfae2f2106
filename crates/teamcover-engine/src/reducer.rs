//! Catalog reduction
//!
//! Shrinks the candidate pool before search while keeping every team that
//! could reach the best coverage. Stages run in a fixed order:
//!
//! | Stage | Drops |
//! |-------|-------|
//! | Exclusions | items listed by catalog number or name pattern |
//! | Strength | items below `min_strength` |
//! | Duplicate keys | all but the strongest item per key |
//! | Quad weak | keys whose two attributes share an uncancelled weakness |
//! | Dominance | modifier-free items another modifier-free item outclasses |
//! | Top K | items whose profile score is below the K-th best |

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use teamcover_domain::{AttributeKey, AttributeSet, AttributeTable, Item, ModifierKind, ProfileMap};
use tracing::info;

/// Filters applied by [`reduce`]
///
/// # Examples
///
/// ```
/// use teamcover_engine::ReducePolicy;
///
/// let policy = ReducePolicy::default();
/// assert!(policy.exclude_quad_weak);
/// assert_eq!(policy.top_k_types_to_keep, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducePolicy {
    /// Minimum strength an item needs to stay in the pool
    /// Default: 0 (keep everything)
    #[serde(default)]
    pub min_strength: u32,

    /// Keep only items whose profile score reaches the K-th best score
    /// Default: 0 (disabled)
    #[serde(default)]
    pub top_k_types_to_keep: usize,

    /// Drop keys with a shared (4x) weakness
    /// Default: true
    #[serde(default = "default_exclude_quad_weak")]
    pub exclude_quad_weak: bool,

    /// Catalog numbers never allowed in the pool
    #[serde(default)]
    pub exclude_ids: Vec<u32>,

    /// Case-insensitive name fragments never allowed in the pool
    #[serde(default)]
    pub exclude_name_patterns: Vec<String>,
}

fn default_exclude_quad_weak() -> bool {
    true
}

impl Default for ReducePolicy {
    fn default() -> Self {
        Self {
            min_strength: 0,
            top_k_types_to_keep: 0,
            exclude_quad_weak: true,
            exclude_ids: Vec::new(),
            exclude_name_patterns: Vec::new(),
        }
    }
}

impl ReducePolicy {
    /// A policy that keeps every item except exact duplicates and dominated ones
    pub fn permissive() -> Self {
        Self {
            exclude_quad_weak: false,
            ..Self::default()
        }
    }
}

/// Per-stage removal counts of one reduction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReductionReport {
    /// Items entering the reducer
    pub initial: usize,
    /// Removed by number or name exclusion
    pub excluded: usize,
    /// Removed for low strength
    pub below_strength: usize,
    /// Removed for sharing a key with a stronger item
    pub duplicate_keys: usize,
    /// Removed for a shared weakness
    pub quad_weak: usize,
    /// Removed by dominance
    pub dominated: usize,
    /// Removed by the top-K score cut
    pub low_score: usize,
    /// Items left in the pool
    pub remaining: usize,
}

impl ReductionReport {
    /// Total items removed across all stages
    pub fn total_removed(&self) -> usize {
        self.excluded
            + self.below_strength
            + self.duplicate_keys
            + self.quad_weak
            + self.dominated
            + self.low_score
    }

    /// Generate a summary report of the reduction
    pub fn summary(&self) -> String {
        [
            "Reduction Summary".to_string(),
            "=================".to_string(),
            format!("Initial items: {}", self.initial),
            format!("  Excluded by number or name: {}", self.excluded),
            format!("  Below strength threshold: {}", self.below_strength),
            format!("  Weaker item with same key: {}", self.duplicate_keys),
            format!("  Shared 4x weakness: {}", self.quad_weak),
            format!("  Dominated by another item: {}", self.dominated),
            format!("  Below top-K score: {}", self.low_score),
            format!("Remaining: {}", self.remaining),
        ]
        .join("\n")
    }
}

/// Output of [`reduce`]
#[derive(Debug, Clone, Default)]
pub struct Reduction {
    /// Items that survived every stage, in catalog order
    pub pool: Vec<Item>,
    /// Weaker items sharing each surviving key, by name
    pub alternates: BTreeMap<AttributeKey, Vec<String>>,
    /// Removal counts
    pub report: ReductionReport,
}

/// Apply every reduction stage to `items`
///
/// Fails with [`EngineError::MissingProfile`] when a surviving item's key was
/// never profiled.
pub fn reduce(
    items: &[Item],
    profiles: &ProfileMap,
    table: &AttributeTable,
    policy: &ReducePolicy,
) -> Result<Reduction> {
    let mut report = ReductionReport {
        initial: items.len(),
        ..Default::default()
    };

    let patterns: Vec<String> = policy
        .exclude_name_patterns
        .iter()
        .map(|p| p.to_lowercase())
        .collect();
    let mut pool: Vec<Item> = items
        .iter()
        .filter(|item| {
            let name = item.name.to_lowercase();
            !policy.exclude_ids.contains(&item.number)
                && !patterns.iter().any(|p| name.contains(p.as_str()))
        })
        .cloned()
        .collect();
    report.excluded = items.len() - pool.len();

    let before = pool.len();
    pool.retain(|item| item.strength >= policy.min_strength);
    report.below_strength = before - pool.len();

    let before = pool.len();
    let (kept, alternates) = best_per_key(pool);
    pool = kept;
    report.duplicate_keys = before - pool.len();

    for item in &pool {
        if profiles.get(&item.key).is_none() {
            return Err(EngineError::MissingProfile(item.key.to_string()));
        }
    }

    if policy.exclude_quad_weak {
        let before = pool.len();
        pool.retain(|item| !is_quad_weak(&item.key, table));
        report.quad_weak = before - pool.len();
    }

    let before = pool.len();
    pool = remove_dominated(pool, profiles);
    report.dominated = before - pool.len();

    let k = policy.top_k_types_to_keep;
    if k > 0 && pool.len() > k {
        let mut scores: Vec<i32> = pool.iter().map(|i| profile_score(i, profiles)).collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        let threshold = scores[k - 1];
        let before = pool.len();
        pool.retain(|item| profile_score(item, profiles) >= threshold);
        report.low_score = before - pool.len();
    }

    report.remaining = pool.len();
    info!(
        initial = report.initial,
        remaining = report.remaining,
        removed = report.total_removed(),
        "Reduced catalog"
    );

    Ok(Reduction {
        pool,
        alternates,
        report,
    })
}

fn profile_score(item: &Item, profiles: &ProfileMap) -> i32 {
    profiles.get(&item.key).map(|p| p.score).unwrap_or(0)
}

/// Keep the strongest item per key (ties to the lowest id)
fn best_per_key(pool: Vec<Item>) -> (Vec<Item>, BTreeMap<AttributeKey, Vec<String>>) {
    let mut best: HashMap<AttributeKey, &Item> = HashMap::new();
    for item in &pool {
        best.entry(item.key.clone())
            .and_modify(|current| {
                if item.strength > current.strength
                    || (item.strength == current.strength && item.id < current.id)
                {
                    *current = item;
                }
            })
            .or_insert(item);
    }

    let mut alternates: BTreeMap<AttributeKey, Vec<String>> = BTreeMap::new();
    for item in &pool {
        if best.get(&item.key).is_some_and(|b| b.id != item.id) {
            alternates
                .entry(item.key.clone())
                .or_default()
                .push(item.name.clone());
        }
    }
    for names in alternates.values_mut() {
        names.sort();
    }

    let kept = pool
        .iter()
        .filter(|item| best.get(&item.key).is_some_and(|b| b.id == item.id))
        .cloned()
        .collect();
    (kept, alternates)
}

/// Whether both present attributes share a weakness no modifier cancels
///
/// A mono key is never quad weak.
pub fn is_quad_weak(key: &AttributeKey, table: &AttributeTable) -> bool {
    let present: Vec<_> = key.present_attributes().iter().collect();
    let [first, second] = present.as_slice() else {
        return false;
    };

    let cancelled: AttributeSet = key
        .modifiers()
        .filter(|m| m.kind == ModifierKind::Resist || m.kind == ModifierKind::Immune)
        .map(|m| m.target)
        .collect();

    !table
        .vulnerable_to(*first)
        .intersection(table.vulnerable_to(*second))
        .difference(cancelled)
        .is_empty()
}

/// Drop modifier-free items outclassed by another modifier-free item
///
/// B outclasses A when their safe-super-stab sets are equal and A's
/// resist-stab set is a subset of B's, or when A's safe-super-stab set is a
/// proper subset of B's and A's favorable set is a subset of B's. Pairs are
/// visited in `(key, id)` order, so the result does not depend on catalog
/// order; when both outclass each other only the earlier item goes. Removed
/// items still count as outclassing later ones.
fn remove_dominated(pool: Vec<Item>, profiles: &ProfileMap) -> Vec<Item> {
    let mut comparable: Vec<usize> = (0..pool.len())
        .filter(|i| !pool[*i].key.has_modifiers())
        .collect();
    comparable.sort_by(|a, b| (&pool[*a].key, pool[*a].id).cmp(&(&pool[*b].key, pool[*b].id)));
    let mut removed = vec![false; pool.len()];

    for (pos, &i) in comparable.iter().enumerate() {
        for &j in &comparable[pos + 1..] {
            let (Some(a), Some(b)) = (profiles.get(&pool[i].key), profiles.get(&pool[j].key))
            else {
                continue;
            };

            if a.safe_super_stab.same_members(&b.safe_super_stab) {
                if a.resist_stab.is_subset(&b.resist_stab) {
                    removed[i] = true;
                } else if b.resist_stab.is_subset(&a.resist_stab) {
                    removed[j] = true;
                }
            } else if a.safe_super_stab.is_proper_subset(&b.safe_super_stab) {
                if a.favorable().is_subset(&b.favorable()) {
                    removed[i] = true;
                }
            } else if b.safe_super_stab.is_proper_subset(&a.safe_super_stab)
                && b.favorable().is_subset(&a.favorable())
            {
                removed[j] = true;
            }
        }
    }

    pool.into_iter()
        .zip(removed)
        .filter(|(_, gone)| !gone)
        .map(|(item, _)| item)
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::deriver::derive;
    use proptest::prelude::*;
    use teamcover_domain::{Attribute, ItemId};

    fn catalog() -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec((0usize..18, 0usize..19), 1..10).prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (a, b))| {
                    let key = AttributeKey::new(Attribute::ALL[a], Attribute::ALL[b]);
                    Item::new(ItemId::new(i as u32), format!("item{}", i), i as u32, key, 500)
                })
                .collect()
        })
    }

    proptest! {
        /// Property: dominance removal never empties a non-empty pool
        #[test]
        fn test_dominance_keeps_a_survivor(items in catalog()) {
            let table = AttributeTable::standard();
            let derivation = derive(&items, &table);
            let reduction = reduce(
                &derivation.items,
                &derivation.profiles,
                &table,
                &ReducePolicy::permissive(),
            ).unwrap();
            prop_assert!(!reduction.pool.is_empty());
        }

        /// Property: reversing the catalog leaves the reduced pool unchanged
        #[test]
        fn test_reduction_ignores_catalog_order(items in catalog()) {
            let table = AttributeTable::standard();
            let pool_ids = |items: &[Item]| {
                let derivation = derive(items, &table);
                let reduction = reduce(
                    &derivation.items,
                    &derivation.profiles,
                    &table,
                    &ReducePolicy::permissive(),
                ).unwrap();
                let mut ids: Vec<ItemId> = reduction.pool.iter().map(|i| i.id).collect();
                ids.sort();
                ids
            };
            let mut reversed = items.clone();
            reversed.reverse();
            prop_assert_eq!(pool_ids(&items), pool_ids(&reversed));
        }

        /// Property: the pool holds at most one item per key
        #[test]
        fn test_one_item_per_key(items in catalog()) {
            let table = AttributeTable::standard();
            let derivation = derive(&items, &table);
            let reduction = reduce(
                &derivation.items,
                &derivation.profiles,
                &table,
                &ReducePolicy::default(),
            ).unwrap();
            let mut keys: Vec<_> = reduction.pool.iter().map(|i| i.key.clone()).collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), total);
        }
    }
}
