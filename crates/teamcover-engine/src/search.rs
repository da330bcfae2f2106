//! Team search
//!
//! Depth-first enumeration of fixed-size subsets of the pool. A branch only
//! grows with candidates that add coverage; a node where no candidate adds
//! coverage is completed by padding with the best-scoring unused items.
//!
//! Padding guarantees the best coverage found is the true maximum. It does
//! not guarantee the best [`ScoreTuple`]: a skipped candidate may still
//! improve the later fields, and padding picks by profile score alone. The
//! returned best is the lexicographic maximum on most catalogs but can trail
//! it in the fields after coverage.
//!
//! # Pruning
//!
//! - candidates adding no coverage are skipped (heuristic, see above)
//! - a subtree whose coverage cannot reach `best - margin`, even taking every
//!   remaining candidate, is cut
//! - a full team is scored only when its coverage is within `margin` of the
//!   best coverage seen so far
//!
//! # Concurrency
//!
//! Top-level subtrees run as independent rayon tasks with their own
//! [`SearchAccumulator`]. The best coverage is shared through an atomic max
//! and the accumulators are merged at the end.

use crate::error::{EngineError, Result};
use crate::scorer;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use teamcover_domain::{Item, KeySet, ProfileMap, ScoreTuple};
use tracing::{debug, info};

/// Tuning knobs for [`search`]
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of members per team, forced members included
    pub team_size: usize,
    /// Coverage distance from the best that still gets scored and reported
    pub margin: usize,
    /// Split top-level subtrees across rayon workers
    pub parallel: bool,
    /// Worker threads (0 = rayon default)
    pub threads: usize,
    /// Stop after this long and return what was found
    pub time_limit: Option<Duration>,
    /// Cooperative stop flag
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            team_size: 6,
            margin: 1,
            parallel: true,
            threads: 0,
            time_limit: None,
            cancel: None,
        }
    }
}

impl SearchOptions {
    /// Options for a sequential search of the given team size
    pub fn sequential(team_size: usize) -> Self {
        Self {
            team_size,
            parallel: false,
            ..Self::default()
        }
    }
}

/// Counters collected during a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Search nodes visited
    pub nodes: u64,
    /// Candidates skipped for adding no coverage
    pub cuts: u64,
    /// Subtrees cut by the coverage bound
    pub bound_cuts: u64,
    /// Dead ends completed by padding
    pub padded: u64,
    /// Full teams scored
    pub scored: u64,
}

impl SearchStats {
    fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.cuts += other.cuts;
        self.bound_cuts += other.bound_cuts;
        self.padded += other.padded;
        self.scored += other.scored;
    }
}

/// A scored team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Members, forced ones first
    pub members: Vec<Item>,
    /// The team's score
    pub score: ScoreTuple,
}

impl Team {
    /// Sum of member catalog numbers
    pub fn identity_sum(&self) -> u64 {
        scorer::identity_sum(&self.members)
    }
}

/// Results collected by one search task
///
/// Keyed by [`ScoreTuple`], whose identity field keeps distinct teams apart.
#[derive(Debug, Clone, Default)]
pub struct SearchAccumulator {
    margin: usize,
    best_coverage: usize,
    results: BTreeMap<ScoreTuple, Vec<Item>>,
    stats: SearchStats,
}

impl SearchAccumulator {
    /// Create an empty accumulator
    pub fn new(margin: usize) -> Self {
        Self {
            margin,
            ..Self::default()
        }
    }

    /// Record a scored team, evicting entries that fell out of the margin
    pub fn insert(&mut self, score: ScoreTuple, members: Vec<Item>) {
        if score.coverage + self.margin < self.best_coverage {
            return;
        }
        if score.coverage > self.best_coverage {
            self.best_coverage = score.coverage;
            let floor = self.best_coverage.saturating_sub(self.margin);
            self.results.retain(|s, _| s.coverage >= floor);
        }
        self.results.insert(score, members);
    }

    /// Fold another accumulator into this one
    pub fn merge(mut self, other: SearchAccumulator) -> Self {
        self.stats.merge(&other.stats);
        for (score, members) in other.results {
            self.insert(score, members);
        }
        self
    }

    /// Best score recorded so far
    pub fn best(&self) -> Option<&ScoreTuple> {
        self.results.keys().next_back()
    }

    /// Number of recorded teams
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn into_outcome(self, complete: bool) -> SearchOutcome {
        let results: Vec<Team> = self
            .results
            .into_iter()
            .rev()
            .map(|(score, members)| Team { members, score })
            .collect();
        SearchOutcome {
            best: results.first().map(|t| t.score.clone()),
            results,
            stats: self.stats,
            complete,
        }
    }
}

/// Final result of a search
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Teams within the margin of the best coverage, best first
    pub results: Vec<Team>,
    /// Best score found
    pub best: Option<ScoreTuple>,
    /// Search counters
    pub stats: SearchStats,
    /// False when the search stopped early
    pub complete: bool,
}

impl SearchOutcome {
    /// Teams whose coverage is within `margin` of the best, best first
    pub fn near_best(&self, margin: usize) -> impl Iterator<Item = &Team> {
        let floor = self
            .best
            .as_ref()
            .map(|b| b.coverage.saturating_sub(margin))
            .unwrap_or(0);
        self.results.iter().filter(move |t| t.score.coverage >= floor)
    }

    /// The best team, if any
    pub fn best_team(&self) -> Option<&Team> {
        self.results.first()
    }
}

struct SearchContext<'a> {
    pool: &'a [Item],
    forced: &'a [Item],
    profiles: &'a ProfileMap,
    coverage_of: Vec<&'a KeySet>,
    /// Union of `coverage_of[i..]`
    suffix: Vec<KeySet>,
    pad_order: Vec<usize>,
    slots: usize,
    margin: usize,
    best_coverage: AtomicUsize,
    stopped: AtomicBool,
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl SearchContext<'_> {
    fn should_stop(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        let cancelled = self
            .cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed));
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        if cancelled || expired {
            self.stopped.store(true, Ordering::Relaxed);
        }
        cancelled || expired
    }

    fn explore(
        &self,
        start: usize,
        team: &mut Vec<usize>,
        coverage: &KeySet,
        acc: &mut SearchAccumulator,
    ) {
        if self.should_stop() {
            return;
        }
        acc.stats.nodes += 1;

        if team.len() == self.slots {
            self.finish(team, acc);
            return;
        }

        let reachable = match self.suffix.get(start) {
            Some(rest) => coverage.len() + rest.count_outside(coverage),
            None => coverage.len(),
        };
        if reachable + self.margin < self.best_coverage.load(Ordering::Relaxed) {
            acc.stats.bound_cuts += 1;
            return;
        }

        let mut extended = false;
        for candidate in start..self.pool.len() {
            let gain = self.coverage_of[candidate];
            if gain.is_subset(coverage) {
                acc.stats.cuts += 1;
                continue;
            }
            extended = true;
            team.push(candidate);
            self.explore(candidate + 1, team, &coverage.union(gain), acc);
            team.pop();
        }

        if !extended {
            acc.stats.padded += 1;
            let mut padded = team.clone();
            for index in &self.pad_order {
                if padded.len() == self.slots {
                    break;
                }
                if !padded.contains(index) {
                    padded.push(*index);
                }
            }
            self.finish(&padded, acc);
        }
    }

    fn finish(&self, team: &[usize], acc: &mut SearchAccumulator) {
        let mut team = team.to_vec();
        team.sort_unstable();
        let members: Vec<Item> = self
            .forced
            .iter()
            .cloned()
            .chain(team.iter().map(|i| self.pool[*i].clone()))
            .collect();

        let mut coverage = KeySet::with_capacity(self.profiles.len());
        for member in &members {
            if let Some(profile) = self.profiles.get(&member.key) {
                coverage.union_with(&profile.safe_super_stab);
            }
        }
        let covered = coverage.len();
        if covered + self.margin < self.best_coverage.load(Ordering::Relaxed) {
            return;
        }
        self.best_coverage.fetch_max(covered, Ordering::Relaxed);

        acc.stats.scored += 1;
        let score = scorer::score(&members, self.profiles);
        acc.insert(score, members);
    }

    fn run_subtree(&self, root: usize, seed: &KeySet) -> SearchAccumulator {
        let mut acc = SearchAccumulator::new(self.margin);
        let mut team = vec![root];
        self.explore(root + 1, &mut team, &seed.union(self.coverage_of[root]), &mut acc);
        debug!(
            root = %self.pool[root].name,
            nodes = acc.stats.nodes,
            kept = acc.len(),
            "Finished subtree"
        );
        acc
    }
}

/// Search for the best teams of `options.team_size` members
///
/// `forced` members are always seated and are removed from `pool` if
/// present. Fails when the pool cannot fill the team or a pool item has no
/// profile.
pub fn search(
    pool: &[Item],
    forced: &[Item],
    profiles: &ProfileMap,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    if options.team_size == 0 {
        return Err(EngineError::Config("team size must be at least 1".to_string()));
    }
    if forced.len() > options.team_size {
        return Err(EngineError::TooManyForced {
            forced: forced.len(),
            team_size: options.team_size,
        });
    }

    let pool: Vec<Item> = pool
        .iter()
        .filter(|p| !forced.iter().any(|f| f.id == p.id))
        .cloned()
        .collect();
    let available = pool.len() + forced.len();
    if available < options.team_size {
        return Err(EngineError::Infeasible {
            requested: options.team_size,
            available,
        });
    }

    let mut coverage_of = Vec::with_capacity(pool.len());
    for item in &pool {
        let profile = profiles
            .get(&item.key)
            .ok_or_else(|| EngineError::MissingProfile(item.key.to_string()))?;
        coverage_of.push(&profile.safe_super_stab);
    }

    let slots = options.team_size - forced.len();

    if slots == 0 || pool.len() == slots {
        let mut acc = SearchAccumulator::new(options.margin);
        let members: Vec<Item> = forced
            .iter()
            .chain(pool.iter())
            .take(options.team_size)
            .cloned()
            .collect();
        let score = scorer::score(&members, profiles);
        acc.stats.scored = 1;
        acc.insert(score, members);
        return Ok(acc.into_outcome(true));
    }

    let mut suffix = vec![KeySet::with_capacity(profiles.len()); pool.len()];
    let mut running = KeySet::with_capacity(profiles.len());
    for index in (0..pool.len()).rev() {
        running.union_with(coverage_of[index]);
        suffix[index] = running.clone();
    }

    let mut pad_order: Vec<usize> = (0..pool.len()).collect();
    pad_order.sort_by_key(|i| std::cmp::Reverse(profiles.get(&pool[*i].key).map(|p| p.score)));

    let mut seed = KeySet::with_capacity(profiles.len());
    for member in forced {
        if let Some(profile) = profiles.get(&member.key) {
            seed.union_with(&profile.safe_super_stab);
        }
    }

    let context = SearchContext {
        pool: &pool,
        forced,
        profiles,
        coverage_of,
        suffix,
        pad_order,
        slots,
        margin: options.margin,
        best_coverage: AtomicUsize::new(0),
        stopped: AtomicBool::new(false),
        cancel: options.cancel.clone(),
        deadline: options.time_limit.map(|limit| Instant::now() + limit),
    };

    info!(
        pool = pool.len(),
        forced = forced.len(),
        slots,
        teams = combinations(pool.len(), slots),
        "Starting team search"
    );

    let roots: Vec<usize> = (0..pool.len())
        .filter(|i| !context.coverage_of[*i].is_subset(&seed))
        .collect();

    let acc = if roots.is_empty() {
        // Forced members already cover everything the pool could add.
        let mut root_acc = SearchAccumulator::new(options.margin);
        context.explore(0, &mut Vec::new(), &seed, &mut root_acc);
        root_acc
    } else if options.parallel {
        let run = || {
            roots
                .par_iter()
                .map(|root| context.run_subtree(*root, &seed))
                .reduce(|| SearchAccumulator::new(options.margin), SearchAccumulator::merge)
        };
        if options.threads > 0 {
            let workers = rayon::ThreadPoolBuilder::new()
                .num_threads(options.threads)
                .build()
                .map_err(|e| EngineError::Config(format!("thread pool: {}", e)))?;
            workers.install(run)
        } else {
            run()
        }
    } else {
        roots
            .iter()
            .map(|root| context.run_subtree(*root, &seed))
            .fold(SearchAccumulator::new(options.margin), SearchAccumulator::merge)
    };

    let complete = !context.stopped.load(Ordering::Relaxed);
    let outcome = acc.into_outcome(complete);
    info!(
        nodes = outcome.stats.nodes,
        scored = outcome.stats.scored,
        padded = outcome.stats.padded,
        results = outcome.results.len(),
        complete,
        "Team search finished"
    );
    Ok(outcome)
}

/// Number of `k`-subsets of `n` items, saturating
pub fn combinations(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut total: u128 = 1;
    for i in 0..k {
        total = total.saturating_mul((n - i) as u128) / (i as u128 + 1);
    }
    total
}
