//! Repository and per-author descriptive statistics.

use crate::model::{Commit, CommitPair};
use crate::velocity::velocity;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorStats {
    pub name: String,
    pub email: String,
    pub commit_count: usize,
    pub loc_added: u64,
    pub loc_deleted: u64,
    pub avg_velocity: f64,
    pub max_velocity: f64,
    pub first_commit: Option<DateTime<Utc>>,
    pub last_commit: Option<DateTime<Utc>>,
}

impl AuthorStats {
    fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            commit_count: 0,
            loc_added: 0,
            loc_deleted: 0,
            avg_velocity: 0.0,
            max_velocity: 0.0,
            first_commit: None,
            last_commit: None,
        }
    }

    fn record(&mut self, pair: &CommitPair, velocity: Option<f64>) {
        let ts = pair.current.timestamp;
        self.commit_count += 1;
        self.loc_added += pair.stats.additions;
        self.loc_deleted += pair.stats.deletions;
        self.first_commit = Some(self.first_commit.map_or(ts, |first| first.min(ts)));
        self.last_commit = Some(self.last_commit.map_or(ts, |last| last.max(ts)));
        if let Some(v) = velocity {
            self.max_velocity = self.max_velocity.max(v);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryStats {
    pub total_commits: usize,
    pub total_commit_pairs: usize,
    pub unique_authors: usize,
    /// Keyed by author email.
    pub authors: HashMap<String, AuthorStats>,
    pub time_span: TimeDelta,
    pub first_commit: Option<DateTime<Utc>>,
    pub last_commit: Option<DateTime<Utc>>,
    pub total_loc_added: u64,
    pub total_loc_deleted: u64,
    pub unfiltered_loc_added: u64,
    pub unfiltered_loc_deleted: u64,
    pub average_velocity: f64,
    pub median_velocity: f64,
    /// `None` when no pair contributed a velocity sample.
    pub velocity_percentiles: Option<Percentiles>,
}

impl RepositoryStats {
    fn empty(total_commits: usize, total_commit_pairs: usize) -> Self {
        Self {
            total_commits,
            total_commit_pairs,
            unique_authors: 0,
            authors: HashMap::new(),
            time_span: TimeDelta::zero(),
            first_commit: None,
            last_commit: None,
            total_loc_added: 0,
            total_loc_deleted: 0,
            unfiltered_loc_added: 0,
            unfiltered_loc_deleted: 0,
            average_velocity: 0.0,
            median_velocity: 0.0,
            velocity_percentiles: None,
        }
    }

    /// Authors ordered by email, for stable rendering.
    pub fn authors_sorted(&self) -> Vec<&AuthorStats> {
        let mut authors: Vec<_> = self.authors.values().collect();
        authors.sort_by(|a, b| a.email.cmp(&b.email));
        authors
    }
}

/// Addition velocity of a pair, if it is a usable sample.
fn velocity_sample(pair: &CommitPair) -> Option<f64> {
    velocity(pair.stats.additions, pair.time_delta)
        .ok()
        .filter(|v| !v.is_nan() && *v >= 0.0)
}

pub fn aggregate(commits: &[Commit], pairs: &[CommitPair]) -> RepositoryStats {
    let mut stats = RepositoryStats::empty(commits.len(), pairs.len());
    if commits.is_empty() {
        return stats;
    }

    let mut author_set: HashSet<&str> = HashSet::new();
    for commit in commits {
        author_set.insert(&commit.author_email);
        let ts = commit.timestamp;
        stats.first_commit = Some(stats.first_commit.map_or(ts, |first| first.min(ts)));
        stats.last_commit = Some(stats.last_commit.map_or(ts, |last| last.max(ts)));
        stats
            .authors
            .entry(commit.author_email.clone())
            .or_insert_with(|| AuthorStats::new(&commit.author_name, &commit.author_email));
    }
    stats.unique_authors = author_set.len();
    if let (Some(first), Some(last)) = (stats.first_commit, stats.last_commit) {
        stats.time_span = last - first;
    }

    let mut velocities = Vec::with_capacity(pairs.len());
    for pair in pairs {
        stats.total_loc_added += pair.stats.additions;
        stats.total_loc_deleted += pair.stats.deletions;
        stats.unfiltered_loc_added += pair.stats.total_additions;
        stats.unfiltered_loc_deleted += pair.stats.total_deletions;

        if !pair.stats.has_filtered_changes() {
            continue;
        }

        let sample = velocity_sample(pair);
        if let Some(v) = sample {
            velocities.push(v);
        }

        let current = &pair.current;
        stats
            .authors
            .entry(current.author_email.clone())
            .or_insert_with(|| AuthorStats::new(&current.author_name, &current.author_email))
            .record(pair, sample);
    }

    if !velocities.is_empty() {
        stats.average_velocity = mean(&velocities);
        stats.median_velocity = median(&velocities);
        stats.velocity_percentiles = Some(percentiles(&velocities));
    }

    // Author averages come from their own pass over the pairs rather than the
    // running totals above.
    let mut by_author: HashMap<&str, Vec<f64>> = HashMap::new();
    for pair in pairs.iter().filter(|p| p.stats.has_filtered_changes()) {
        if let Some(v) = velocity_sample(pair) {
            by_author.entry(&pair.current.author_email).or_default().push(v);
        }
    }
    for (email, author) in stats.authors.iter_mut() {
        if author.commit_count == 0 {
            continue;
        }
        if let Some(samples) = by_author.get(email.as_str()) {
            author.avg_velocity = mean(samples);
        }
    }

    stats
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn percentiles(values: &[f64]) -> Percentiles {
    if values.is_empty() {
        return Percentiles::default();
    }
    let sorted = sorted(values);
    Percentiles {
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        p90: percentile(&sorted, 90.0),
        p95: percentile(&sorted, 95.0),
        p99: percentile(&sorted, 99.0),
    }
}

/// Linear-interpolated percentile of an already sorted slice.
///
/// `p` is clamped to `0.0..=100.0`; a NaN `p` yields NaN.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if p.is_nan() {
        return f64::NAN;
    }
    let p = p.clamp(0.0, 100.0);
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
