use crate::error::Result;
use crate::model::{Commit, CommitPair, DiffStats};
use chrono::TimeDelta;
use tracing::debug;

/// Produces diff statistics between two commits.
pub trait DiffSource {
    fn diff_stats(&self, previous: &Commit, current: &Commit) -> Result<DiffStats>;
}

/// Pairs each commit with the one after it in a newest-first list.
///
/// Merge commits, non-positive time deltas and pairs whose diff cannot be
/// computed are dropped. Output keeps the input order.
pub fn build_pairs<D: DiffSource + ?Sized>(commits: &[Commit], source: &D) -> Vec<CommitPair> {
    let mut pairs = Vec::with_capacity(commits.len().saturating_sub(1));

    for window in commits.windows(2) {
        let (current, previous) = (&window[0], &window[1]);

        if current.is_merge() {
            debug!(commit = %current.hash, "skipping merge commit");
            continue;
        }

        let time_delta = current.timestamp - previous.timestamp;
        if time_delta <= TimeDelta::zero() {
            debug!(
                commit = %current.hash,
                seconds = time_delta.num_seconds(),
                "skipping pair with non-positive time delta"
            );
            continue;
        }

        let stats = match source.diff_stats(previous, current) {
            Ok(stats) => stats,
            Err(e) => {
                debug!(commit = %current.hash, error = %e, "skipping pair, diff unavailable");
                continue;
            }
        };

        pairs.push(CommitPair {
            previous: previous.clone(),
            current: current.clone(),
            time_delta,
            stats,
        });
    }

    pairs
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::VibeError;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;

    pub(crate) fn commit(hash: &str, email: &str, secs: i64, parents: usize) -> Commit {
        Commit {
            hash: hash.to_string(),
            author_name: email.split('@').next().unwrap_or(email).to_string(),
            author_email: email.to_string(),
            timestamp: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
            message: format!("commit {hash}"),
            parent_hashes: (0..parents).map(|i| format!("p{i}")).collect(),
        }
    }

    pub(crate) struct FakeDiffs(pub HashMap<String, DiffStats>);

    impl DiffSource for FakeDiffs {
        fn diff_stats(&self, _previous: &Commit, current: &Commit) -> Result<DiffStats> {
            self.0
                .get(&current.hash)
                .copied()
                .ok_or_else(|| VibeError::GitRepo(format!("no diff for {}", current.hash)))
        }
    }

    fn lines(additions: u64, deletions: u64) -> DiffStats {
        DiffStats {
            additions,
            deletions,
            total_additions: additions,
            total_deletions: deletions,
            files_changed: 1,
            files_changed_total: 1,
        }
    }

    fn all_diffs(hashes: &[&str]) -> FakeDiffs {
        FakeDiffs(hashes.iter().map(|h| (h.to_string(), lines(10, 2))).collect())
    }

    #[test]
    fn fewer_than_two_commits_yield_nothing() {
        let diffs = all_diffs(&[]);
        assert!(build_pairs(&[], &diffs).is_empty());
        assert!(build_pairs(&[commit("a", "x@y", 100, 0)], &diffs).is_empty());
    }

    #[test]
    fn pairs_adjacent_commits_newest_first() {
        let commits = vec![
            commit("c", "x@y", 300, 1),
            commit("b", "x@y", 200, 1),
            commit("a", "x@y", 100, 0),
        ];
        let pairs = build_pairs(&commits, &all_diffs(&["c", "b"]));

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].current.hash, "c");
        assert_eq!(pairs[0].previous.hash, "b");
        assert_eq!(pairs[1].current.hash, "b");
        assert_eq!(pairs[1].previous.hash, "a");
        assert_eq!(pairs[0].time_delta, TimeDelta::seconds(100));
        assert_eq!(pairs[0].stats.additions, 10);
    }

    #[test]
    fn drops_merges_skew_and_missing_diffs() {
        let commits = vec![
            commit("merge", "x@y", 500, 2),
            commit("skewed", "x@y", 100, 1),
            commit("nodiff", "x@y", 300, 1),
            commit("ok", "x@y", 200, 1),
            commit("root", "x@y", 100, 0),
        ];
        let pairs = build_pairs(&commits, &all_diffs(&["merge", "skewed", "ok"]));

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].current.hash, "ok");
    }

    #[test]
    fn equal_timestamps_are_dropped() {
        let commits = vec![commit("b", "x@y", 100, 1), commit("a", "x@y", 100, 0)];
        assert!(build_pairs(&commits, &all_diffs(&["b"])).is_empty());
    }
}
