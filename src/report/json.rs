use super::ReportData;
use crate::detector::{seconds_f64, Reason, SuspiciousCommit, Thresholds};
use crate::error::Result;
use crate::model::SCHEMA_VERSION;
use crate::stats::{AuthorStats, Percentiles, RepositoryStats};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub statistics: JsonStats,
    pub thresholds: Thresholds,
    pub suspicious_count: usize,
    pub suspicious_commits: Vec<JsonSuspiciousCommit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonStats {
    pub total_commits: usize,
    pub commit_pairs: usize,
    pub unique_authors: usize,
    pub time_span_seconds: f64,
    pub first_commit: Option<DateTime<Utc>>,
    pub last_commit: Option<DateTime<Utc>>,
    pub total_loc_added_filtered: u64,
    pub total_loc_deleted_filtered: u64,
    pub total_loc_added_unfiltered: u64,
    pub total_loc_deleted_unfiltered: u64,
    pub average_velocity_loc_per_min: f64,
    pub median_velocity_loc_per_min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_percentiles: Option<Percentiles>,
    pub authors: Vec<AuthorStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSuspiciousCommit {
    pub hash: String,
    pub author: String,
    pub email: String,
    pub timestamp: String,
    pub message: String,
    pub additions_filtered: u64,
    pub deletions_filtered: u64,
    pub additions_total: u64,
    pub deletions_total: u64,
    pub files_changed_filtered: usize,
    pub files_changed_total: usize,
    pub time_delta_seconds: f64,
    pub addition_velocity_per_min: Option<f64>,
    pub deletion_velocity_per_min: Option<f64>,
    pub reasons: Vec<String>,
    pub reason_details: Vec<Reason>,
}

impl From<&RepositoryStats> for JsonStats {
    fn from(stats: &RepositoryStats) -> Self {
        Self {
            total_commits: stats.total_commits,
            commit_pairs: stats.total_commit_pairs,
            unique_authors: stats.unique_authors,
            time_span_seconds: seconds_f64(stats.time_span),
            first_commit: stats.first_commit,
            last_commit: stats.last_commit,
            total_loc_added_filtered: stats.total_loc_added,
            total_loc_deleted_filtered: stats.total_loc_deleted,
            total_loc_added_unfiltered: stats.unfiltered_loc_added,
            total_loc_deleted_unfiltered: stats.unfiltered_loc_deleted,
            average_velocity_loc_per_min: stats.average_velocity,
            median_velocity_loc_per_min: stats.median_velocity,
            velocity_percentiles: stats.velocity_percentiles,
            authors: stats.authors_sorted().into_iter().cloned().collect(),
        }
    }
}

impl From<&SuspiciousCommit> for JsonSuspiciousCommit {
    fn from(s: &SuspiciousCommit) -> Self {
        let current = &s.pair.current;
        let stats = &s.pair.stats;
        Self {
            hash: current.hash.clone(),
            author: current.author_name.clone(),
            email: current.author_email.clone(),
            timestamp: current.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            message: current.message.clone(),
            additions_filtered: stats.additions,
            deletions_filtered: stats.deletions,
            additions_total: stats.total_additions,
            deletions_total: stats.total_deletions,
            files_changed_filtered: stats.files_changed,
            files_changed_total: stats.files_changed_total,
            time_delta_seconds: seconds_f64(s.pair.time_delta),
            addition_velocity_per_min: s.addition_velocity,
            deletion_velocity_per_min: s.deletion_velocity,
            reasons: s.reasons.iter().map(ToString::to_string).collect(),
            reason_details: s.reasons.clone(),
        }
    }
}

pub fn build(data: &ReportData<'_>) -> JsonReport {
    JsonReport {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: data.repository_path.clone(),
        statistics: JsonStats::from(data.stats),
        thresholds: *data.thresholds,
        suspicious_count: data.suspicious.len(),
        suspicious_commits: data.suspicious.iter().map(JsonSuspiciousCommit::from).collect(),
    }
}

pub fn render(data: &ReportData<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&build(data))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{Detector, ReasonKind};
    use crate::model::{CommitPair, DiffStats};
    use crate::pairing::tests::commit;
    use crate::stats::aggregate;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;

    #[test]
    fn exposes_filtered_and_total_counts_and_reasons() {
        let previous = commit("1111111aaaa", "dev@example.com", 1_000, 0);
        let current = commit("2222222bbbb", "dev@example.com", 1_030, 1);
        let pair = CommitPair {
            previous: previous.clone(),
            current: current.clone(),
            time_delta: TimeDelta::seconds(30),
            stats: DiffStats {
                additions: 200,
                deletions: 4,
                total_additions: 260,
                total_deletions: 9,
                files_changed: 2,
                files_changed_total: 3,
            },
        };
        let mut thresholds = Thresholds::DISABLED;
        thresholds.suspicious_additions = 100;
        thresholds.min_time_delta_seconds = 60;

        let pairs = vec![pair];
        let suspicious = Detector::new(thresholds).unwrap().detect(&pairs);
        let stats = aggregate(&[current, previous], &pairs);
        let data = ReportData {
            repository_path: "/tmp/repo".to_string(),
            stats: &stats,
            thresholds: &thresholds,
            suspicious: &suspicious,
        };

        let v: serde_json::Value = serde_json::from_str(&render(&data).unwrap()).unwrap();

        assert_eq!(v["version"], SCHEMA_VERSION);
        assert_eq!(v["suspicious_count"], 1);
        assert_eq!(v["thresholds"]["suspicious_additions"], 100);
        assert_eq!(v["thresholds"]["max_additions_per_min"], 0.0);
        assert_eq!(v["statistics"]["total_commits"], 2);
        assert_eq!(v["statistics"]["commit_pairs"], 1);
        assert_eq!(v["statistics"]["total_loc_added_unfiltered"], 260);
        assert_eq!(v["statistics"]["time_span_seconds"], 30.0);
        assert_eq!(v["statistics"]["authors"][0]["email"], "dev@example.com");
        assert!(v["statistics"]["velocity_percentiles"].is_object());

        let c = &v["suspicious_commits"][0];
        assert_eq!(c["hash"], "2222222bbbb");
        assert_eq!(c["timestamp"], "1970-01-01T00:17:10Z");
        assert_eq!(c["additions_filtered"], 200);
        assert_eq!(c["additions_total"], 260);
        assert_eq!(c["files_changed_filtered"], 2);
        assert_eq!(c["files_changed_total"], 3);
        assert_eq!(c["time_delta_seconds"], 30.0);
        assert!(c["addition_velocity_per_min"].is_null());
        assert_eq!(c["reasons"].as_array().unwrap().len(), 2);
        assert_eq!(
            c["reasons"][1],
            "Suspicious commit size: 200 additions (threshold: 100 lines)"
        );
        assert_eq!(c["reason_details"][0]["kind"], "short_time_delta");

        let parsed: JsonReport = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.suspicious_commits[0].reason_details[1].kind, ReasonKind::LargeAdditions);
    }

    #[test]
    fn omits_percentiles_without_samples() {
        let stats = aggregate(&[], &[]);
        let thresholds = Thresholds::default();
        let data = ReportData {
            repository_path: String::new(),
            stats: &stats,
            thresholds: &thresholds,
            suspicious: &[],
        };
        let v: serde_json::Value = serde_json::from_str(&render(&data).unwrap()).unwrap();
        assert!(v["statistics"].get("velocity_percentiles").is_none());
        assert_eq!(v["suspicious_commits"].as_array().unwrap().len(), 0);
    }
}
