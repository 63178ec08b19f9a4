use chrono::{DateTime, TimeDelta, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vibector::detector::{Detector, Thresholds};
use vibector::model::{Commit, CommitPair, DiffStats};
use vibector::stats::aggregate;

/// Newest-first synthetic history with a spread of sizes, gaps and authors.
fn synthetic_history(n: usize) -> (Vec<Commit>, Vec<CommitPair>) {
    let base = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    let commits: Vec<Commit> = (0..n)
        .map(|i| {
            let age = (n - i) as i64 * 97;
            Commit {
                hash: format!("{i:040x}"),
                author_name: format!("dev{}", i % 7),
                author_email: format!("dev{}@example.com", i % 7),
                timestamp: base + TimeDelta::seconds(age),
                message: format!("change {i}"),
                parent_hashes: vec![format!("{:040x}", i + 1)],
            }
        })
        .collect();

    let pairs = commits
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let additions = ((i * 37) % 900) as u64;
            let deletions = ((i * 53) % 1300) as u64;
            CommitPair {
                current: w[0].clone(),
                previous: w[1].clone(),
                time_delta: w[0].timestamp - w[1].timestamp,
                stats: DiffStats {
                    additions,
                    deletions,
                    total_additions: additions + 10,
                    total_deletions: deletions,
                    files_changed: 1 + i % 5,
                    files_changed_total: 2 + i % 5,
                },
            }
        })
        .collect();

    (commits, pairs)
}

fn bench_engine(c: &mut Criterion) {
    let (commits, pairs) = synthetic_history(10_000);
    let detector = Detector::new(Thresholds::default()).unwrap();

    c.bench_function("detect_10k_pairs", |b| {
        b.iter(|| detector.detect(black_box(&pairs)))
    });

    c.bench_function("aggregate_10k_pairs", |b| {
        b.iter(|| aggregate(black_box(&commits), black_box(&pairs)))
    });
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
