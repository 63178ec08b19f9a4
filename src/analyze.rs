use crate::cli::AnalyzeArgs;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::detector::{Detector, SuspiciousCommit};
use crate::error::Result;
use crate::git::{ExcludeMatcher, GitRepo};
use crate::model::{Commit, CommitOptions, CommitPair, DiffStats};
use crate::pairing::{build_pairs, DiffSource};
use crate::report::{self, Format, ReportData};
use crate::stats::{aggregate, RepositoryStats};
use anyhow::{anyhow, Context};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn exec(config_path: Option<&Path>, args: AnalyzeArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path(config_path);
    let config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;

    let mut thresholds = config.thresholds;
    args.thresholds.apply(&mut thresholds);
    let detector = Detector::new(thresholds).context("Invalid detection thresholds")?;

    let mut patterns = config.exclude_files;
    patterns.extend(args.exclude.iter().cloned());
    let exclude = ExcludeMatcher::new(&patterns).context("Invalid exclude pattern")?;

    let format = match (args.format, args.output.as_deref()) {
        (Some(format), _) => format,
        (None, Some(path)) => Format::from_path(path)?,
        (None, None) => Format::Text,
    };

    let repo = GitRepo::open(args.repo.as_ref())
        .context("Failed to open git repository")?
        .with_exclude(exclude);

    let mut opts = CommitOptions::new();
    if let Some(branch) = &args.branch {
        opts = opts.with_branch(branch.as_str());
    }
    if let Some(depth) = args.max_depth {
        opts = opts.with_max_depth(depth);
    }

    let commits = repo
        .commits(&opts)
        .context("Failed to collect commits from repository")?;
    let pairs = pair_with_progress(&commits, &repo);
    let (suspicious, stats) = analyze(&detector, &commits, &pairs)?;

    info!(
        commits = commits.len(),
        pairs = pairs.len(),
        suspicious = suspicious.len(),
        "analysis complete"
    );

    let data = ReportData {
        repository_path: repo.path().to_string_lossy().to_string(),
        stats: &stats,
        thresholds: detector.thresholds(),
        suspicious: &suspicious,
    };

    match args.output {
        Some(path) => {
            report::write_to(&data, format, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("Report written to {}", style(path.display()).green());
        }
        None => {
            let rendered = report::render(&data, format).context("Failed to render report")?;
            println!("{}", rendered.trim_end());
        }
    }

    Ok(())
}

/// Runs detection and aggregation side by side over the same pairs.
pub fn analyze(
    detector: &Detector,
    commits: &[Commit],
    pairs: &[CommitPair],
) -> anyhow::Result<(Vec<SuspiciousCommit>, RepositoryStats)> {
    std::thread::scope(|s| {
        let detection = s.spawn(|| detector.detect(pairs));
        let stats = aggregate(commits, pairs);
        let suspicious = detection
            .join()
            .map_err(|_| anyhow!("Detector thread panicked"))?;
        Ok((suspicious, stats))
    })
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    default.is_file().then_some(default)
}

/// Counts finished diffs on a progress bar.
struct Tracked<'a, D: ?Sized> {
    inner: &'a D,
    bar: ProgressBar,
}

impl<D: DiffSource + ?Sized> DiffSource for Tracked<'_, D> {
    fn diff_stats(&self, previous: &Commit, current: &Commit) -> Result<DiffStats> {
        let stats = self.inner.diff_stats(previous, current);
        self.bar.inc(1);
        stats
    }
}

fn pair_with_progress<D: DiffSource + ?Sized>(commits: &[Commit], source: &D) -> Vec<CommitPair> {
    let bar = ProgressBar::new(commits.len().saturating_sub(1) as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message("Diffing commits...");

    let tracked = Tracked {
        inner: source,
        bar: bar.clone(),
    };
    let pairs = build_pairs(commits, &tracked);
    bar.finish_and_clear();
    pairs
}
