use super::ReportData;
use crate::detector::format_time_delta;
use crate::error::Result;
use crate::stats::RepositoryStats;
use crate::util::truncate_message;
use chrono::{SecondsFormat, TimeDelta};
use console::style;
use std::fmt::Write;

const RULE: &str = "─";

pub fn render(data: &ReportData<'_>) -> Result<String> {
    let mut out = String::new();
    write_report(&mut out, data)?;
    Ok(out)
}

fn write_report(out: &mut String, data: &ReportData<'_>) -> std::fmt::Result {
    let stats = data.stats;

    writeln!(out, "{}", style("Vibector Analysis Report").bold())?;
    writeln!(out, "{}", RULE.repeat(50))?;
    if !data.repository_path.is_empty() {
        writeln!(out, "Repository: {}", style(&data.repository_path).dim())?;
    }
    writeln!(out)?;

    section(out, "Repository Statistics")?;
    writeln!(out, "Total commits:         {}", style(stats.total_commits).cyan())?;
    writeln!(out, "Commit pairs:          {}", style(stats.total_commit_pairs).cyan())?;
    writeln!(out, "Unique authors:        {}", style(stats.unique_authors).yellow())?;
    writeln!(out, "Time span:             {}", format_span(stats.time_span))?;
    if let (Some(first), Some(last)) = (stats.first_commit, stats.last_commit) {
        writeln!(
            out,
            "Period:                {} to {}",
            style(first.format("%Y-%m-%d")).dim(),
            style(last.format("%Y-%m-%d")).dim()
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Lines of code (filtered, used for detection):")?;
    writeln!(out, "  Additions:           {} lines", style(stats.total_loc_added).green())?;
    writeln!(out, "  Deletions:           {} lines", style(stats.total_loc_deleted).red())?;
    writeln!(out, "Lines of code (total, including excluded files):")?;
    writeln!(out, "  Additions:           {} lines", style(stats.unfiltered_loc_added).green())?;
    writeln!(out, "  Deletions:           {} lines", style(stats.unfiltered_loc_deleted).red())?;
    writeln!(out)?;

    write_velocity(out, stats)?;
    write_authors(out, stats)?;

    let t = data.thresholds;
    section(out, "Configured Thresholds")?;
    writeln!(out, "Suspicious additions:  {} lines (0 = disabled)", t.suspicious_additions)?;
    writeln!(out, "Suspicious deletions:  {} lines (0 = disabled)", t.suspicious_deletions)?;
    writeln!(out, "Max additions/min:     {:.2} additions/min (0 = disabled)", t.max_additions_per_min)?;
    writeln!(out, "Max deletions/min:     {:.2} deletions/min (0 = disabled)", t.max_deletions_per_min)?;
    writeln!(out, "Min time delta:        {} seconds (0 = disabled)", t.min_time_delta_seconds)?;
    writeln!(out)?;

    section(out, "Suspicious Commits")?;
    if data.suspicious.is_empty() {
        writeln!(out, "{}", style("No suspicious commits detected.").green())?;
        return Ok(());
    }
    writeln!(
        out,
        "Found {} suspicious commit(s):\n",
        style(data.suspicious.len()).red().bold()
    )?;

    for (i, s) in data.suspicious.iter().enumerate() {
        let c = &s.pair.current;
        let d = &s.pair.stats;
        writeln!(out, "[{}] Commit: {}", i + 1, style(c.short_hash()).yellow())?;
        writeln!(out, "    Author:          {} <{}>", c.author_name, c.author_email)?;
        writeln!(
            out,
            "    Date:            {}",
            c.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
        writeln!(
            out,
            "    Additions:       {} lines (filtered) / {} lines (total)",
            d.additions, d.total_additions
        )?;
        writeln!(
            out,
            "    Deletions:       {} lines (filtered) / {} lines (total)",
            d.deletions, d.total_deletions
        )?;
        writeln!(
            out,
            "    Files changed:   {} (filtered) / {} (total)",
            d.files_changed, d.files_changed_total
        )?;
        writeln!(out, "    Time delta:      {}", format_time_delta(s.pair.time_delta))?;
        if let Some(v) = s.addition_velocity {
            writeln!(out, "    Add velocity:    {v:.2} additions/min")?;
        }
        if let Some(v) = s.deletion_velocity {
            writeln!(out, "    Del velocity:    {v:.2} deletions/min")?;
        }
        writeln!(out, "    Message:         {}", truncate_message(&c.message, 60))?;
        writeln!(out, "    Reasons:")?;
        for reason in &s.reasons {
            writeln!(out, "      - {}", style(reason).red())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{}", style(title).bold())?;
    writeln!(out, "{}", RULE.repeat(title.chars().count()))
}

fn write_velocity(out: &mut String, stats: &RepositoryStats) -> std::fmt::Result {
    section(out, "Velocity Statistics")?;
    writeln!(out, "Average velocity:      {:.2} LOC/min", stats.average_velocity)?;
    writeln!(out, "Median velocity:       {:.2} LOC/min", stats.median_velocity)?;
    if let Some(p) = stats.velocity_percentiles {
        writeln!(out, "Percentiles:")?;
        for (label, value) in [
            ("50th", p.p50),
            ("75th", p.p75),
            ("90th", p.p90),
            ("95th", p.p95),
            ("99th", p.p99),
        ] {
            writeln!(out, "  {label}:                {value:.2} LOC/min")?;
        }
    }
    writeln!(out)
}

fn write_authors(out: &mut String, stats: &RepositoryStats) -> std::fmt::Result {
    if stats.authors.is_empty() {
        return Ok(());
    }
    section(out, "Authors")?;
    writeln!(
        out,
        "{:<36} {:>7} {:>9} {:>9} {:>10} {:>10}",
        style("Author").bold(),
        style("Commits").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Avg/min").bold(),
        style("Max/min").bold()
    )?;
    for a in stats.authors_sorted() {
        writeln!(
            out,
            "{:<36} {:>7} {:>9} {:>9} {:>10.2} {:>10.2}",
            truncate_message(&a.email, 36),
            a.commit_count,
            a.loc_added,
            a.loc_deleted,
            a.avg_velocity,
            a.max_velocity
        )?;
    }
    writeln!(out)
}

fn format_span(span: TimeDelta) -> String {
    let secs = span.num_seconds().max(0) as u64;
    if secs == 0 {
        return "0s".to_string();
    }
    humantime::format_duration(std::time::Duration::from_secs(secs)).to_string()
}
