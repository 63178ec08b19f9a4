use super::exclude::ExcludeMatcher;
use crate::error::{Result, VibeError};
use crate::model::{Commit, CommitOptions, DiffStats};
use crate::pairing::DiffSource;
use chrono::DateTime;
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use similar::{ChangeTag, TextDiff};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
    exclude: ExcludeMatcher,
}

/// Per-file line counts for one changed path.
struct FileChange {
    paths: Vec<String>,
    /// Path used for exclusion decisions.
    path: String,
    added: u64,
    deleted: u64,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self {
            repo,
            path,
            exclude: ExcludeMatcher::none(),
        })
    }

    pub fn with_exclude(mut self, exclude: ExcludeMatcher) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tip(&self, branch: Option<&str>) -> Result<ObjectId> {
        let Some(branch) = branch else {
            let mut head = self.repo.head()?;
            return Ok(head.peel_to_commit_in_place()?.id);
        };

        let refname = format!("refs/heads/{branch}");
        let id = self
            .repo
            .rev_parse_single(refname.as_str())
            .map_err(|e| VibeError::GitRepo(format!("Failed to resolve branch '{branch}': {e}")))?;
        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| VibeError::GitRepo(format!("Not a commit: {refname}")))?;
        Ok(commit.id)
    }

    /// Commits reachable from the tip, newest first (depth-first, first parent first).
    pub fn commits(&self, opts: &CommitOptions) -> Result<Vec<Commit>> {
        let tip = self.tip(opts.branch.as_deref())?;
        let limit = opts.max_depth.filter(|d| *d > 0).unwrap_or(usize::MAX);

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: Vec<ObjectId> = vec![tip];

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Collecting commits...");

        while let Some(commit_id) = stack.pop() {
            if commits.len() >= limit {
                break;
            }
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.read_commit(commit_id)?;
            for parent in commit.parent_hashes.iter().rev() {
                let pid = ObjectId::from_hex(parent.as_bytes())
                    .map_err(|e| VibeError::GitRepo(format!("Invalid parent id {parent}: {e}")))?;
                stack.push(pid);
            }
            commits.push(commit);
            pb.inc(1);
        }

        pb.finish_and_clear();
        info!(count = commits.len(), path = %self.path.display(), "collected commits");
        Ok(commits)
    }

    fn read_commit(&self, id: ObjectId) -> Result<Commit> {
        let commit = self.repo.find_commit(id)?;
        let author = commit.author()?;
        let secs = author.time()?.seconds;
        let timestamp = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| VibeError::InvalidDate(format!("Invalid timestamp: {secs}")))?;

        let message = commit.message()?;
        let message = match message.body {
            Some(body) => format!("{}\n\n{}", message.title, body),
            None => message.title.to_string(),
        };

        Ok(Commit {
            hash: id.to_string(),
            author_name: author.name.to_string(),
            author_email: author.email.to_string(),
            timestamp,
            message,
            parent_hashes: commit.parent_ids().map(|p| p.to_string()).collect(),
        })
    }

    fn tree_changes(&self, from: &str, to: &str) -> Result<Vec<FileChange>> {
        let from_tree = self.repo.find_commit(parse_id(from)?)?.tree()?;
        let to_tree = self.repo.find_commit(parse_id(to)?)?.tree()?;

        let changes: Vec<ChangeDetached> =
            self.repo.diff_tree_to_tree(Some(&from_tree), Some(&to_tree), None)?;

        let mut files = Vec::with_capacity(changes.len());
        for change in changes {
            if let Some(file) = self.file_change(change)? {
                files.push(file);
            }
        }
        Ok(files)
    }

    fn file_change(&self, change: ChangeDetached) -> Result<Option<FileChange>> {
        let file = match change {
            ChangeDetached::Addition {
                id,
                location,
                entry_mode,
                ..
            } => {
                if !is_file(entry_mode) {
                    return Ok(None);
                }
                let path = location.to_string();
                FileChange {
                    paths: vec![path.clone()],
                    path,
                    added: self.count_lines(id)?,
                    deleted: 0,
                }
            }
            ChangeDetached::Deletion {
                id,
                location,
                entry_mode,
                ..
            } => {
                if !is_file(entry_mode) {
                    return Ok(None);
                }
                let path = location.to_string();
                FileChange {
                    paths: vec![path.clone()],
                    path,
                    added: 0,
                    deleted: self.count_lines(id)?,
                }
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                entry_mode,
                ..
            } => {
                if !is_file(entry_mode) {
                    return Ok(None);
                }
                let (added, deleted) = self.line_diff(previous_id, id)?;
                let path = location.to_string();
                FileChange {
                    paths: vec![path.clone()],
                    path,
                    added,
                    deleted,
                }
            }
            ChangeDetached::Rewrite {
                source_id,
                source_location,
                id,
                location,
                entry_mode,
                copy,
                ..
            } => {
                if !is_file(entry_mode) {
                    return Ok(None);
                }
                let (added, deleted) = self.line_diff(source_id, id)?;
                let path = location.to_string();
                let paths = if copy {
                    vec![path.clone()]
                } else {
                    vec![source_location.to_string(), path.clone()]
                };
                FileChange {
                    paths,
                    path,
                    added,
                    deleted,
                }
            }
        };
        Ok(Some(file))
    }

    fn blob_text(&self, id: ObjectId) -> Result<Option<String>> {
        let object = self.repo.find_object(id)?;
        let data = object.data.as_slice();
        if is_binary(data) {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(data).into_owned()))
    }

    fn count_lines(&self, id: ObjectId) -> Result<u64> {
        Ok(self
            .blob_text(id)?
            .map(|text| text.lines().count() as u64)
            .unwrap_or(0))
    }

    fn line_diff(&self, old: ObjectId, new: ObjectId) -> Result<(u64, u64)> {
        let (Some(old_text), Some(new_text)) = (self.blob_text(old)?, self.blob_text(new)?) else {
            return Ok((0, 0));
        };
        Ok(count_line_changes(&old_text, &new_text))
    }
}

impl DiffSource for GitRepo {
    fn diff_stats(&self, previous: &Commit, current: &Commit) -> Result<DiffStats> {
        let changes = self.tree_changes(&previous.hash, &current.hash)?;

        let mut stats = DiffStats::default();
        let mut touched: HashSet<&str> = HashSet::new();
        let mut touched_filtered: HashSet<&str> = HashSet::new();

        for file in &changes {
            let excluded = self.exclude.is_excluded(&file.path);
            stats.total_additions += file.added;
            stats.total_deletions += file.deleted;
            for path in &file.paths {
                touched.insert(path);
                if !excluded {
                    touched_filtered.insert(path);
                }
            }
            if excluded {
                debug!(path = %file.path, "excluded from filtered counts");
                continue;
            }
            stats.additions += file.added;
            stats.deletions += file.deleted;
        }

        stats.files_changed = touched_filtered.len();
        stats.files_changed_total = touched.len();
        Ok(stats)
    }
}

fn parse_id(hash: &str) -> Result<ObjectId> {
    ObjectId::from_hex(hash.as_bytes())
        .map_err(|e| VibeError::GitRepo(format!("Invalid commit ID {hash}: {e}")))
}

fn is_file(mode: gix::objs::tree::EntryMode) -> bool {
    !mode.is_tree() && !mode.is_commit()
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8192).any(|&b| b == 0)
}

/// Inserted and deleted line counts between two texts.
///
/// Blank lines count like any other line, matching `git diff --numstat`.
pub fn count_line_changes(old: &str, new: &str) -> (u64, u64) {
    let diff = TextDiff::from_lines(old, new);
    let mut added = 0u64;
    let mut deleted = 0u64;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => deleted += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, deleted)
}
