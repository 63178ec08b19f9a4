use crate::error::Result;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Matches repository-relative paths against exclusion globs.
///
/// A path is excluded when a pattern matches either the whole path or its
/// file name. `*` stops at `/`.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    set: GlobSet,
    empty: bool,
}

impl ExcludeMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern.as_ref())
                .literal_separator(true)
                .build()?;
            builder.add(glob);
        }
        Ok(Self {
            set: builder.build()?,
            empty: patterns.is_empty(),
        })
    }

    pub fn none() -> Self {
        Self {
            set: GlobSet::empty(),
            empty: true,
        }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        if self.empty {
            return false;
        }
        if self.set.is_match(path) {
            return true;
        }
        Path::new(path)
            .file_name()
            .is_some_and(|name| self.set.is_match(name))
    }
}
