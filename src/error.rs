use thiserror::Error;

pub type Result<T> = std::result::Result<T, VibeError>;

#[derive(Error, Debug)]
pub enum VibeError {
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),
    #[error("Invalid time delta: {0} (must be positive)")]
    InvalidTimeDelta(chrono::TimeDelta),
    #[error("Invalid exclude pattern: {0}")]
    InvalidPattern(#[from] globset::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Date parse error: {0}")]
    DateParse(#[from] Box<gix::date::parse::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
}

// gix errors are large; keep them boxed so `Result<T>` stays small.
impl From<gix::discover::Error> for VibeError {
    fn from(err: gix::discover::Error) -> Self {
        VibeError::GitDiscover(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for VibeError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        VibeError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for VibeError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        VibeError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for VibeError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        VibeError::RefFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for VibeError {
    fn from(err: gix::object::commit::Error) -> Self {
        VibeError::Commit(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for VibeError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        VibeError::HeadPeel(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for VibeError {
    fn from(err: gix::objs::decode::Error) -> Self {
        VibeError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::date::parse::Error> for VibeError {
    fn from(err: gix::date::parse::Error) -> Self {
        VibeError::DateParse(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for VibeError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        VibeError::DiffTreeToTree(Box::new(err))
    }
}
