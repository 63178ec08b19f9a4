pub mod exclude;
pub mod repo;

pub use exclude::ExcludeMatcher;
pub use repo::GitRepo;
