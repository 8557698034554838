//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod graph_repo;
pub mod permission_repo;
pub mod project_repo;
pub mod stats_repo;
pub mod task_repo;
pub mod user_repo;

pub use graph_repo::GraphRepo;
pub use permission_repo::PermissionRepo;
pub use project_repo::ProjectRepo;
pub use stats_repo::StatsRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
