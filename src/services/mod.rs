pub mod analysis;
pub mod auth;
pub mod cache;
pub mod database;
pub mod grader;

pub use analysis::AnalysisService;
pub use auth::{AuthService, AuthUser};
pub use cache::Cache;
pub use database::Database;
pub use grader::{Grader, GradingSummary};
