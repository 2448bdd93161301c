pub mod auth;
pub mod brute_force;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use brute_force::{BruteForceConfig, LockStatus, LoginAttemptTracker};
pub use response::{ApiResponse, ApiResult, PaginationMeta};
