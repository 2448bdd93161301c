// Protected handlers - bearer token required (routes under /api)

pub mod auth;
pub mod dashboard;
pub mod posts;
pub mod user;
