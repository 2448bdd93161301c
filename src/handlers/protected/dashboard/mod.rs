// Dashboard statistics and activity for the authenticated user

pub mod overview;

pub use overview::{activity_get, overview_get, stats_get};
