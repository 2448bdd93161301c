// User profile and account management

pub mod profile;

pub use profile::{account_delete, profile_get, profile_patch};
