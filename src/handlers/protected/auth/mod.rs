// Session handlers for authenticated users

pub mod session;

pub use session::{logout_post, me_get};
