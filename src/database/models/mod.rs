pub mod post;
pub mod tag;
pub mod user;

pub use post::Post;
pub use tag::Tag;
pub use user::User;
