// Post CRUD with tagging and favoriting, addressed by slug

pub mod favorite;
pub mod post_create;
pub mod post_delete;
pub mod post_get;
pub mod post_list;
pub mod post_update;
pub mod tag_list;
pub mod utils;

pub use favorite::{favorite_post, unfavorite_post};
pub use post_create::post_create;
pub use post_delete::post_delete;
pub use post_get::post_get;
pub use post_list::post_list;
pub use post_update::post_update;
pub use tag_list::tag_list;
