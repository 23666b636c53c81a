//! sea-orm entities for the CMS tables.

pub mod banner;
pub mod blog_post;
pub mod category;
pub mod current_status;

pub use current_status::CurrentStatus;
