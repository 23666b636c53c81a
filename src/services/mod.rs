// Entity services
pub mod banners;
pub mod blog_posts;
pub mod categories;

// Criteria read side shared by all entities
pub mod query;

// Category parent/child index
pub mod category_tree;

// Uploaded image storage
pub mod images;
