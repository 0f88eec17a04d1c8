pub mod get;
pub mod post;

pub use get::list_posters_for_subject;
pub use post::create_poster;
