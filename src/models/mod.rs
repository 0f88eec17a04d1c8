pub mod catalog;
pub mod poster;
pub mod review;
pub mod subject;
pub mod user;

pub use catalog::{Movie, Series};
pub use poster::Poster;
pub use review::{Review, ReviewView};
pub use subject::Subject;
pub use user::{Actor, User, UserRole};
