pub mod catalog;
pub mod poster;
pub mod review;
pub mod user;
