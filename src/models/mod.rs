pub mod artwork;
pub mod comment;
pub mod feed;
