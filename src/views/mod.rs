pub mod comments;
pub mod contact;
pub mod detail;
pub mod gallery;
pub mod home;
