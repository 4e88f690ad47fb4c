// Request extractors shared by the HTTP handlers

pub mod current_user;

pub use current_user::CurrentUser;
