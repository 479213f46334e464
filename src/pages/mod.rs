pub mod create_story;
pub mod home;
pub mod not_found;
pub mod story_flow;
pub mod upload_book;
