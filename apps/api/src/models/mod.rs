pub mod resume;
pub mod stored;
pub mod user;
