pub mod holiday;
pub mod leave;
pub mod setting;
pub mod user;
