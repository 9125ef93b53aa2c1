pub mod admin;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod leave;
pub mod loans;
pub mod meetings;
pub mod notice_periods;
pub mod shared;
pub mod tasks;
