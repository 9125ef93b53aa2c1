pub mod activity;
pub mod announcement;
pub mod attendance;
pub mod auth;
pub mod leave;
pub mod loan;
mod macros;
pub mod meeting;
pub mod notice;
pub mod task;
pub mod user;

// Re-export all models for easy importing
pub use activity::*;
pub use announcement::*;
pub use attendance::*;
pub use auth::*;
pub use leave::*;
pub use loan::*;
pub use meeting::*;
pub use notice::*;
pub use task::*;
pub use user::*;
