pub mod activity_logger;
pub mod auth;
pub mod clock;
pub mod leave_reconciler;
pub mod workday;

pub use activity_logger::ActivityLogger;
pub use auth::{AuthService, Claims};
pub use clock::{AttendancePolicy, ClockEngine};
pub use leave_reconciler::LeaveReconciler;
