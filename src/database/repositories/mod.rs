pub mod activity;
pub mod announcement;
pub mod attendance;
pub mod leave;
pub mod loan;
pub mod meeting;
pub mod notice;
pub mod task;
pub mod user;

pub use activity::ActivityRepository;
pub use announcement::AnnouncementRepository;
pub use attendance::AttendanceRepository;
pub use leave::LeaveRepository;
pub use loan::LoanRepository;
pub use meeting::MeetingRepository;
pub use notice::NoticePeriodRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
