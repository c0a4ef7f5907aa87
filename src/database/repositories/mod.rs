pub mod attendance;
pub mod employee;
pub mod leave;
pub mod user;

pub use attendance::AttendanceRepository;
pub use employee::EmployeeRepository;
pub use leave::LeaveRepository;
pub use user::UserRepository;
