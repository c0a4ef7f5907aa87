pub mod attendance;
pub mod employee;
pub mod leave;
pub(crate) mod macros;
pub mod user;

pub use attendance::{
    derive_manual_entry, hours_between, round_hours, AttendanceQuery, AttendanceRecord,
    AttendanceStatus, ManualAttendanceInput, FULL_DAY_HOURS, HALF_DAY_HOURS,
};
pub use employee::{CreateEmployeeInput, Employee, EmployeeStatus, UpdateEmployeeInput};
pub use leave::{
    LeaveQuery, LeaveRequest, LeaveRequestInput, LeaveStatus, LeaveStatusInput, LeaveType,
};
pub use user::{
    AuthResponse, LoginInput, RegisterInput, UpdateUserInput, User, UserInfo, UserRole,
};
