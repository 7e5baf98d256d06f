pub mod assessment;
pub mod attendance;
pub mod intern;
pub mod leave_request;
pub mod office_policy;
pub mod supervisor;
pub mod task;
