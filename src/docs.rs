use crate::api::assessment::{AssessmentFilter, AssessmentListResponse, CreateAssessment};
use crate::api::attendance::{
    AttendanceFilter, AttendanceListResponse, PermissionReq, ReportQuery, ReportResponse,
};
use crate::api::intern::{CreateIntern, InternListResponse, InternQuery};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse, LeaveType};
use crate::api::office_policy::PolicyUpdateReq;
use crate::api::supervisor::CreateSupervisor;
use crate::api::task::{
    CreateTask, ReviewDecision, ReviewTask, SubmitTask, TaskFilter, TaskListResponse,
};
use crate::attendance::geo::Coordinates;
use crate::model::assessment::Assessment;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, PermissionKind};
use crate::model::intern::Intern;
use crate::model::leave_request::LeaveRequest;
use crate::model::office_policy::OfficePolicy;
use crate::model::supervisor::Supervisor;
use crate::model::task::{Task, TaskStatus};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "InternHub API",
        version = "1.0.0",
        description = r#"
## InternHub — Internship Program Management

This API powers **InternHub**, a system for running an internship program
end to end: geofenced attendance, task assignment and review, leave
requests, and monthly assessments.

### 🔹 Key Features
- **Attendance**
  - GPS-validated check-in within the office geofence
  - `present`/`late` derived from the configured late tolerance
  - Sick/permission days with proof documents, monthly recaps
- **Intern & Supervisor Management**
  - Create, update, list, and view profiles
- **Task Management**
  - Assign, submit, approve, or send back for revision
- **Leave Management**
  - Apply for leave, approve/reject requests, view history
- **Assessments**
  - Monthly component scores with a derived overall score

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Role gates apply: **Admin**, **Supervisor**, and **Intern** see different
slices of the data.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::submit_permission,
        crate::api::attendance::today,
        crate::api::attendance::list_attendance,
        crate::api::attendance::update_record,
        crate::api::attendance::delete_record,
        crate::api::attendance::monthly_report,

        crate::api::office_policy::get_policy,
        crate::api::office_policy::update_policy,

        crate::api::intern::create_intern,
        crate::api::intern::get_intern,
        crate::api::intern::list_interns,
        crate::api::intern::update_intern,
        crate::api::intern::delete_intern,

        crate::api::supervisor::create_supervisor,
        crate::api::supervisor::get_supervisor,
        crate::api::supervisor::list_supervisors,
        crate::api::supervisor::update_supervisor,
        crate::api::supervisor::delete_supervisor,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::task::create_task,
        crate::api::task::submit_task,
        crate::api::task::review_task,
        crate::api::task::get_task,
        crate::api::task::list_tasks,

        crate::api::assessment::create_assessment,
        crate::api::assessment::get_assessment,
        crate::api::assessment::list_assessments
    ),
    components(
        schemas(
            Coordinates,
            AttendanceRecord,
            AttendanceStatus,
            PermissionKind,
            PermissionReq,
            AttendanceFilter,
            AttendanceListResponse,
            ReportQuery,
            ReportResponse,
            OfficePolicy,
            PolicyUpdateReq,
            Intern,
            CreateIntern,
            InternQuery,
            InternListResponse,
            Supervisor,
            CreateSupervisor,
            LeaveRequest,
            LeaveType,
            CreateLeave,
            LeaveFilter,
            LeaveListResponse,
            Task,
            TaskStatus,
            CreateTask,
            SubmitTask,
            ReviewTask,
            ReviewDecision,
            TaskFilter,
            TaskListResponse,
            Assessment,
            CreateAssessment,
            AssessmentFilter,
            AssessmentListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Geofenced attendance APIs"),
        (name = "Policy", description = "Office geofence and schedule policy"),
        (name = "Intern", description = "Intern profile APIs"),
        (name = "Supervisor", description = "Supervisor profile APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Task", description = "Task assignment and review APIs"),
        (name = "Assessment", description = "Monthly assessment APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
