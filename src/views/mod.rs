mod admin_dashboard;
mod applications;
mod auth;
mod company_detail;
mod interviews;
mod not_found;
mod resources;
mod resume;
mod sidebar;
mod student_dashboard;

pub use admin_dashboard::{AdminDashboard, AdminSection};
pub use applications::Applications;
pub use auth::Auth;
pub use company_detail::CompanyDetail;
pub use interviews::Interviews;
pub use not_found::NotFound;
pub use resources::Resources;
pub use resume::ResumeBuilder;
pub use sidebar::SidebarLayout;
pub use student_dashboard::StudentDashboard;
