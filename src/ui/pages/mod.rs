//! Application pages
//!
//! The landing page and the dashboard home live here; the email service and
//! optical analytics pages are grouped in their own modules.

mod dashboard;
mod landing;
mod not_found;
pub mod obwb;
pub mod optical;

pub use dashboard::DashboardPage;
pub use landing::LandingPage;
pub use not_found::NotFoundPage;
