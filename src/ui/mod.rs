pub mod auth;
pub mod common;
pub mod icon;
pub mod layout;
pub mod notifications;
pub mod pages;
pub mod query;
pub mod sidebar;
pub mod theme;

pub use icon::{Icon, icons};
pub use layout::DashboardLayout;
pub use sidebar::Sidebar;
