//! Common reusable UI components

pub mod badge;
pub mod button;
pub mod chart;
pub mod form;
pub mod message;
pub mod modal;
pub mod page_header;
pub mod pagination;
pub mod spinner;
pub mod stats;
pub mod tabs;

pub use badge::{Badge, BadgeVariant};
pub use button::{Button, ButtonSize, ButtonVariant};
pub use chart::{BarChart, ChartBar};
pub use form::{FormField, SelectField};
pub use message::{EmptyState, ErrorMessage, ErrorState};
pub use modal::{BaseModal, ConfirmDialog};
pub use page_header::PageHeader;
pub use pagination::Pager;
pub use spinner::{LoadingSpinner, Skeleton, SkeletonGroup, Spinner, SpinnerSize};
pub use stats::StatsCard;
pub use tabs::{TabItem, Tabs};
