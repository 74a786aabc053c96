//! Authentication UI module
//!
//! Auth context plus the login, signup and user menu components.

mod context;
mod login_form;
mod signup_form;
mod user_menu;

pub use context::{AuthContext, provide_auth_context, use_auth_context};
pub use login_form::LoginForm;
pub use signup_form::SignupForm;
pub use user_menu::{UserAvatar, UserMenu};
