use leptos::prelude::*;

#[component]
pub fn Icon(
    /// Icon file name without the .svg extension
    name: &'static str,
    /// CSS classes for sizing and colour
    #[prop(default = "w-5 h-5")]
    class: &'static str,
) -> impl IntoView {
    let icon_path = format!("/icons/{}.svg", name);

    view! {
        <img
            src=icon_path
            class=class
            alt=name
            draggable=false
        />
    }
}

/// Icon names shipped under `public/icons`
pub mod icons {
    pub const HOME: &str = "home";
    pub const MAIL: &str = "mail";
    pub const MAIL_OPEN: &str = "mail-open";
    pub const MESSAGES: &str = "messages";
    pub const SPARKLES: &str = "sparkles";
    pub const FLAG: &str = "flag";
    pub const LINK: &str = "link";
    pub const BUILDING: &str = "building";
    pub const USERS: &str = "users";
    pub const AWARD: &str = "award";
    pub const PACKAGE: &str = "package";
    pub const SEARCH: &str = "search";
    pub const FILTER: &str = "filter";
    pub const REFRESH: &str = "refresh";
    pub const PAPERCLIP: &str = "paperclip";
    pub const CHEVRON_LEFT: &str = "chevron-left";
    pub const CHEVRON_RIGHT: &str = "chevron-right";
    pub const ARROW_LEFT: &str = "arrow-left";
    pub const TRASH: &str = "trash";
    pub const CHECK: &str = "check";
    pub const X: &str = "x";
    pub const EYE: &str = "eye";
    pub const EYE_CLOSED: &str = "eye-closed";
    pub const ALERT_CIRCLE: &str = "alert-circle";
    pub const WARNING: &str = "warning";
    pub const INFORMATION_CIRCLE: &str = "information-circle";
    pub const LOADER: &str = "loader";
    pub const LOGOUT: &str = "logout";
    pub const SUN: &str = "sun";
    pub const MOON: &str = "moon";
    pub const MONITOR: &str = "monitor";
    pub const LOCK: &str = "lock";
    pub const MENU: &str = "menu";
}
