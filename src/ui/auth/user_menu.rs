//! User menu component
//!
//! Avatar button in the header with the signed-in user's name, email and a
//! sign-out action.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use super::context::use_auth_context;
use crate::core::routes;
use crate::core::session::UserRecord;
use crate::ui::icon::{Icon, icons};

/// Background colours picked from the user's email
const AVATAR_COLORS: [&str; 8] = [
    "bg-blue-500",
    "bg-green-500",
    "bg-yellow-500",
    "bg-red-500",
    "bg-purple-500",
    "bg-pink-500",
    "bg-indigo-500",
    "bg-teal-500",
];

fn avatar_color(seed: &str) -> &'static str {
    let hash = seed.bytes().fold(0u32, |acc, b| acc.wrapping_add(u32::from(b)));
    AVATAR_COLORS[(hash as usize) % AVATAR_COLORS.len()]
}

/// User menu component for the header
#[component]
pub fn UserMenu() -> impl IntoView {
    let auth = use_auth_context();
    let navigate = use_navigate();

    let menu_open = RwSignal::new(false);

    let handle_logout = move |_| {
        menu_open.set(false);
        auth.logout();
        navigate(routes::HOME, Default::default());
    };

    view! {
        <div class="relative">
            {move || match auth.user() {
                None => view! {
                    <div class="w-8 h-8 rounded-full bg-theme-secondary animate-pulse"></div>
                }.into_any(),
                Some(user) => {
                    let name = user.full_name();
                    let logout = handle_logout.clone();
                    view! {
                        <button
                            class="flex items-center gap-2 p-1 rounded-lg hover:bg-theme-secondary transition-colors"
                            aria-haspopup="menu"
                            on:click=move |_| menu_open.update(|v| *v = !*v)
                        >
                            <UserAvatar user=user.clone() size=32 />
                            <span class="hidden sm:block text-sm font-medium text-theme-primary max-w-[160px] truncate">
                                {name.clone()}
                            </span>
                        </button>
                        <Show when=move || menu_open.get()>
                            <div class="absolute right-0 mt-2 w-60 bg-theme-primary rounded-lg shadow-lg border border-theme py-1 z-50" role="menu">
                                <div class="px-4 py-3 border-b border-theme">
                                    <p class="text-sm font-medium text-theme-primary truncate">{name.clone()}</p>
                                    <p class="text-xs text-theme-tertiary truncate">{user.email.clone()}</p>
                                </div>
                                <div class="py-1">
                                    <button
                                        class="w-full px-4 py-2 text-sm text-left text-red-500
                                               hover:bg-red-50 dark:hover:bg-red-900/20 transition-colors
                                               flex items-center gap-2"
                                        role="menuitem"
                                        on:click=logout.clone()
                                    >
                                        <Icon name=icons::LOGOUT class="h-4 w-4" />
                                        "Sign Out"
                                    </button>
                                </div>
                            </div>
                        </Show>
                    }.into_any()
                }
            }}
        </div>
    }
}

/// User avatar component
#[component]
pub fn UserAvatar(
    /// User data
    user: UserRecord,
    /// Avatar size in pixels
    #[prop(default = 32)]
    size: u32,
) -> impl IntoView {
    let size_style = format!(
        "width: {}px; height: {}px; min-width: {}px; min-height: {}px;",
        size, size, size, size
    );
    let font_size = if size >= 40 { "text-lg" } else { "text-sm" };

    view! {
        <div
            class=format!(
                "{} rounded-full flex items-center justify-center text-white font-medium {}",
                avatar_color(&user.email),
                font_size
            )
            style=size_style
            title=user.full_name()
        >
            {user.initials()}
        </div>
    }
}
