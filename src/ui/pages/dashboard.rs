//! Dashboard home with quick actions

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

use crate::core::routes;
use crate::ui::auth::use_auth_context;
use crate::ui::{Icon, icons};

struct QuickAction {
    title: &'static str,
    description: &'static str,
    path: &'static str,
    icon: &'static str,
}

const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        title: "Connect Email",
        description: "Link your email account to get started",
        path: routes::CONNECT_EMAIL,
        icon: icons::LINK,
    },
    QuickAction {
        title: "View Emails",
        description: "Access and manage your email inbox",
        path: routes::EMAILS,
        icon: icons::MAIL,
    },
    QuickAction {
        title: "AI Digest",
        description: "Generate comprehensive email summaries",
        path: routes::AI_DIGEST,
        icon: icons::SPARKLES,
    },
    QuickAction {
        title: "Follow-ups",
        description: "Track emails requiring responses",
        path: routes::FOLLOW_UPS,
        icon: icons::FLAG,
    },
];

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth_context();
    let greeting = move || match auth.user() {
        Some(user) if !user.first_name.is_empty() => format!("Welcome back, {}", user.first_name),
        _ => "Welcome to your email management dashboard".to_string(),
    };

    view! {
        <Title text="Dashboard"/>
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl font-bold text-theme-primary">"Dashboard"</h1>
                <p class="text-theme-secondary">{greeting}</p>
            </div>

            <div class="card">
                <div class="card-header">
                    <div>
                        <h2 class="title-lg">"Quick Actions"</h2>
                        <p class="subtitle">"Get started with email management"</p>
                    </div>
                </div>
                <div class="p-6 grid gap-4 grid-cols-1 sm:grid-cols-2 lg:grid-cols-4">
                    {QUICK_ACTIONS.iter().map(|action| view! {
                        <A
                            href=action.path
                            attr:class="p-4 flex items-center gap-3 rounded-lg border border-theme hover:border-accent-primary/50 hover:bg-accent-primary/5 transition-colors"
                        >
                            <div class="p-2 bg-accent-primary/10 rounded-lg shrink-0">
                                <Icon name=action.icon class="h-6 w-6"/>
                            </div>
                            <div class="text-left min-w-0 flex-1">
                                <div class="font-medium text-theme-primary truncate">{action.title}</div>
                                <div class="text-sm text-theme-secondary truncate">{action.description}</div>
                            </div>
                        </A>
                    }).collect_view()}
                </div>
            </div>
        </div>
    }
}
