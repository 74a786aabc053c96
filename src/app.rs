use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{ParentRoute, Route, Router, Routes};
use leptos_router::path;

use crate::ui::auth::provide_auth_context;
use crate::ui::layout::DashboardLayout;
use crate::ui::notifications::{NotificationsContainer, provide_notifications};
use crate::ui::pages::obwb::{
    AccessResultPage, AiDigestPage, ConnectEmailPage, ConversationDetailPage, ConversationsPage,
    EmailDetailPage, EmailsPage, FollowUpsPage,
};
use crate::ui::pages::optical::{
    BranchPerformancePage, CustomerMetricsPage, InventoryPage, StaffPerformancePage,
};
use crate::ui::pages::{DashboardPage, LandingPage, NotFoundPage};
use crate::ui::theme::provide_theme_context;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    provide_theme_context();
    provide_auth_context();
    provide_notifications();

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/finitx-dashboard.css"/>
        <Title text="FinitX Dashboard"/>

        <Router>
            <main class="min-h-screen bg-theme-primary theme-transition">
                <Routes fallback=|| view! { <NotFoundPage/> }>
                    <Route path=path!("/") view=LandingPage/>
                    <ParentRoute path=path!("/dashboard") view=DashboardLayout>
                        <Route path=path!("") view=DashboardPage/>

                        <Route path=path!("Obwb/emails") view=EmailsPage/>
                        <Route path=path!("Obwb/emails/:id") view=EmailDetailPage/>
                        <Route path=path!("Obwb/conversations") view=ConversationsPage/>
                        <Route path=path!("Obwb/conversations/:id") view=ConversationDetailPage/>
                        <Route path=path!("Obwb/ai-digest") view=AiDigestPage/>
                        <Route path=path!("Obwb/follow-ups") view=FollowUpsPage/>
                        <Route path=path!("Obwb/connect-email") view=ConnectEmailPage/>
                        <Route path=path!("Obwb/access_result") view=AccessResultPage/>

                        <Route path=path!("Optical/branch-performance") view=BranchPerformancePage/>
                        <Route path=path!("Optical/customer-metrics") view=CustomerMetricsPage/>
                        <Route path=path!("Optical/staff-performance") view=StaffPerformancePage/>
                        <Route path=path!("Optical/inventory") view=InventoryPage/>
                    </ParentRoute>
                </Routes>
            </main>
            <NotificationsContainer/>
        </Router>
    }
}
