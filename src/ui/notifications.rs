//! Toast notifications
//!
//! Pages report mutation outcomes ("Response deleted successfully",
//! "Failed to sync emails") through the [`NotificationManager`] in context.

use leptos::prelude::*;
use std::collections::VecDeque;

/// Maximum number of notifications to show at once
const MAX_NOTIFICATIONS: usize = 5;

/// Default lifetime of a toast
pub const AUTO_DISMISS_MS: u32 = 4_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub message: String,
    pub auto_dismiss_ms: Option<u32>,
}

impl Notification {
    fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
            auto_dismiss_ms: Some(AUTO_DISMISS_MS),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Info, message)
    }

    /// Keep the toast until it is closed by hand.
    pub fn sticky(mut self) -> Self {
        self.auto_dismiss_ms = None;
        self
    }
}

/// Notification item with unique ID for tracking
#[derive(Clone, Debug)]
pub struct NotificationItem {
    pub id: u64,
    pub notification: Notification,
}

/// Notifications container component, mounted once by the app shell
#[component]
pub fn NotificationsContainer() -> impl IntoView {
    let notifications = use_notifications().notifications();

    view! {
        <div class="fixed bottom-4 right-4 z-50 flex flex-col gap-2 max-w-sm">
            <For
                each=move || notifications.get()
                key=|item| item.id
                children=move |item| {
                    view! { <NotificationToast notification=item.notification id=item.id /> }
                }
            />
        </div>
    }
}

#[component]
fn NotificationToast(notification: Notification, id: u64) -> impl IntoView {
    let manager = use_notifications();
    let (is_exiting, _set_is_exiting) = signal(false);

    if let Some(_ms) = notification.auto_dismiss_ms {
        #[cfg(feature = "hydrate")]
        {
            use gloo_timers::future::TimeoutFuture;
            use leptos::task::spawn_local;

            spawn_local(async move {
                TimeoutFuture::new(_ms).await;
                _set_is_exiting.set(true);
                // Wait for exit animation
                TimeoutFuture::new(300).await;
                manager.dismiss(id);
            });
        }
    }

    let (container_class, icon_class, icon_path) = match notification.notification_type {
        NotificationType::Success => (
            "bg-green-500/10 border-green-500/30",
            "text-green-500",
            "M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z",
        ),
        NotificationType::Error => (
            "bg-red-500/10 border-red-500/30",
            "text-red-500",
            "M12 8v4m0 4h.01M21 12a9 9 0 11-18 0 9 9 0 0118 0z",
        ),
        NotificationType::Warning => (
            "bg-yellow-500/10 border-yellow-500/30",
            "text-yellow-500",
            "M12 9v2m0 4h.01m-6.938 4h13.856c1.54 0 2.502-1.667 1.732-3L13.732 4c-.77-1.333-2.694-1.333-3.464 0L3.34 16c-.77 1.333.192 3 1.732 3z",
        ),
        NotificationType::Info => (
            "bg-blue-500/10 border-blue-500/30",
            "text-blue-500",
            "M13 16h-1v-4h-1m1-4h.01M21 12a9 9 0 11-18 0 9 9 0 0118 0z",
        ),
    };

    let container_class = format!(
        "flex items-start gap-3 p-4 rounded-lg border bg-theme-primary backdrop-blur-sm shadow-lg transition-all duration-300 {}",
        container_class
    );

    view! {
        <div
            class=container_class
            role="status"
            style=move || if is_exiting.get() { "opacity: 0; transform: translateX(1rem);" } else { "opacity: 1; transform: translateX(0);" }
        >
            <div class=icon_class>
                <svg class="w-5 h-5" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d=icon_path />
                </svg>
            </div>
            <p class="flex-1 min-w-0 text-sm text-theme-primary">{notification.message}</p>
            <button
                class="text-theme-muted hover:text-theme-primary transition-colors"
                aria-label="Dismiss"
                on:click=move |_| manager.dismiss(id)
            >
                <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12" />
                </svg>
            </button>
        </div>
    }
}

/// Handle to the toast queue
#[derive(Clone, Copy)]
pub struct NotificationManager {
    notifications: RwSignal<VecDeque<NotificationItem>>,
    next_id: StoredValue<u64>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: RwSignal::new(VecDeque::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn notifications(&self) -> RwSignal<VecDeque<NotificationItem>> {
        self.notifications
    }

    pub fn notify(&self, notification: Notification) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        self.notifications.update(|n| {
            n.push_back(NotificationItem { id, notification });

            // Remove oldest if we exceed max
            while n.len() > MAX_NOTIFICATIONS {
                n.pop_front();
            }
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notification::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notification::error(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Notification::warning(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Notification::info(message));
    }

    pub fn dismiss(&self, id: u64) {
        self.notifications.update(|n| n.retain(|i| i.id != id));
    }

    pub fn clear(&self) {
        self.notifications.set(VecDeque::new());
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_notifications() -> NotificationManager {
    let manager = NotificationManager::new();
    provide_context(manager);
    manager
}

pub fn use_notifications() -> NotificationManager {
    expect_context::<NotificationManager>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults() {
        let toast = Notification::success("Response deleted successfully");
        assert_eq!(toast.notification_type, NotificationType::Success);
        assert_eq!(toast.auto_dismiss_ms, Some(AUTO_DISMISS_MS));
        assert_eq!(Notification::error("x").sticky().auto_dismiss_ms, None);
    }

    #[test]
    fn test_queue_is_bounded() {
        let owner = Owner::new();
        owner.set();

        let manager = NotificationManager::new();
        for i in 0..(MAX_NOTIFICATIONS + 2) {
            manager.info(format!("toast {}", i));
        }
        let items = manager.notifications().get_untracked();
        assert_eq!(items.len(), MAX_NOTIFICATIONS);
        assert_eq!(items.front().map(|i| i.id), Some(2));

        manager.dismiss(2);
        assert_eq!(manager.notifications().get_untracked().len(), MAX_NOTIFICATIONS - 1);
    }
}
