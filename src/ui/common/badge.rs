use crate::ui::icon::Icon;
use leptos::prelude::*;

/// Badge variant types for different use cases
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum BadgeVariant {
    /// Default neutral badge
    Default,
    /// Primary color badge
    Primary,
    /// Success/positive badge (green)
    Success,
    /// Warning badge (yellow/orange)
    Warning,
    /// Danger/error badge (red)
    Danger,
    /// Info badge (blue)
    Info,
}

impl BadgeVariant {
    fn class(&self) -> &'static str {
        match self {
            BadgeVariant::Default => "badge-default",
            BadgeVariant::Primary => "badge-primary",
            BadgeVariant::Success => "badge-success",
            BadgeVariant::Warning => "badge-warning",
            BadgeVariant::Danger => "badge-danger",
            BadgeVariant::Info => "badge-info",
        }
    }

    /// Colour for an email importance level (`high`, `normal`, `low`).
    pub fn for_importance(importance: &str) -> Self {
        match importance.to_ascii_lowercase().as_str() {
            "high" => BadgeVariant::Danger,
            "low" => BadgeVariant::Default,
            _ => BadgeVariant::Info,
        }
    }

    /// Colour for a follow-up priority or sentiment label.
    pub fn for_level(level: &str) -> Self {
        match level.to_ascii_lowercase().as_str() {
            "high" | "urgent" | "negative" => BadgeVariant::Danger,
            "medium" | "neutral" => BadgeVariant::Warning,
            "low" | "positive" => BadgeVariant::Success,
            _ => BadgeVariant::Default,
        }
    }
}

/// Badge component for labels and status indicators
#[component]
pub fn Badge(
    /// Badge content (text or number)
    children: Children,
    /// Visual variant
    #[prop(default = BadgeVariant::Default)]
    variant: BadgeVariant,
    /// Optional icon to show before text
    #[prop(optional)]
    icon: Option<&'static str>,
    /// Optional title/tooltip
    #[prop(optional, into)]
    title: Option<String>,
) -> impl IntoView {
    view! {
        <span class=format!("badge badge-md badge-rounded {}", variant.class()) title=title>
            {icon.map(|name| view! { <Icon name=name class="w-3 h-3 mr-1"/> })}
            <span class="badge-content">{children()}</span>
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_mapping() {
        assert_eq!(BadgeVariant::for_importance("High"), BadgeVariant::Danger);
        assert_eq!(BadgeVariant::for_importance("normal"), BadgeVariant::Info);
        assert_eq!(BadgeVariant::for_level("medium"), BadgeVariant::Warning);
        assert_eq!(BadgeVariant::for_level("positive"), BadgeVariant::Success);
        assert_eq!(BadgeVariant::for_level("other"), BadgeVariant::Default);
    }
}
