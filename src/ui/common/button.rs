use crate::ui::icon::{Icon, icons};
use leptos::prelude::*;

/// Button variant types
#[derive(Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    Primary,
    Secondary,
    Danger,
    Ghost,
}

/// Button size options
#[derive(Clone, Copy, PartialEq)]
pub enum ButtonSize {
    Small,
    Medium,
    Large,
}

impl ButtonVariant {
    fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn-primary",
            ButtonVariant::Secondary => "btn-secondary",
            ButtonVariant::Danger => "btn-danger",
            ButtonVariant::Ghost => "btn-ghost",
        }
    }
}

impl ButtonSize {
    fn class(&self) -> &'static str {
        match self {
            ButtonSize::Small => "btn-sm",
            ButtonSize::Medium => "",
            ButtonSize::Large => "btn-lg",
        }
    }
}

/// Button with variants, an optional icon and a loading state
#[component]
pub fn Button(
    /// Button variant style
    #[prop(default = ButtonVariant::Primary)]
    variant: ButtonVariant,
    /// Button size
    #[prop(default = ButtonSize::Medium)]
    size: ButtonSize,
    /// Click handler
    #[prop(into)]
    on_click: Callback<()>,
    /// Whether button is disabled
    #[prop(optional, into)]
    disabled: Signal<bool>,
    /// Shows a spinner and blocks clicks while true
    #[prop(optional, into)]
    loading: Signal<bool>,
    /// Optional title/tooltip
    #[prop(optional, into)]
    title: Option<String>,
    /// Button content (text or elements)
    children: Children,
    /// Optional icon name to show before text
    #[prop(optional)]
    icon: Option<&'static str>,
    /// Additional CSS classes
    #[prop(default = "")]
    class: &'static str,
) -> impl IntoView {
    let full_classes = format!("btn-base {} {} {}", variant.class(), size.class(), class);

    view! {
        <button
            type="button"
            class=full_classes
            on:click=move |_| {
                if !loading.get_untracked() {
                    on_click.run(())
                }
            }
            disabled=move || disabled.get() || loading.get()
            title=title
        >
            {move || if loading.get() {
                view! { <Icon name=icons::LOADER class="icon-btn animate-spin"/> }.into_any()
            } else if let Some(icon_name) = icon {
                view! { <Icon name=icon_name class="icon-btn"/> }.into_any()
            } else {
                ().into_any()
            }}
            {children()}
        </button>
    }
}
