use leptos::prelude::*;

/// Spinner size options
#[derive(Clone, Copy, PartialEq)]
pub enum SpinnerSize {
    Small,
    Medium,
    Large,
}

impl SpinnerSize {
    fn class(&self) -> &'static str {
        match self {
            SpinnerSize::Small => "spinner-sm",
            SpinnerSize::Medium => "spinner-md",
            SpinnerSize::Large => "spinner-lg",
        }
    }
}

/// Loading spinner component
#[component]
pub fn Spinner(
    /// Spinner size
    #[prop(default = SpinnerSize::Medium)]
    size: SpinnerSize,
    /// Optional label text
    #[prop(default = String::new(), into)]
    label: String,
    /// Whether to center the spinner
    #[prop(default = false)]
    centered: bool,
) -> impl IntoView {
    let container_class = if centered {
        "spinner-container spinner-centered"
    } else {
        "spinner-container"
    };

    view! {
        <div class=container_class>
            <div class=format!("spinner spinner-circle {}", size.class()) role="status" aria-live="polite">
                <div class="spinner-circle-inner"></div>
                <span class="sr-only">"Loading..."</span>
            </div>
            {(!label.is_empty()).then(|| view! {
                <div class="spinner-label">{label.clone()}</div>
            })}
        </div>
    }
}

/// Centered spinner for a page or panel that is still loading
#[component]
pub fn LoadingSpinner(
    /// Optional loading message
    #[prop(default = String::new(), into)]
    message: String,
) -> impl IntoView {
    view! {
        <div class="py-12">
            <Spinner size=SpinnerSize::Large label=message centered=true/>
        </div>
    }
}

/// Skeleton loader for content placeholders
#[component]
pub fn Skeleton(
    /// Width of the skeleton
    #[prop(default = "100%")]
    width: &'static str,
    /// Height of the skeleton
    #[prop(default = "1rem")]
    height: &'static str,
) -> impl IntoView {
    view! {
        <div class="skeleton skeleton-rect" style=format!("width: {}; height: {}", width, height) aria-busy="true">
            <div class="skeleton-shimmer"></div>
        </div>
    }
}

/// Stack of skeleton rows shown while a list loads
#[component]
pub fn SkeletonGroup(
    /// Number of skeleton lines
    #[prop(default = 3)]
    lines: usize,
    /// Height of each line
    #[prop(default = "1rem")]
    height: &'static str,
) -> impl IntoView {
    view! {
        <div class="skeleton-group flex flex-col gap-2">
            {(0..lines).map(|i| {
                let width = if i + 1 == lines { "70%" } else { "100%" };
                view! { <Skeleton width=width height=height/> }
            }).collect_view()}
        </div>
    }
}
