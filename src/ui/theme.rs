//! Theme context: light, dark or system preference
//!
//! The choice is persisted under `theme-storage` and applied as a `dark`
//! class on the document element.

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

pub const THEME_STORAGE_KEY: &str = "theme-storage";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeMode::System => "System",
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ThemeMode::System => crate::ui::icons::MONITOR,
            ThemeMode::Light => crate::ui::icons::SUN,
            ThemeMode::Dark => crate::ui::icons::MOON,
        }
    }

    /// Light and dark swap; system resolves to the opposite of what is shown.
    pub fn toggled(&self, showing_dark: bool) -> Self {
        if showing_dark {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        }
    }

    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::System => system_prefers_dark,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeState {
    theme: ThemeMode,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedTheme {
    state: ThemeState,
    #[serde(default)]
    version: u32,
}

/// Stored entry for `mode`.
pub fn encode_theme(mode: ThemeMode) -> String {
    serde_json::to_string(&PersistedTheme {
        state: ThemeState { theme: mode },
        version: 0,
    })
    .unwrap_or_default()
}

/// Theme from a stored entry; anything unreadable means `System`.
pub fn decode_theme(raw: &str) -> ThemeMode {
    serde_json::from_str::<PersistedTheme>(raw)
        .map(|p| p.state.theme)
        .unwrap_or_default()
}

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub mode: RwSignal<ThemeMode>,
    /// Effective theme, with `System` resolved
    pub is_dark: Memo<bool>,
    pub system_prefers_dark: RwSignal<bool>,
}

impl ThemeContext {
    pub fn set_mode(&self, mode: ThemeMode) {
        self.mode.set(mode);
        persist_theme(mode);
    }

    pub fn toggle(&self) {
        let next = self.mode.get_untracked().toggled(self.is_dark.get_untracked());
        self.set_mode(next);
    }

    pub fn apply_theme_class(&self) {
        #[cfg(feature = "hydrate")]
        {
            let Some(root) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element())
            else {
                return;
            };
            let classes = root.class_list();
            let _ = classes.remove_2("light", "dark");
            let _ = classes.add_1(if self.is_dark.get_untracked() { "dark" } else { "light" });
        }
    }
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn persist_theme(mode: ThemeMode) {
    #[cfg(feature = "hydrate")]
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(THEME_STORAGE_KEY, &encode_theme(mode));
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = mode;
}

#[cfg(feature = "hydrate")]
fn load_persisted_theme() -> ThemeMode {
    local_storage()
        .and_then(|storage| storage.get_item(THEME_STORAGE_KEY).ok().flatten())
        .map(|raw| decode_theme(&raw))
        .unwrap_or_default()
}

#[cfg(feature = "hydrate")]
fn dark_scheme_query() -> Option<web_sys::MediaQueryList> {
    web_sys::window()?
        .match_media("(prefers-color-scheme: dark)")
        .ok()?
}

pub fn provide_theme_context() -> ThemeContext {
    let mode = RwSignal::new(ThemeMode::System);
    let system_prefers_dark = RwSignal::new(false);
    let is_dark = Memo::new(move |_| mode.get().is_dark(system_prefers_dark.get()));

    let ctx = ThemeContext {
        mode,
        is_dark,
        system_prefers_dark,
    };

    // Storage and media queries are only read after hydration so the first
    // client render matches the server.
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        Effect::new(move |_| {
            mode.set(load_persisted_theme());

            if let Some(query) = dark_scheme_query() {
                system_prefers_dark.set(query.matches());
                let handler = Closure::<dyn Fn(web_sys::MediaQueryListEvent)>::new(
                    move |e: web_sys::MediaQueryListEvent| system_prefers_dark.set(e.matches()),
                );
                let _ = query
                    .add_event_listener_with_callback("change", handler.as_ref().unchecked_ref());
                handler.forget();
            }
        });

        Effect::new(move |_| {
            let _ = ctx.is_dark.get();
            ctx.apply_theme_class();
        });
    }
    provide_context(ctx);
    ctx
}

pub fn use_theme_context() -> ThemeContext {
    expect_context::<ThemeContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_layout() {
        assert_eq!(encode_theme(ThemeMode::Dark), r#"{"state":{"theme":"dark"},"version":0}"#);
        assert_eq!(decode_theme(r#"{"state":{"theme":"light"},"version":0}"#), ThemeMode::Light);
        assert_eq!(decode_theme("garbage"), ThemeMode::System);
    }

    #[test]
    fn test_effective_theme() {
        assert!(ThemeMode::System.is_dark(true));
        assert!(!ThemeMode::System.is_dark(false));
        assert!(ThemeMode::Dark.is_dark(false));
        assert_eq!(ThemeMode::System.toggled(true), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled(false), ThemeMode::Dark);
    }
}
