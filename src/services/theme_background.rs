// ThemeBackgroundResolver Service
// Persists theme changes and resolves the background color for shell windows

use std::sync::{Arc, Weak};

use serde_json::Value;

use crate::models::{
    BaseTheme, PersistedThemeState, Platform, ThemeData, DEFAULT_BG_DARK, DEFAULT_THEME,
    MACOS_DARK_BG, THEME_BG_STORAGE_KEY, THEME_STORAGE_KEY,
};
use crate::services::{
    IpcListener, NativeTheme, StateStore, WindowHost, WindowId, CHANGE_COLOR_THEME_CHANNEL,
};

/// Answers "which background should a window be painted with right now"
pub trait BackgroundColorProvider: Send + Sync {
    fn get_background_color(&self) -> String;
}

pub struct ThemeBackgroundResolver {
    state: Arc<dyn StateStore>,
    windows: Arc<dyn WindowHost>,
    native_theme: Arc<dyn NativeTheme>,
    platform: Platform,
}

impl ThemeBackgroundResolver {
    pub fn new(
        state: Arc<dyn StateStore>,
        windows: Arc<dyn WindowHost>,
        native_theme: Arc<dyn NativeTheme>,
        platform: Platform,
    ) -> Self {
        Self {
            state,
            windows,
            native_theme,
            platform,
        }
    }

    /// Create a resolver and subscribe it to theme change notifications.
    ///
    /// The subscription holds a weak reference; once the returned `Arc` is
    /// dropped, further notifications are ignored.
    pub fn attach(
        state: Arc<dyn StateStore>,
        windows: Arc<dyn WindowHost>,
        native_theme: Arc<dyn NativeTheme>,
        platform: Platform,
        ipc: &dyn IpcListener,
    ) -> Arc<Self> {
        let resolver = Arc::new(Self::new(state, windows, native_theme, platform));
        resolver.subscribe(ipc);
        resolver
    }

    pub fn subscribe(self: &Arc<Self>, ipc: &dyn IpcListener) {
        let resolver: Weak<Self> = Arc::downgrade(self);
        ipc.on(
            CHANGE_COLOR_THEME_CHANNEL,
            Box::new(move |window_id, payload| {
                if let Some(resolver) = resolver.upgrade() {
                    resolver.on_theme_changed(window_id, payload);
                }
            }),
        );
    }

    /// Handle a `changeColorTheme` notification from `window_id`.
    /// Payloads that are not a JSON-encoded string of theme data are ignored.
    pub fn on_theme_changed(&self, window_id: WindowId, payload: &Value) {
        let data = match ThemeData::from_payload(payload) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Ignoring theme change from window {window_id}: {e}");
                return;
            }
        };

        self.store_background_color(&data);
        self.update_background_color(window_id, &data);
    }

    // Two independent writes; a crash in between leaves them out of step
    fn store_background_color(&self, data: &ThemeData) {
        self.state.set_item(THEME_STORAGE_KEY, &data.base_theme);
        self.state.set_item(THEME_BG_STORAGE_KEY, &data.background);
        log::info!(
            "Stored theme '{}' with background {}",
            data.base_theme,
            data.background
        );
    }

    fn update_background_color(&self, window_id: WindowId, data: &ThemeData) {
        let target = self
            .windows
            .open_windows()
            .into_iter()
            .find(|window| window.id() == window_id);

        match target {
            Some(window) => window.set_background_color(&data.background),
            None => log::debug!("Window {window_id} is not open; skipping background update"),
        }
    }

    fn uses_inverted_colors(&self) -> bool {
        self.platform.honors_inverted_colors() && self.native_theme.should_use_inverted_color_scheme()
    }

    /// Resolve the background for a new or existing window.
    ///
    /// Order: OS high-contrast override, stored background (verbatim), default for the
    /// stored theme family, then the macOS dark shade correction.
    pub fn get_background_color(&self) -> String {
        if self.uses_inverted_colors() {
            return BaseTheme::HighContrastBlack.default_background().to_string();
        }

        // Stored colors are not validated; whatever the window reported is handed back
        let background = match self.state.get_item(THEME_BG_STORAGE_KEY) {
            Some(background) if !background.is_empty() => background,
            _ => {
                let theme = self.state.get_item_or(THEME_STORAGE_KEY, DEFAULT_THEME);
                BaseTheme::from_theme_id(&theme)
                    .default_background()
                    .to_string()
            }
        };

        if self.platform.needs_dark_background_correction()
            && background.eq_ignore_ascii_case(DEFAULT_BG_DARK)
        {
            return MACOS_DARK_BG.to_string();
        }

        background
    }

    pub fn persisted_state(&self) -> PersistedThemeState {
        PersistedThemeState {
            theme: self.state.get_item_or(THEME_STORAGE_KEY, DEFAULT_THEME),
            background: self
                .state
                .get_item(THEME_BG_STORAGE_KEY)
                .filter(|background| !background.is_empty()),
        }
    }
}

impl BackgroundColorProvider for ThemeBackgroundResolver {
    fn get_background_color(&self) -> String {
        ThemeBackgroundResolver::get_background_color(self)
    }
}
