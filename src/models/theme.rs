use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_BG_LIGHT: &str = "#FFFFFF";
pub const DEFAULT_BG_DARK: &str = "#1E1E1E";
pub const DEFAULT_BG_HC_BLACK: &str = "#000000";

// Electron draws a visible seam around frameless dark windows on macOS with #1E1E1E
pub const MACOS_DARK_BG: &str = "#171717";

pub const DEFAULT_THEME: &str = "vs-dark";

pub const THEME_STORAGE_KEY: &str = "theme";
pub const THEME_BG_STORAGE_KEY: &str = "themeBackground";

/// Reasons a `changeColorTheme` payload is rejected
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Theme payload must be a string, got {0}")]
    NotAString(&'static str),

    #[error("Invalid theme payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Theme data broadcast by a window when its color theme changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeData {
    pub base_theme: String,
    pub background: String,
}

impl ThemeData {
    /// Decode the raw IPC argument, which carries the theme data as a JSON-encoded string
    pub fn from_payload(payload: &Value) -> Result<Self, PayloadError> {
        let encoded = match payload {
            Value::String(encoded) => encoded,
            Value::Null => return Err(PayloadError::NotAString("null")),
            Value::Bool(_) => return Err(PayloadError::NotAString("bool")),
            Value::Number(_) => return Err(PayloadError::NotAString("number")),
            Value::Array(_) => return Err(PayloadError::NotAString("array")),
            Value::Object(_) => return Err(PayloadError::NotAString("object")),
        };

        Ok(serde_json::from_str(encoded)?)
    }
}

/// Theme family a theme id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseTheme {
    Light,
    Dark,
    HighContrastBlack,
}

impl BaseTheme {
    /// Classify a stored theme id. Only the first space-separated token counts,
    /// and unknown tags fall back to dark.
    pub fn from_theme_id(theme_id: &str) -> Self {
        match theme_id.split(' ').next().unwrap_or_default() {
            "vs" => BaseTheme::Light,
            "hc-black" => BaseTheme::HighContrastBlack,
            _ => BaseTheme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseTheme::Light => "vs",
            BaseTheme::Dark => "vs-dark",
            BaseTheme::HighContrastBlack => "hc-black",
        }
    }

    pub fn default_background(&self) -> &'static str {
        match self {
            BaseTheme::Light => DEFAULT_BG_LIGHT,
            BaseTheme::Dark => DEFAULT_BG_DARK,
            BaseTheme::HighContrastBlack => DEFAULT_BG_HC_BLACK,
        }
    }
}

/// Snapshot of the two persisted theme keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedThemeState {
    pub theme: String,
    pub background: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_string_payload() {
        let payload = json!(r##"{"baseTheme":"vs","background":"#FFFFFF"}"##);
        let data = ThemeData::from_payload(&payload).unwrap();
        assert_eq!(data.base_theme, "vs");
        assert_eq!(data.background, "#FFFFFF");
    }

    #[test]
    fn test_rejects_non_string_payload() {
        let payload = json!({ "baseTheme": "vs", "background": "#FFFFFF" });
        let result = ThemeData::from_payload(&payload);
        assert!(matches!(result, Err(PayloadError::NotAString("object"))));
    }

    #[test]
    fn test_rejects_malformed_payload() {
        assert!(matches!(
            ThemeData::from_payload(&json!("not json")),
            Err(PayloadError::Malformed(_))
        ));
        // Missing background
        assert!(ThemeData::from_payload(&json!(r#"{"baseTheme":"vs"}"#)).is_err());
    }

    #[test]
    fn test_base_theme_uses_first_token() {
        assert_eq!(BaseTheme::from_theme_id("vs"), BaseTheme::Light);
        assert_eq!(BaseTheme::from_theme_id("vs vscode-theme-defaults"), BaseTheme::Light);
        assert_eq!(BaseTheme::from_theme_id("hc-black extra-suffix"), BaseTheme::HighContrastBlack);
        assert_eq!(BaseTheme::from_theme_id("vs-dark"), BaseTheme::Dark);
        assert_eq!(BaseTheme::from_theme_id("solarized"), BaseTheme::Dark);
        assert_eq!(BaseTheme::from_theme_id(""), BaseTheme::Dark);
    }

    #[test]
    fn test_default_backgrounds() {
        assert_eq!(BaseTheme::Light.default_background(), "#FFFFFF");
        assert_eq!(BaseTheme::Dark.default_background(), "#1E1E1E");
        assert_eq!(BaseTheme::HighContrastBlack.default_background(), "#000000");
        assert_eq!(BaseTheme::from_theme_id(BaseTheme::Dark.as_str()), BaseTheme::Dark);
    }
}
