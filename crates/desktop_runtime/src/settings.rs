//! Session settings and the partial patches merged into them.
//!
//! Settings are the only structured configuration surface of a session. Every nested structure
//! has its own patch type and `merge` helper, so applying a patch is total and never depends on
//! which fields the caller happened to send.

use leptos::logging;
use platform_host::{read_pref, write_pref, PrefsError, PrefsStore};
use serde::{Deserialize, Serialize};

/// Preference key holding the session settings document.
pub const SESSION_SETTINGS_KEY: &str = "session.settings.v1";
pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_ACCENT_COLOR: &str = "#0078d4";
pub const MIN_FONT_SCALE: f64 = 0.5;
pub const MAX_FONT_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundKind {
    #[default]
    Gradient,
    Solid,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub enabled: bool,
    pub sound: bool,
    pub show_previews: bool,
    pub do_not_disturb: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            show_previews: true,
            do_not_disturb: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSettings {
    pub kind: BackgroundKind,
    /// CSS color, gradient, or image URL depending on `kind`.
    pub value: String,
    pub blur: bool,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Gradient,
            value: "linear-gradient(135deg, #1e3c72 0%, #2a5298 100%)".to_string(),
            blur: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSettings {
    pub accent_color: String,
    pub font_scale: f64,
    pub transparency: bool,
    pub background: BackgroundSettings,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            font_scale: 1.0,
            transparency: true,
            background: BackgroundSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub theme: ThemeMode,
    pub locale: String,
    pub notifications: NotificationPreferences,
    pub style: StyleSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            locale: DEFAULT_LOCALE.to_string(),
            notifications: NotificationPreferences::default(),
            style: StyleSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferencesPatch {
    pub enabled: Option<bool>,
    pub sound: Option<bool>,
    pub show_previews: Option<bool>,
    pub do_not_disturb: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettingsPatch {
    pub kind: Option<BackgroundKind>,
    pub value: Option<String>,
    pub blur: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettingsPatch {
    pub accent_color: Option<String>,
    pub font_scale: Option<f64>,
    pub transparency: Option<bool>,
    pub background: Option<BackgroundSettingsPatch>,
}

/// Partial settings document; absent fields keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub theme: Option<ThemeMode>,
    pub locale: Option<String>,
    pub notifications: Option<NotificationPreferencesPatch>,
    pub style: Option<StyleSettingsPatch>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl NotificationPreferences {
    pub fn merge(&mut self, patch: NotificationPreferencesPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(sound) = patch.sound {
            self.sound = sound;
        }
        if let Some(show_previews) = patch.show_previews {
            self.show_previews = show_previews;
        }
        if let Some(do_not_disturb) = patch.do_not_disturb {
            self.do_not_disturb = do_not_disturb;
        }
    }
}

impl BackgroundSettings {
    pub fn merge(&mut self, patch: BackgroundSettingsPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(blur) = patch.blur {
            self.blur = blur;
        }
    }
}

impl StyleSettings {
    pub fn merge(&mut self, patch: StyleSettingsPatch) {
        if let Some(accent_color) = patch.accent_color.filter(|c| !c.trim().is_empty()) {
            self.accent_color = accent_color;
        }
        if let Some(font_scale) = patch.font_scale.filter(|scale| scale.is_finite()) {
            self.font_scale = font_scale.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE);
        }
        if let Some(transparency) = patch.transparency {
            self.transparency = transparency;
        }
        if let Some(background) = patch.background {
            self.background.merge(background);
        }
    }
}

impl SessionSettings {
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(locale) = patch.locale.filter(|l| !l.trim().is_empty()) {
            self.locale = locale;
        }
        if let Some(notifications) = patch.notifications {
            self.notifications.merge(notifications);
        }
        if let Some(style) = patch.style {
            self.style.merge(style);
        }
    }

    /// Defaults with `patch` applied on top.
    pub fn from_patch(patch: SettingsPatch) -> Self {
        let mut settings = Self::default();
        settings.merge(patch);
        settings
    }
}

/// Reads the stored settings patch, if any. Unreadable entries are logged and treated as absent.
pub async fn load_settings_patch(store: &dyn PrefsStore) -> Option<SettingsPatch> {
    match read_pref::<SettingsPatch, _>(store, SESSION_SETTINGS_KEY).await {
        Ok(patch) => patch,
        Err(err) => {
            logging::warn!("session settings load failed, using defaults: {err}");
            None
        }
    }
}

/// Loads the stored settings patch and merges it against the defaults.
pub async fn load_session_settings(store: &dyn PrefsStore) -> SessionSettings {
    load_settings_patch(store)
        .await
        .map(SessionSettings::from_patch)
        .unwrap_or_default()
}

/// Writes the full settings document back to `store`.
///
/// # Errors
///
/// Returns the store's error when serialization or the write fails.
pub async fn save_session_settings(
    store: &dyn PrefsStore,
    settings: &SessionSettings,
) -> Result<(), PrefsError> {
    write_pref(store, SESSION_SETTINGS_KEY, settings).await
}
