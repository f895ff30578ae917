//! Contract types shared between the desktop session core and application shells.
//!
//! Applications never own session state. Each managed window hands its app a
//! [`WindowContent`] descriptor and the app reports progress back through session actions.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier for an application component (for example `system.explorer`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` conforms to the `segment.segment...` policy.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected namespaced dotted segments"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for trusted built-in constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the last dotted segment, used as a fallback window title.
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }

    let mut count = 0usize;
    for part in raw.split('.') {
        count += 1;
        if part.is_empty() || part.len() > 32 {
            return false;
        }
        let bytes = part.as_bytes();
        if !bytes[0].is_ascii_lowercase() {
            return false;
        }
        if !bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        {
            return false;
        }
        if part.ends_with('-') {
            return false;
        }
    }

    count >= 2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Lifecycle notifications the session publishes for managed windows.
pub enum AppLifecycleEvent {
    /// Window was created and its content should mount.
    Opened,
    /// Window became the active window.
    Focused,
    /// Window was minimized.
    Minimized,
    /// Window entered the maximized state.
    Maximized,
    /// Window entered fullscreen.
    Fullscreen,
    /// Window returned to its normal state.
    Restored,
    /// Window was removed from the session.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Focused => "focused",
            Self::Minimized => "minimized",
            Self::Maximized => "maximized",
            Self::Fullscreen => "fullscreen",
            Self::Restored => "restored",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Content descriptor handed to the application rendered inside a window.
pub struct WindowContent {
    /// Component that renders the window body.
    pub application_id: ApplicationId,
    /// Resolved URL or virtual file path the app should display, when any.
    pub resolved_url: Option<String>,
    /// Whether the app is still waiting on background work before it can render.
    pub loading: bool,
    /// Free-form launch parameters.
    pub launch_params: Value,
}

impl WindowContent {
    /// Creates a ready descriptor with no target.
    pub fn new(application_id: ApplicationId) -> Self {
        Self {
            application_id,
            resolved_url: None,
            loading: false,
            launch_params: Value::Null,
        }
    }

    /// Creates a descriptor pointing at a virtual path whose data still has to load.
    pub fn for_path(application_id: ApplicationId, path: impl Into<String>) -> Self {
        Self {
            resolved_url: Some(path.into()),
            loading: true,
            ..Self::new(application_id)
        }
    }

    /// Marks the content as loaded with its final URL.
    pub fn mark_ready(&mut self, resolved_url: impl Into<String>) {
        self.resolved_url = Some(resolved_url.into());
        self.loading = false;
    }
}

/// Application ids for the built-in shells.
pub mod builtin {
    /// File browser.
    pub const EXPLORER: &str = "system.explorer";
    /// Image gallery.
    pub const GALLERY: &str = "system.gallery";
    /// Markdown/PDF document viewer.
    pub const DOCUMENT_VIEWER: &str = "system.viewer";
    /// Plain text editor.
    pub const NOTEPAD: &str = "system.notepad";
    /// Terminal emulator.
    pub const TERMINAL: &str = "system.terminal";
    /// Mail composer.
    pub const MAIL: &str = "system.mail";
    /// Browser tab simulator.
    pub const BROWSER: &str = "system.browser";
    /// Settings form.
    pub const SETTINGS: &str = "system.settings";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_id_requires_dotted_namespaces() {
        assert!(ApplicationId::new(builtin::EXPLORER).is_ok());
        assert!(ApplicationId::new("system.gallery-v2").is_ok());
        assert!(ApplicationId::new("gallery").is_err());
        assert!(ApplicationId::new("System.gallery").is_err());
        assert!(ApplicationId::new("system..gallery").is_err());
        assert!(ApplicationId::new("system.gallery-").is_err());
    }

    #[test]
    fn short_name_is_last_segment() {
        assert_eq!(ApplicationId::trusted("system.notepad").short_name(), "notepad");
    }

    #[test]
    fn content_for_path_starts_loading_until_marked_ready() {
        let mut content =
            WindowContent::for_path(ApplicationId::trusted(builtin::GALLERY), "/Pictures");
        assert!(content.loading);
        content.mark_ready("/Pictures/cat.png");
        assert!(!content.loading);
        assert_eq!(content.resolved_url.as_deref(), Some("/Pictures/cat.png"));
    }
}
