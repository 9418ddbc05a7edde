//! Platform-provided project selection.

use async_trait::async_trait;
use std::sync::Arc;

/// A host environment that can inject an API key after the user picks a
/// cloud project.
#[async_trait]
pub trait ProjectSelector: Send + Sync {
    /// Whether a project (and with it a key) has been selected.
    async fn has_selected_key(&self) -> bool;

    /// Asks the user to pick a project. Returns once the dialog closes.
    async fn open_selection_dialog(&self);

    /// The key injected by the platform, once a project is selected.
    fn injected_key(&self) -> Option<String>;
}

/// Treats an environment variable as the platform-injected key.
///
/// There is no dialog to open outside a hosting platform, so
/// `open_selection_dialog` only logs which variables it looked at.
#[derive(Debug, Clone)]
pub struct EnvProjectSelector {
    vars: Vec<String>,
}

impl EnvProjectSelector {
    /// Reads `GOOGLE_API_KEY`, then `API_KEY`.
    pub fn new() -> Self {
        Self::with_vars(["GOOGLE_API_KEY", "API_KEY"])
    }

    /// Reads the given variables in order.
    pub fn with_vars<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether any of the variables is currently set.
    pub fn is_present(&self) -> bool {
        self.injected_key().is_some()
    }
}

impl Default for EnvProjectSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectSelector for EnvProjectSelector {
    async fn has_selected_key(&self) -> bool {
        self.is_present()
    }

    async fn open_selection_dialog(&self) {
        tracing::warn!(vars = ?self.vars, "no project selected; set one of these variables");
    }

    fn injected_key(&self) -> Option<String> {
        self.vars
            .iter()
            .filter_map(|v| std::env::var(v).ok())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
    }
}

/// Whether the host offers project selection. Chosen once at startup.
#[derive(Clone, Default)]
pub enum PlatformCapability {
    /// Project selection is available through this collaborator.
    ProjectPicker(Arc<dyn ProjectSelector>),
    /// No platform support; only a stored key can be used.
    #[default]
    Unavailable,
}

impl PlatformCapability {
    /// Uses environment-variable injection when one of the variables is set.
    pub fn from_env() -> Self {
        let selector = EnvProjectSelector::new();
        if selector.is_present() {
            Self::ProjectPicker(Arc::new(selector))
        } else {
            Self::Unavailable
        }
    }

    /// Whether project selection can be offered.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::ProjectPicker(_))
    }
}

impl std::fmt::Debug for PlatformCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectPicker(_) => write!(f, "ProjectPicker"),
            Self::Unavailable => write!(f, "Unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_env_selector_reads_first_set_var() {
        std::env::set_var("PROEDIT_TEST_KEY_B", "from-b");
        let selector = EnvProjectSelector::with_vars(["PROEDIT_TEST_KEY_A", "PROEDIT_TEST_KEY_B"]);
        assert!(selector.has_selected_key().await);
        assert_eq!(selector.injected_key().as_deref(), Some("from-b"));
        std::env::remove_var("PROEDIT_TEST_KEY_B");
    }

    #[tokio::test]
    async fn test_env_selector_without_vars() {
        let selector = EnvProjectSelector::with_vars(["PROEDIT_TEST_KEY_UNSET"]);
        selector.open_selection_dialog().await;
        assert!(!selector.has_selected_key().await);
        assert_eq!(selector.injected_key(), None);
    }

    #[test]
    fn test_capability_default_is_unavailable() {
        assert!(!PlatformCapability::default().is_available());
        let picker = PlatformCapability::ProjectPicker(Arc::new(EnvProjectSelector::new()));
        assert!(picker.is_available());
        assert_eq!(format!("{picker:?}"), "ProjectPicker");
    }
}
