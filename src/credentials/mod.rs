//! API key resolution: a locally stored key first, then the platform.

mod platform;
mod store;

pub use platform::{EnvProjectSelector, PlatformCapability, ProjectSelector};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, API_KEY_STORAGE_KEY};

use crate::error::{ProEditError, Result};
use crate::locale::Locale;
use std::sync::Arc;

/// Resolves the API key used for a generation request.
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
    platform: PlatformCapability,
    locale: Locale,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("platform", &self.platform)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl CredentialResolver {
    /// Creates a resolver over a store and a platform capability.
    pub fn new(store: Arc<dyn CredentialStore>, platform: PlatformCapability) -> Self {
        Self {
            store,
            platform,
            locale: Locale::default(),
        }
    }

    /// Sets the locale used for user-facing error messages.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// The platform capability chosen at startup.
    pub fn platform(&self) -> &PlatformCapability {
        &self.platform
    }

    /// Whether a key is stored locally.
    pub fn has_stored_key(&self) -> Result<bool> {
        Ok(self.store.get()?.is_some())
    }

    /// Whether a request could possibly be authorized without asking.
    ///
    /// Used to decide whether to prompt for a key before generating.
    pub fn can_attempt(&self) -> Result<bool> {
        Ok(self.has_stored_key()? || self.platform.is_available())
    }

    /// Resolves the key: stored key, else the platform-selected project.
    ///
    /// When the platform reports no selection, its dialog is opened once
    /// and the selection is checked again.
    pub async fn resolve(&self) -> Result<String> {
        if let Some(key) = self.store.get()? {
            tracing::debug!("using stored API key");
            return Ok(key);
        }

        let strings = self.locale.strings();
        let PlatformCapability::ProjectPicker(selector) = &self.platform else {
            return Err(ProEditError::MissingCredential(strings.key_missing.into()));
        };

        if !selector.has_selected_key().await {
            selector.open_selection_dialog().await;
            if !selector.has_selected_key().await {
                return Err(ProEditError::MissingCredential(
                    strings.project_required.into(),
                ));
            }
        }

        tracing::debug!("using platform-selected project key");
        selector
            .injected_key()
            .ok_or_else(|| ProEditError::MissingCredential(strings.key_missing.into()))
    }

    /// Opens the platform's project picker and reports whether a project
    /// ended up selected.
    pub async fn select_project(&self) -> Result<bool> {
        match &self.platform {
            PlatformCapability::ProjectPicker(selector) => {
                selector.open_selection_dialog().await;
                Ok(selector.has_selected_key().await)
            }
            PlatformCapability::Unavailable => Err(ProEditError::EnvironmentUnsupported(
                self.locale.strings().platform_unavailable.into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Platform double: selection flips to true when the dialog opens,
    /// if `select_on_open` is set.
    #[derive(Default)]
    struct FakeSelector {
        selected: AtomicBool,
        select_on_open: bool,
        dialogs_opened: AtomicUsize,
        key: Option<String>,
    }

    #[async_trait]
    impl ProjectSelector for FakeSelector {
        async fn has_selected_key(&self) -> bool {
            self.selected.load(Ordering::SeqCst)
        }

        async fn open_selection_dialog(&self) {
            self.dialogs_opened.fetch_add(1, Ordering::SeqCst);
            if self.select_on_open {
                self.selected.store(true, Ordering::SeqCst);
            }
        }

        fn injected_key(&self) -> Option<String> {
            if self.selected.load(Ordering::SeqCst) {
                self.key.clone()
            } else {
                None
            }
        }
    }

    fn picker(selector: &Arc<FakeSelector>) -> PlatformCapability {
        PlatformCapability::ProjectPicker(selector.clone())
    }

    #[tokio::test]
    async fn test_stored_key_wins() {
        let selector = Arc::new(FakeSelector {
            selected: AtomicBool::new(true),
            key: Some("platform".into()),
            ..Default::default()
        });
        let resolver = CredentialResolver::new(
            Arc::new(MemoryCredentialStore::with_key("stored")),
            picker(&selector),
        );
        assert_eq!(resolver.resolve().await.unwrap(), "stored");
        assert_eq!(selector.dialogs_opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_platform_key_when_no_stored_key() {
        let selector = Arc::new(FakeSelector {
            selected: AtomicBool::new(true),
            key: Some("platform".into()),
            ..Default::default()
        });
        let resolver =
            CredentialResolver::new(Arc::new(MemoryCredentialStore::new()), picker(&selector));
        assert_eq!(resolver.resolve().await.unwrap(), "platform");
        assert_eq!(selector.dialogs_opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dialog_opened_once_then_selected() {
        let selector = Arc::new(FakeSelector {
            select_on_open: true,
            key: Some("picked".into()),
            ..Default::default()
        });
        let resolver =
            CredentialResolver::new(Arc::new(MemoryCredentialStore::new()), picker(&selector));
        assert_eq!(resolver.resolve().await.unwrap(), "picked");
        assert_eq!(selector.dialogs_opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dialog_dismissed_is_missing_credential() {
        let selector = Arc::new(FakeSelector::default());
        let resolver = CredentialResolver::new(Arc::new(MemoryCredentialStore::new()), picker(&selector))
            .with_locale(Locale::En);
        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, ProEditError::MissingCredential(_)));
        assert_eq!(err.to_string(), Locale::En.strings().project_required);
        assert_eq!(selector.dialogs_opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_sources_is_missing_credential() {
        let resolver = CredentialResolver::new(
            Arc::new(MemoryCredentialStore::new()),
            PlatformCapability::Unavailable,
        )
        .with_locale(Locale::En);
        assert!(!resolver.can_attempt().unwrap());
        let err = resolver.resolve().await.unwrap_err();
        assert_eq!(err.to_string(), Locale::En.strings().key_missing);
    }

    #[tokio::test]
    async fn test_select_project_requires_platform() {
        let resolver = CredentialResolver::new(
            Arc::new(MemoryCredentialStore::new()),
            PlatformCapability::Unavailable,
        );
        assert!(matches!(
            resolver.select_project().await,
            Err(ProEditError::EnvironmentUnsupported(_))
        ));

        let selector = Arc::new(FakeSelector {
            select_on_open: true,
            ..Default::default()
        });
        let resolver =
            CredentialResolver::new(Arc::new(MemoryCredentialStore::new()), picker(&selector));
        assert!(resolver.select_project().await.unwrap());
        assert!(resolver.can_attempt().unwrap());
    }
}
