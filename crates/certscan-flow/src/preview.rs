// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview image loading.
//
// Each scanned page gets its own loader that turns the page's preview
// locator into something an image element can display. How that happens
// depends on whether the SDK encrypts its files, which is fixed when the SDK
// is initialised:
//
// - plain files: the locator is used as-is (`DirectReference`)
// - encrypted files: the SDK decrypts the bytes and they are embedded as a
//   `data:` URI (`DecryptAndEmbed`)
//
// Resolutions are tagged with a generation. Switching the loader to another
// page, or cancelling it, bumps the generation so a late result for the old
// page is thrown away instead of being shown.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use certscan_bridge::ScannerSdk;
use certscan_core::error::{CertscanError, Result};
use certscan_core::human_errors::{Severity, humanize_error};
use certscan_core::types::{ImageFileFormat, Page, PageHandle, PageKey, SdkInitOptions};
use tracing::{debug, instrument, warn};

/// Build a self-contained `data:` URI from base64 image bytes.
pub fn embed_data_uri(format: ImageFileFormat, base64_payload: &str) -> String {
    format!("data:{};base64,{}", format.mime_type(), base64_payload)
}

fn preview_uri(page: &Page) -> Result<&str> {
    match page.document_preview_image_file_uri.as_deref() {
        Some(uri) if !uri.is_empty() => Ok(uri),
        _ => Err(CertscanError::MissingPreviewUri {
            page_id: page.page_id.clone(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Turns a page into a displayable image reference.
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, page: &Page) -> Result<String>;
}

/// The preview locator is directly loadable.
pub struct DirectReference;

#[async_trait]
impl ResolveStrategy for DirectReference {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn resolve(&self, page: &Page) -> Result<String> {
        preview_uri(page).map(str::to_owned)
    }
}

/// The preview file is encrypted; ask the SDK for the plaintext and embed it.
pub struct DecryptAndEmbed {
    sdk: Arc<dyn ScannerSdk>,
    format: ImageFileFormat,
}

impl DecryptAndEmbed {
    pub fn new(sdk: Arc<dyn ScannerSdk>, format: ImageFileFormat) -> Self {
        Self { sdk, format }
    }
}

#[async_trait]
impl ResolveStrategy for DecryptAndEmbed {
    fn name(&self) -> &'static str {
        "decrypt-and-embed"
    }

    #[instrument(skip_all, fields(page_id = %page.page_id))]
    async fn resolve(&self, page: &Page) -> Result<String> {
        let uri = preview_uri(page)?;
        let image = self.sdk.get_image_data(uri).await?;
        Ok(embed_data_uri(self.format, &image.base64_image_data))
    }
}

/// Pick the strategy matching how the SDK was initialised.
pub fn strategy_for(options: &SdkInitOptions, sdk: Arc<dyn ScannerSdk>) -> Arc<dyn ResolveStrategy> {
    if options.encryption_enabled() {
        Arc::new(DecryptAndEmbed::new(sdk, options.storage_image_format))
    } else {
        Arc::new(DirectReference)
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Why a preview could not be shown, in words for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
    /// Technical detail for logs and tooltips.
    pub detail: String,
}

impl From<&CertscanError> for LoadFailure {
    fn from(err: &CertscanError) -> Self {
        let human = humanize_error(err);
        Self {
            message: human.message,
            suggestion: human.suggestion,
            severity: human.severity,
            detail: err.to_string(),
        }
    }
}

/// State of one preview.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No page yet.
    #[default]
    Idle,
    Resolving,
    Resolved(String),
    Failed(LoadFailure),
}

/// Result of a `load` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This call's resolution became the current state.
    Applied(LoadState),
    /// The page was already loading or loaded; nothing was started.
    Unchanged(LoadState),
    /// The loader moved on (new page or cancelled) while this call was in
    /// flight; its result was discarded.
    Superseded,
}

struct LoaderInner {
    generation: u64,
    current: Option<PageKey>,
    state: LoadState,
}

/// Per-page preview state machine. Clones share state, so a clone can be
/// moved into a spawned task while the view keeps another.
#[derive(Clone)]
pub struct PreviewImageLoader {
    strategy: Arc<dyn ResolveStrategy>,
    inner: Arc<Mutex<LoaderInner>>,
}

impl PreviewImageLoader {
    pub fn new(strategy: Arc<dyn ResolveStrategy>) -> Self {
        Self {
            strategy,
            inner: Arc::new(Mutex::new(LoaderInner {
                generation: 0,
                current: None,
                state: LoadState::Idle,
            })),
        }
    }

    pub fn state(&self) -> LoadState {
        self.inner.lock().expect("loader lock poisoned").state.clone()
    }

    /// Resolve `page`. Loading the page instance that is already loading or
    /// loaded is a no-op; any other instance, even one with equal content,
    /// clears the old reference first.
    pub async fn load(&self, page: &PageHandle) -> LoadOutcome {
        let key = page.key();
        let generation = {
            let mut inner = self.inner.lock().expect("loader lock poisoned");
            if inner.current.as_ref() == Some(&key) && inner.state != LoadState::Idle {
                return LoadOutcome::Unchanged(inner.state.clone());
            }
            inner.generation += 1;
            inner.current = Some(key.clone());
            inner.state = LoadState::Resolving;
            inner.generation
        };
        debug!(page = %key, generation, strategy = self.strategy.name(), "resolving preview");

        let result = self.strategy.resolve(page.page()).await;

        let mut inner = self.inner.lock().expect("loader lock poisoned");
        if inner.generation != generation {
            debug!(page = %key, generation, "discarding stale preview resolution");
            return LoadOutcome::Superseded;
        }
        inner.state = match result {
            Ok(uri) => LoadState::Resolved(uri),
            Err(e) => {
                warn!(page = %key, error = %e, "preview could not be resolved");
                LoadState::Failed(LoadFailure::from(&e))
            }
        };
        LoadOutcome::Applied(inner.state.clone())
    }

    /// Drop the current page and discard any resolution still in flight.
    /// Called when the view goes away.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock().expect("loader lock poisoned");
        inner.generation += 1;
        inner.current = None;
        inner.state = LoadState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use certscan_bridge::{NativeImageStore, NativeScanner};
    use certscan_core::types::{
        FileEncryptionMode, ImageData, InitResult, ScanConfiguration, ScanResultEnvelope,
    };
    use tokio::sync::oneshot;

    use super::*;

    fn raw_page(id: &str, uri: &str) -> Page {
        Page {
            page_id: id.into(),
            document_preview_image_file_uri: Some(uri.into()),
            document_image_file_uri: None,
            original_image_file_uri: None,
        }
    }

    fn page(id: &str, uri: &str) -> PageHandle {
        PageHandle::new(raw_page(id, uri))
    }

    /// Image store answering from a fixed table.
    #[derive(Default)]
    struct TableStore {
        images: HashMap<String, String>,
        calls: AtomicUsize,
    }

    impl ScannerSdk for TableStore {
        fn platform_name(&self) -> &str {
            "table"
        }
    }

    #[async_trait]
    impl NativeScanner for TableStore {
        async fn initialize(&self, _options: &SdkInitOptions) -> Result<InitResult> {
            Ok(InitResult { result: "ok".into() })
        }

        async fn start_scanner(&self, _config: &ScanConfiguration) -> Result<ScanResultEnvelope> {
            Err(CertscanError::PlatformUnavailable)
        }
    }

    #[async_trait]
    impl NativeImageStore for TableStore {
        async fn get_image_data(&self, uri: &str) -> Result<ImageData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.images
                .get(uri)
                .map(|b64| ImageData {
                    base64_image_data: b64.clone(),
                })
                .ok_or_else(|| CertscanError::Decryption(format!("no key for {uri}")))
        }
    }

    /// Strategy whose resolutions complete only when the test says so.
    #[derive(Default)]
    struct GatedStrategy {
        gates: Mutex<HashMap<String, oneshot::Receiver<String>>>,
    }

    impl GatedStrategy {
        fn gate(&self, page_id: &str) -> oneshot::Sender<String> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(page_id.into(), rx);
            tx
        }
    }

    #[async_trait]
    impl ResolveStrategy for GatedStrategy {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn resolve(&self, page: &Page) -> Result<String> {
            let rx = self
                .gates
                .lock()
                .unwrap()
                .remove(&page.page_id)
                .expect("no gate for page");
            rx.await.map_err(|_| CertscanError::Bridge("gate dropped".into()))
        }
    }

    #[test]
    fn data_uri_format() {
        assert_eq!(
            embed_data_uri(ImageFileFormat::Jpg, "Zm9v"),
            "data:image/jpeg;base64,Zm9v"
        );
        assert_eq!(
            embed_data_uri(ImageFileFormat::Png, "Zm9v"),
            "data:image/png;base64,Zm9v"
        );
    }

    #[tokio::test]
    async fn direct_reference_is_verbatim() {
        for uri in ["file:///data/preview.jpg", "content://x/y?z=1", " spaced "] {
            let resolved = DirectReference.resolve(&raw_page("p", uri)).await.expect("resolve");
            assert_eq!(resolved, uri);
        }
    }

    #[tokio::test]
    async fn decrypt_and_embed_builds_jpeg_data_uri() {
        let store = TableStore {
            images: HashMap::from([("enc://p1".to_string(), "Zm9v".to_string())]),
            ..Default::default()
        };
        let strategy = DecryptAndEmbed::new(Arc::new(store), ImageFileFormat::Jpg);
        let resolved = strategy.resolve(&raw_page("p1", "enc://p1")).await.expect("resolve");
        assert_eq!(resolved, "data:image/jpeg;base64,Zm9v");
    }

    #[tokio::test]
    async fn missing_preview_uri_fails_without_calling_sdk() {
        let store = Arc::new(TableStore::default());
        let strategy = DecryptAndEmbed::new(store.clone(), ImageFileFormat::Jpg);
        let mut p = raw_page("p1", "");
        p.document_preview_image_file_uri = None;

        assert!(matches!(
            strategy.resolve(&p).await,
            Err(CertscanError::MissingPreviewUri { .. })
        ));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn strategy_follows_init_options() {
        let sdk: Arc<dyn ScannerSdk> = Arc::new(TableStore::default());
        let plain = SdkInitOptions::default();
        assert_eq!(strategy_for(&plain, sdk.clone()).name(), "direct");

        let encrypted = SdkInitOptions {
            file_encryption_mode: Some(FileEncryptionMode::Aes128),
            file_encryption_password: Some("pw".into()),
            ..Default::default()
        };
        assert_eq!(strategy_for(&encrypted, sdk).name(), "decrypt-and-embed");
    }

    #[tokio::test]
    async fn loader_resolves_and_is_idempotent() {
        let store = Arc::new(TableStore {
            images: HashMap::from([("enc://p1".to_string(), "Zm9v".to_string())]),
            ..Default::default()
        });
        let loader = PreviewImageLoader::new(Arc::new(DecryptAndEmbed::new(
            store.clone(),
            ImageFileFormat::Jpg,
        )));
        let p1 = page("p1", "enc://p1");
        let resolved = LoadState::Resolved("data:image/jpeg;base64,Zm9v".into());

        assert_eq!(loader.load(&p1).await, LoadOutcome::Applied(resolved.clone()));
        assert_eq!(loader.load(&p1.clone()).await, LoadOutcome::Unchanged(resolved.clone()));
        assert_eq!(loader.state(), resolved);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn redelivered_page_with_same_content_resolves_again() {
        let store = Arc::new(TableStore {
            images: HashMap::from([("enc://p1".to_string(), "djA=".to_string())]),
            ..Default::default()
        });
        let loader = PreviewImageLoader::new(Arc::new(DecryptAndEmbed::new(
            store.clone(),
            ImageFileFormat::Jpg,
        )));
        let first = page("p1", "enc://p1");
        loader.load(&first).await;

        // Same id and locator, new delivery: the SDK may have rewritten the
        // file in place.
        let again = PageHandle::new(first.page().clone());
        assert_eq!(
            loader.load(&again).await,
            LoadOutcome::Applied(LoadState::Resolved("data:image/jpeg;base64,djA=".into()))
        );
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn switching_from_resolved_page_clears_the_old_reference() {
        let strategy = Arc::new(GatedStrategy::default());
        let release_a = strategy.gate("a");
        let release_b = strategy.gate("b");
        let loader = PreviewImageLoader::new(strategy);

        release_a.send("file:///a.jpg".into()).unwrap();
        loader.load(&page("a", "file:///a.jpg")).await;
        assert_eq!(loader.state(), LoadState::Resolved("file:///a.jpg".into()));

        let loading_b = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load(&page("b", "file:///b.jpg")).await }
        });
        tokio::task::yield_now().await;

        // A's image must not stay visible while B resolves.
        assert_eq!(loader.state(), LoadState::Resolving);

        release_b.send("file:///b.jpg".into()).unwrap();
        assert_eq!(
            loading_b.await.unwrap(),
            LoadOutcome::Applied(LoadState::Resolved("file:///b.jpg".into()))
        );
    }

    #[tokio::test]
    async fn decrypt_failure_is_local_to_its_page() {
        let store: Arc<dyn ScannerSdk> = Arc::new(TableStore {
            images: HashMap::from([("enc://good".to_string(), "Zm9v".to_string())]),
            ..Default::default()
        });
        let strategy: Arc<dyn ResolveStrategy> =
            Arc::new(DecryptAndEmbed::new(store, ImageFileFormat::Png));
        let good = PreviewImageLoader::new(strategy.clone());
        let bad = PreviewImageLoader::new(strategy);

        good.load(&page("good", "enc://good")).await;
        bad.load(&page("bad", "enc://bad")).await;

        assert_eq!(
            good.state(),
            LoadState::Resolved("data:image/png;base64,Zm9v".into())
        );
        match bad.state() {
            LoadState::Failed(failure) => {
                assert!(failure.detail.contains("enc://bad"));
                assert_eq!(failure.severity, Severity::ActionRequired);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn switching_pages_discards_stale_result() {
        let strategy = Arc::new(GatedStrategy::default());
        let release_a = strategy.gate("a");
        let release_b = strategy.gate("b");
        let loader = PreviewImageLoader::new(strategy);

        let loading_a = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load(&page("a", "file:///a.jpg")).await }
        });
        tokio::task::yield_now().await;
        assert_eq!(loader.state(), LoadState::Resolving);

        let loading_b = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load(&page("b", "file:///b.jpg")).await }
        });
        tokio::task::yield_now().await;

        release_b.send("file:///b.jpg".into()).unwrap();
        assert_eq!(
            loading_b.await.unwrap(),
            LoadOutcome::Applied(LoadState::Resolved("file:///b.jpg".into()))
        );

        // A finishes last but must not win.
        release_a.send("file:///a.jpg".into()).unwrap();
        assert_eq!(loading_a.await.unwrap(), LoadOutcome::Superseded);
        assert_eq!(loader.state(), LoadState::Resolved("file:///b.jpg".into()));
    }

    #[tokio::test]
    async fn cancel_discards_in_flight_resolution() {
        let strategy = Arc::new(GatedStrategy::default());
        let release = strategy.gate("a");
        let loader = PreviewImageLoader::new(strategy);

        let loading = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load(&page("a", "file:///a.jpg")).await }
        });
        tokio::task::yield_now().await;

        loader.cancel();
        release.send("file:///a.jpg".into()).unwrap();

        assert_eq!(loading.await.unwrap(), LoadOutcome::Superseded);
        assert_eq!(loader.state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn changed_preview_uri_reloads() {
        let loader = PreviewImageLoader::new(Arc::new(DirectReference));
        loader.load(&page("p1", "file:///v1.jpg")).await;
        let outcome = loader.load(&page("p1", "file:///v2.jpg")).await;
        assert_eq!(
            outcome,
            LoadOutcome::Applied(LoadState::Resolved("file:///v2.jpg".into()))
        );
    }
}
