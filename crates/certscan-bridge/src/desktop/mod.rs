// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop stand-in for the scanner SDK.
//
// There is no camera scanner on desktop, so "scanning" picks page images
// through the native file dialog. Picked images are stored the way the SDK
// stores them: re-encoded into the configured image format, with a
// downscaled preview, and sealed with age when file encryption is enabled.

pub mod vault;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use certscan_core::error::{CertscanError, Result};
use certscan_core::types::{
    ImageData, ImageFileFormat, InitResult, MedicalCertificateData, Page, ScanConfiguration,
    ScanResultEnvelope, ScanStatus, SdkInitOptions,
};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument, warn};

use crate::traits::*;
use vault::PageVault;

/// Longest edge of a stored preview image, in pixels.
const PREVIEW_MAX_EDGE: u32 = 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "bmp", "webp"];

/// State established by `initialize`.
struct Session {
    vault: Arc<PageVault>,
    format: ImageFileFormat,
}

/// File-dialog scanner used on desktop builds.
pub struct DesktopScanner {
    storage_dir: PathBuf,
    session: Mutex<Option<Session>>,
}

impl DesktopScanner {
    pub fn new(storage_dir: PathBuf) -> Self {
        Self {
            storage_dir,
            session: Mutex::new(None),
        }
    }

    fn session(&self) -> Result<(Arc<PageVault>, ImageFileFormat)> {
        let guard = self.session.lock().expect("scanner session lock poisoned");
        match *guard {
            Some(ref s) => Ok((Arc::clone(&s.vault), s.format)),
            None => Err(CertscanError::ScannerInit("scanner used before initialize".into())),
        }
    }

    /// Turn raw image files into stored pages, in order.
    pub async fn import_pages(&self, images: Vec<Vec<u8>>) -> Result<MedicalCertificateData> {
        let (vault, format) = self.session()?;
        let pages = run_blocking(move || {
            images
                .iter()
                .map(|bytes| store_page(&vault, format, bytes))
                .collect::<Result<Vec<_>>>()
        })
        .await?;

        Ok(MedicalCertificateData {
            pages,
            ..Default::default()
        })
    }
}

impl ScannerSdk for DesktopScanner {
    fn platform_name(&self) -> &str {
        "Desktop (file dialog)"
    }
}

#[async_trait]
impl NativeScanner for DesktopScanner {
    #[instrument(skip_all, fields(format = ?options.storage_image_format, encrypted = options.encryption_enabled()))]
    async fn initialize(&self, options: &SdkInitOptions) -> Result<InitResult> {
        let passphrase = match (options.file_encryption_mode, &options.file_encryption_password) {
            (None, _) => None,
            (Some(_), Some(password)) if !password.is_empty() => Some(password.clone()),
            (Some(_), _) => {
                return Err(CertscanError::ScannerInit(
                    "file encryption requires a password".into(),
                ));
            }
        };
        if options.license_key.is_empty() {
            warn!("no license key configured; desktop scanner runs unlicensed");
        }

        let vault = PageVault::new(self.storage_dir.join("pages"), passphrase);
        *self.session.lock().expect("scanner session lock poisoned") = Some(Session {
            vault: Arc::new(vault),
            format: options.storage_image_format,
        });

        if options.logging_enabled {
            info!(dir = %self.storage_dir.display(), "desktop scanner initialised");
        }
        Ok(InitResult {
            result: "desktop scanner initialised".into(),
        })
    }

    #[instrument(skip_all, fields(title = %config.footer_title))]
    async fn start_scanner(&self, config: &ScanConfiguration) -> Result<ScanResultEnvelope> {
        // Fail before showing the dialog if initialize never ran.
        self.session()?;

        let picked = rfd::AsyncFileDialog::new()
            .set_title(&config.footer_title)
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_files()
            .await;

        let handles = match picked {
            Some(handles) if !handles.is_empty() => handles,
            _ => {
                info!("scan cancelled");
                return Ok(ScanResultEnvelope::with_status(ScanStatus::Cancelled));
            }
        };

        let mut images = Vec::with_capacity(handles.len());
        for handle in &handles {
            images.push(handle.read().await);
        }

        let data = self.import_pages(images).await?;
        info!(pages = data.pages.len(), "scan complete");
        Ok(ScanResultEnvelope::success(data))
    }
}

#[async_trait]
impl NativeImageStore for DesktopScanner {
    #[instrument(skip(self))]
    async fn get_image_data(&self, uri: &str) -> Result<ImageData> {
        let (vault, _) = self.session()?;
        let path = PathBuf::from(uri);
        let bytes = run_blocking(move || vault.load(&path)).await?;
        Ok(ImageData {
            base64_image_data: STANDARD.encode(bytes),
        })
    }
}

/// Decode one picked image and store its original, document and preview
/// renditions.
fn store_page(vault: &PageVault, format: ImageFileFormat, bytes: &[u8]) -> Result<Page> {
    let original_ext = image::guess_format(bytes)
        .map_err(|e| CertscanError::ImageError(e.to_string()))?
        .extensions_str()
        .first()
        .copied()
        .unwrap_or("img");
    let decoded =
        image::load_from_memory(bytes).map_err(|e| CertscanError::ImageError(e.to_string()))?;

    let original = vault.store(bytes, original_ext)?;
    let document = vault.store(&encode_as(&decoded, format)?, format.extension())?;
    let preview_image = decoded.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE);
    let preview = vault.store(&encode_as(&preview_image, format)?, format.extension())?;

    let page = Page {
        page_id: uuid::Uuid::new_v4().to_string(),
        document_preview_image_file_uri: Some(path_string(&preview)),
        document_image_file_uri: Some(path_string(&document)),
        original_image_file_uri: Some(path_string(&original)),
    };
    debug!(page_id = %page.page_id, "page stored");
    Ok(page)
}

fn encode_as(img: &DynamicImage, format: ImageFileFormat) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        // JPEG has no alpha channel.
        ImageFileFormat::Jpg => {
            DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut buf, ImageFormat::Jpeg)
        }
        ImageFileFormat::Png => img.write_to(&mut buf, ImageFormat::Png),
    }
    .map_err(|e| CertscanError::ImageError(e.to_string()))?;
    Ok(buf.into_inner())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Image codecs and scrypt are CPU-heavy; keep them off the UI thread.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CertscanError::Bridge(format!("storage task failed: {e}")))?
}
