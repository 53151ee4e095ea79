// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — loads the configuration, creates the scanner for
// this platform and wires the scan-to-preview flow to it.

use std::path::Path;
use std::sync::Arc;

use certscan_bridge::ScannerSdk;
use certscan_core::AppConfig;
use certscan_core::error::{CertscanError, Result};
use certscan_core::types::ScanSessionId;
use certscan_flow::{
    PreviewImageLoader, ResolveStrategy, ResultsModel, ScanInvoker, ScanResultTransport,
    strategy_for,
};
use tracing::{error, info, warn};

use super::data_dir;

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    scanner: Arc<dyn ScannerSdk>,
    transport: Arc<ScanResultTransport>,
    invoker: ScanInvoker,
    strategy: Arc<dyn ResolveStrategy>,
    config: Arc<AppConfig>,
}

impl AppServices {
    /// Build all services. Call once at app startup.
    pub fn init() -> Self {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let config = match load_config(&dir) {
            Ok(Some(config)) => config,
            Ok(None) => {
                let config = AppConfig::default();
                if let Err(e) = persist_config(&dir, &config) {
                    warn!(error = %e, "could not write default config");
                }
                config
            }
            Err(e) => {
                warn!(error = %e, "invalid config, using defaults");
                AppConfig::default()
            }
        };

        let scanner = certscan_bridge::platform_scanner(dir);
        Self::with_scanner(scanner, config)
    }

    /// Wire the flow around an already constructed scanner.
    pub fn with_scanner(scanner: Arc<dyn ScannerSdk>, config: AppConfig) -> Self {
        let transport = Arc::new(ScanResultTransport::new(config.session_expiry()));
        let invoker = ScanInvoker::new(
            Arc::clone(&scanner),
            Arc::clone(&transport),
            config.scanner.clone(),
        );
        // Derived from the same options the SDK is initialised with, so the
        // preview path always matches the SDK's real encryption mode.
        let strategy = strategy_for(&config.sdk, Arc::clone(&scanner));
        info!(
            platform = scanner.platform_name(),
            preview = strategy.name(),
            "app services ready"
        );

        Self {
            scanner,
            transport,
            invoker,
            strategy,
            config: Arc::new(config),
        }
    }

    /// Initialise the scanner SDK. Failure is logged, not escalated: the app
    /// stays usable and a later scan reports its own failure.
    pub async fn initialize_sdk(&self) {
        match self.scanner.initialize(&self.config.sdk).await {
            Ok(result) => info!(result = %result.result, "scanner SDK initialised"),
            Err(e) => error!(error = %e, "error initialising scanner SDK"),
        }
    }

    pub fn invoker(&self) -> &ScanInvoker {
        &self.invoker
    }

    /// A fresh loader for one preview image.
    pub fn preview_loader(&self) -> PreviewImageLoader {
        PreviewImageLoader::new(Arc::clone(&self.strategy))
    }

    /// Take the scan result the results screen was opened for.
    pub fn results(&self, session: ScanSessionId) -> Option<ResultsModel> {
        ResultsModel::consume(&self.transport, session)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Result<Option<AppConfig>> {
    let path = data_dir.join(CONFIG_FILE);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let config: AppConfig = serde_json::from_str(&data)?;
    if config.sdk.encryption_enabled() && config.sdk.file_encryption_password.is_none() {
        return Err(CertscanError::Config(
            "fileEncryptionMode is set but fileEncryptionPassword is missing".into(),
        ));
    }
    Ok(Some(config))
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use certscan_core::types::{FileEncryptionMode, ImageFileFormat};

    use super::*;

    #[test]
    fn missing_config_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_config(dir.path()).expect("load").is_none());
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = AppConfig::default();
        config.sdk.storage_image_format = ImageFileFormat::Png;
        config.sdk.file_encryption_mode = Some(FileEncryptionMode::Aes256);
        config.sdk.file_encryption_password = Some("pw".into());

        persist_config(dir.path(), &config).expect("persist");
        assert_eq!(load_config(dir.path()).expect("load"), Some(config));
    }

    #[test]
    fn encryption_without_password_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"sdk": {"licenseKey": "", "loggingEnabled": true, "fileEncryptionMode": "AES128"}}"#,
        )
        .expect("write");
        assert!(matches!(load_config(dir.path()), Err(CertscanError::Config(_))));
    }

    #[test]
    fn garbage_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "{not json").expect("write");
        assert!(matches!(
            load_config(dir.path()),
            Err(CertscanError::Serialization(_))
        ));
    }
}
