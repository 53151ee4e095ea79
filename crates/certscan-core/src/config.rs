// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{ScanConfiguration, SdkInitOptions};

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Options the scanner SDK is initialised with. The preview strategy is
    /// derived from these, never configured separately.
    pub sdk: SdkInitOptions,
    /// Scanner UI passthrough configuration.
    pub scanner: ScanConfiguration,
    /// How long an unread scan result is kept for the results screen.
    pub session_expiry_secs: u64,
}

impl AppConfig {
    pub fn session_expiry(&self) -> Duration {
        Duration::from_secs(self.session_expiry_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sdk: SdkInitOptions::default(),
            scanner: ScanConfiguration::default(),
            session_expiry_secs: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileEncryptionMode, ImageFileFormat};

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{"sdk": {"licenseKey": "", "loggingEnabled": false, "storageImageFormat": "PNG", "fileEncryptionMode": "AES256"}}"#;
        let config: AppConfig = serde_json::from_str(json).expect("parse failed");
        assert_eq!(config.sdk.storage_image_format, ImageFileFormat::Png);
        assert_eq!(config.sdk.file_encryption_mode, Some(FileEncryptionMode::Aes256));
        assert_eq!(config.scanner, ScanConfiguration::default());
        assert_eq!(config.session_expiry(), Duration::from_secs(600));
    }

    #[test]
    fn default_has_encryption_off() {
        assert!(!AppConfig::default().sdk.encryption_enabled());
    }
}
