// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub scanner for builds without a linked native SDK.
//
// Every call returns `PlatformUnavailable`.

use async_trait::async_trait;
use certscan_core::error::{CertscanError, Result};
use certscan_core::types::{
    ImageData, InitResult, ScanConfiguration, ScanResultEnvelope, SdkInitOptions,
};

use crate::traits::*;

/// No-op scanner.
pub struct StubScanner;

impl ScannerSdk for StubScanner {
    fn platform_name(&self) -> &str {
        "Stub (no scanner SDK)"
    }
}

#[async_trait]
impl NativeScanner for StubScanner {
    async fn initialize(&self, _options: &SdkInitOptions) -> Result<InitResult> {
        tracing::warn!("NativeScanner::initialize called on stub scanner");
        Err(CertscanError::PlatformUnavailable)
    }

    async fn start_scanner(&self, _config: &ScanConfiguration) -> Result<ScanResultEnvelope> {
        tracing::warn!("NativeScanner::start_scanner called on stub scanner");
        Err(CertscanError::PlatformUnavailable)
    }
}

#[async_trait]
impl NativeImageStore for StubScanner {
    async fn get_image_data(&self, _uri: &str) -> Result<ImageData> {
        tracing::warn!("NativeImageStore::get_image_data called on stub scanner");
        Err(CertscanError::PlatformUnavailable)
    }
}
