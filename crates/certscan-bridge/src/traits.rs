// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the scanner SDK.
//
// Every call is a non-blocking request executed by the SDK out of line; the
// returned future resolves once the SDK reports back.

use async_trait::async_trait;
use certscan_core::error::Result;
use certscan_core::types::{
    ImageData, InitResult, ScanConfiguration, ScanResultEnvelope, SdkInitOptions,
};

/// Full SDK surface used by certscan.
pub trait ScannerSdk: NativeScanner + NativeImageStore {
    /// Human-readable platform name (e.g. "Desktop (file dialog)").
    fn platform_name(&self) -> &str;
}

/// Scanner lifecycle and the ready-to-use scanning UI.
#[async_trait]
pub trait NativeScanner: Send + Sync {
    /// Initialise the SDK. Called once at process start.
    async fn initialize(&self, options: &SdkInitOptions) -> Result<InitResult>;

    /// Present the medical certificate scanner and wait for its outcome.
    ///
    /// A user cancel is reported through the envelope status, not as an
    /// error. `Err` means the scanner itself failed (permissions, crash).
    async fn start_scanner(&self, config: &ScanConfiguration) -> Result<ScanResultEnvelope>;
}

/// Access to images held in the SDK's storage.
#[async_trait]
pub trait NativeImageStore: Send + Sync {
    /// Read (and decrypt, when file encryption is enabled) the image behind
    /// `uri`, returning its bytes base64 encoded.
    async fn get_image_data(&self, uri: &str) -> Result<ImageData>;
}
