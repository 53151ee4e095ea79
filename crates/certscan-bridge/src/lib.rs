// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! certscan — Scanner SDK bridge.
//!
//! Defines the boundary to the external document-scanning SDK and picks the
//! implementation for the target operating system. Everything behind this
//! boundary (camera UI, OCR, image encryption) belongs to the SDK.

use std::path::PathBuf;
use std::sync::Arc;

pub mod traits;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod desktop;

#[cfg(any(target_os = "ios", target_os = "android", test))]
pub mod stub;

pub use traits::{NativeImageStore, NativeScanner, ScannerSdk};

/// Returns the scanner implementation for the target operating system.
///
/// `storage_dir` is where scanned page images are kept on platforms where
/// this crate owns the storage (desktop).
pub fn platform_scanner(storage_dir: PathBuf) -> Arc<dyn ScannerSdk> {
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        // DESKTOP: file-dialog stand-in for the camera scanner.
        Arc::new(desktop::DesktopScanner::new(storage_dir))
    }
    #[cfg(any(target_os = "ios", target_os = "android"))]
    {
        // No native SDK binding is linked into this build.
        let _ = storage_dir;
        Arc::new(stub::StubScanner)
    }
}
