// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for certscan.

use thiserror::Error;

/// Top-level error type for all certscan operations.
#[derive(Debug, Error)]
pub enum CertscanError {
    // -- Scanner SDK --
    #[error("scanner SDK initialisation failed: {0}")]
    ScannerInit(String),

    #[error("scanner invocation failed: {0}")]
    Scanner(String),

    // -- Page images --
    #[error("page {page_id} has no preview image")]
    MissingPreviewUri { page_id: String },

    #[error("image decryption failed: {0}")]
    Decryption(String),

    #[error("image encryption failed: {0}")]
    Encryption(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CertscanError>;
