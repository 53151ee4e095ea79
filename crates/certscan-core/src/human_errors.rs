// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the UI presents the placeholder.

use crate::error::CertscanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Temporary problem, trying again may work.
    Transient,
    /// User must do something (scan again, fix a setting).
    ActionRequired,
    /// Cannot be fixed by retrying: bad configuration, missing platform.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `CertscanError` into a `HumanError`.
pub fn humanize_error(err: &CertscanError) -> HumanError {
    match err {
        CertscanError::ScannerInit(_) => HumanError {
            message: "The scanner couldn't be started.".into(),
            suggestion: "Check that the app's scanner license is valid, then restart the app.".into(),
            severity: Severity::Permanent,
        },

        CertscanError::Scanner(detail) => HumanError {
            message: "The scanner stopped unexpectedly.".into(),
            suggestion: format!("Try scanning again. (Detail: {detail})"),
            severity: Severity::Transient,
        },

        CertscanError::MissingPreviewUri { .. } => HumanError {
            message: "This page has no preview.".into(),
            suggestion: "Scan the certificate again.".into(),
            severity: Severity::ActionRequired,
        },

        CertscanError::Decryption(_) => HumanError {
            message: "This page image couldn't be unlocked.".into(),
            suggestion: "The stored image may be damaged or the encryption settings changed. Scan the certificate again.".into(),
            severity: Severity::ActionRequired,
        },

        CertscanError::Encryption(_) => HumanError {
            message: "The scanned page couldn't be stored securely.".into(),
            suggestion: "Check the encryption settings, then scan again.".into(),
            severity: Severity::Permanent,
        },

        CertscanError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try a JPEG or PNG.".into(),
            severity: Severity::Permanent,
        },

        CertscanError::Config(detail) => HumanError {
            message: "The app settings are invalid.".into(),
            suggestion: format!("Fix or delete the configuration file. ({detail})"),
            severity: Severity::Permanent,
        },

        CertscanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The page image couldn't be found.".into(),
                    suggestion: "It may have been removed. Scan the certificate again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    severity: Severity::Transient,
                }
            }
        }

        CertscanError::Serialization(_) => HumanError {
            message: "The scanner returned data the app didn't understand.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            severity: Severity::Transient,
        },

        CertscanError::Bridge(_) => HumanError {
            message: "A device-specific feature didn't work.".into(),
            suggestion: "Try restarting the app.".into(),
            severity: Severity::Transient,
        },

        CertscanError::PlatformUnavailable => HumanError {
            message: "Scanning isn't available on this device.".into(),
            suggestion: "The scanner needs a supported phone, tablet or desktop build.".into(),
            severity: Severity::Permanent,
        },
    }
}
