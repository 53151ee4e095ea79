// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: scan result envelopes, pages, SDK options.
//
// Field names follow the scanner SDK's JSON (camelCase) so that envelopes can
// be passed through the native bridge as plain JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CertscanError;

// ---------------------------------------------------------------------------
// Scan session
// ---------------------------------------------------------------------------

/// Identifies one scan-and-view cycle. Travels with the navigation to the
/// results screen so the screen reads exactly the result it was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanSessionId(pub Uuid);

impl ScanSessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScanSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScanSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScanSessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Outcome of a scan invocation.
///
/// The SDK reports a string discriminant. Only the literal `"OK"` counts as
/// success; everything that is not a cancellation is treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanStatus {
    Success,
    Cancelled,
    Error,
}

impl ScanStatus {
    /// The SDK's wire literal for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Success => "OK",
            ScanStatus::Cancelled => "CANCELED",
            ScanStatus::Error => "ERROR",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScanStatus::Success)
    }
}

impl From<&str> for ScanStatus {
    fn from(s: &str) -> Self {
        match s {
            "OK" => ScanStatus::Success,
            "CANCELED" | "CANCELLED" => ScanStatus::Cancelled,
            _ => ScanStatus::Error,
        }
    }
}

impl From<String> for ScanStatus {
    fn from(s: String) -> Self {
        ScanStatus::from(s.as_str())
    }
}

impl From<ScanStatus> for String {
    fn from(status: ScanStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape of an envelope before the status/data invariant is applied.
#[derive(Deserialize)]
struct RawEnvelope {
    status: ScanStatus,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Outcome wrapper of one scan invocation: a status plus the payload, which
/// only exists when the status is [`ScanStatus::Success`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope")]
pub struct ScanResultEnvelope {
    status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<MedicalCertificateData>,
}

impl ScanResultEnvelope {
    /// A successful scan carrying `data`.
    pub fn success(data: MedicalCertificateData) -> Self {
        Self {
            status: ScanStatus::Success,
            data: Some(data),
        }
    }

    /// A non-payload outcome. Passing `Success` yields a success with an
    /// empty payload.
    pub fn with_status(status: ScanStatus) -> Self {
        match status {
            ScanStatus::Success => Self::success(MedicalCertificateData::default()),
            other => Self {
                status: other,
                data: None,
            },
        }
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn data(&self) -> Option<&MedicalCertificateData> {
        self.data.as_ref()
    }

    /// Consume the envelope, returning the payload of a successful scan.
    pub fn into_data(self) -> Option<MedicalCertificateData> {
        self.data
    }

    /// Parse an envelope from the SDK's JSON representation.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<RawEnvelope> for ScanResultEnvelope {
    type Error = CertscanError;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        if !raw.status.is_success() {
            // Any payload attached to a non-success status is ignored.
            return Ok(Self::with_status(raw.status));
        }
        let data = match raw.data {
            Some(value) => serde_json::from_value(value)?,
            None => MedicalCertificateData::default(),
        };
        Ok(Self::success(data))
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Payload of a successful medical certificate scan. Forwarded intact from
/// the SDK to the results screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalCertificateData {
    /// Scanned pages in capture order.
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Recognised certificate form (e.g. "FORM_1A").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    /// Insured person fields keyed by SDK field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub patient_info: BTreeMap<String, String>,
    #[serde(default)]
    pub dates: Vec<DateField>,
    #[serde(default)]
    pub checkboxes: Vec<CheckboxField>,
}

/// A recognised date on the certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateField {
    #[serde(rename = "type")]
    pub date_type: String,
    pub date_string: String,
    #[serde(default)]
    pub recognition_confidence: f64,
}

/// A recognised checkbox on the certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxField {
    #[serde(rename = "type")]
    pub checkbox_type: String,
    pub is_checked: bool,
    #[serde(default)]
    pub confidence: f64,
}

/// One scanned page. The image files belong to the SDK's storage and are
/// only ever read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_id: String,
    /// Cropped preview image. Either directly loadable or, with file
    /// encryption enabled, a locator to hand back to the SDK for decryption.
    #[serde(default)]
    pub document_preview_image_file_uri: Option<String>,
    #[serde(default)]
    pub document_image_file_uri: Option<String>,
    #[serde(default)]
    pub original_image_file_uri: Option<String>,
}

/// One delivered page.
///
/// Each `PageHandle::new` is a distinct page instance, even when two pages
/// carry identical content. Clones of a handle refer to the same instance.
#[derive(Debug, Clone)]
pub struct PageHandle {
    instance: u64,
    page: Arc<Page>,
}

static NEXT_PAGE_INSTANCE: AtomicU64 = AtomicU64::new(1);

impl PageHandle {
    pub fn new(page: Page) -> Self {
        Self {
            instance: NEXT_PAGE_INSTANCE.fetch_add(1, Ordering::Relaxed),
            page: Arc::new(page),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Identity of this page instance for preview loading.
    pub fn key(&self) -> PageKey {
        PageKey {
            page_id: self.page.page_id.clone(),
            instance: self.instance,
        }
    }
}

impl PartialEq for PageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.instance == other.instance
    }
}

impl Eq for PageHandle {}

impl std::ops::Deref for PageHandle {
    type Target = Page;

    fn deref(&self) -> &Page {
        &self.page
    }
}

impl From<Page> for PageHandle {
    fn from(page: Page) -> Self {
        Self::new(page)
    }
}

/// Identity of a delivered page instance. The page id is carried for logs;
/// equality is decided by the instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub page_id: String,
    pub instance: u64,
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.page_id, self.instance)
    }
}

// ---------------------------------------------------------------------------
// SDK configuration
// ---------------------------------------------------------------------------

/// Storage format of page images, fixed when the SDK is initialised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFileFormat {
    #[default]
    #[serde(rename = "JPG")]
    Jpg,
    #[serde(rename = "PNG")]
    Png,
}

impl ImageFileFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFileFormat::Jpg => "image/jpeg",
            ImageFileFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFileFormat::Jpg => "jpg",
            ImageFileFormat::Png => "png",
        }
    }
}

/// File encryption applied by the SDK to stored images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileEncryptionMode {
    #[serde(rename = "AES128")]
    Aes128,
    #[serde(rename = "AES256")]
    Aes256,
}

/// Options passed to the SDK once at process start.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkInitOptions {
    pub license_key: String,
    pub logging_enabled: bool,
    #[serde(default)]
    pub storage_image_format: ImageFileFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_encryption_mode: Option<FileEncryptionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_encryption_password: Option<String>,
}

impl SdkInitOptions {
    /// Whether stored images are encrypted and must be read back through
    /// the SDK.
    pub fn encryption_enabled(&self) -> bool {
        self.file_encryption_mode.is_some()
    }
}

impl Default for SdkInitOptions {
    fn default() -> Self {
        Self {
            license_key: String::new(),
            logging_enabled: true,
            storage_image_format: ImageFileFormat::Jpg,
            file_encryption_mode: None,
            file_encryption_password: None,
        }
    }
}

// Keeps the license key and password out of log output.
impl fmt::Debug for SdkInitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkInitOptions")
            .field("license_key", &redact(&self.license_key))
            .field("logging_enabled", &self.logging_enabled)
            .field("storage_image_format", &self.storage_image_format)
            .field("file_encryption_mode", &self.file_encryption_mode)
            .field(
                "file_encryption_password",
                &self.file_encryption_password.as_deref().map(redact),
            )
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<empty>" } else { "<redacted>" }
}

/// Result of SDK initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitResult {
    pub result: String,
}

/// Standard certificate sizes the scanner can be constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStandardSize {
    A5Portrait,
    A6Landscape,
}

/// Scanner UI configuration. Passed through to the SDK untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfiguration {
    pub top_bar_background_color: String,
    pub footer_title: String,
    pub footer_subtitle: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aspect_ratios: Vec<CertificateStandardSize>,
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            top_bar_background_color: "#c8193c".into(),
            footer_title: "Scan your Medical Certificate".into(),
            footer_subtitle: "ScanbotSDK Demo".into(),
            aspect_ratios: Vec::new(),
        }
    }
}

/// Decrypted image bytes returned by the SDK, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub base64_image_data: String,
}
