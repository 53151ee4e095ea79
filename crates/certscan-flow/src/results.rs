// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// What the results screen consumes: one slot per page plus the recognised
// certificate fields flattened into display rows.

use certscan_core::types::{MedicalCertificateData, PageHandle, PageKey, ScanSessionId};
use tracing::{info, warn};

use crate::transport::ScanResultTransport;

/// One page to preview, keyed by its delivered instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlot {
    pub key: PageKey,
    /// 1-based position in the scan.
    pub number: usize,
    pub page: PageHandle,
}

/// A labelled value recognised on the certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
}

/// Everything the results screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsModel {
    pub session: ScanSessionId,
    pub pages: Vec<PageSlot>,
    pub fields: Vec<FieldRow>,
}

impl ResultsModel {
    /// Read the result for `session` out of the transport. Called once when
    /// the results screen mounts; the entry is gone afterwards.
    pub fn consume(transport: &ScanResultTransport, session: ScanSessionId) -> Option<Self> {
        match transport.read(session) {
            Some(payload) => {
                let model = Self::from_payload(session, payload);
                info!(session = %session, pages = model.pages.len(), fields = model.fields.len(), "results loaded");
                Some(model)
            }
            None => {
                warn!(session = %session, "no scan result for results screen");
                None
            }
        }
    }

    pub fn from_payload(session: ScanSessionId, payload: MedicalCertificateData) -> Self {
        let fields = field_rows(&payload);
        let pages = payload
            .pages
            .into_iter()
            .enumerate()
            .map(|(i, page)| {
                let page = PageHandle::new(page);
                PageSlot {
                    key: page.key(),
                    number: i + 1,
                    page,
                }
            })
            .collect();

        Self {
            session,
            pages,
            fields,
        }
    }
}

fn field_rows(payload: &MedicalCertificateData) -> Vec<FieldRow> {
    let mut rows = Vec::new();

    if let Some(ref form) = payload.form_type {
        rows.push(FieldRow {
            label: "Form type".into(),
            value: humanize_key(form),
        });
    }
    for (key, value) in &payload.patient_info {
        rows.push(FieldRow {
            label: humanize_key(key),
            value: value.clone(),
        });
    }
    for date in &payload.dates {
        rows.push(FieldRow {
            label: humanize_key(&date.date_type),
            value: format!(
                "{} ({})",
                date.date_string,
                percent(date.recognition_confidence)
            ),
        });
    }
    for checkbox in &payload.checkboxes {
        let mark = if checkbox.is_checked { "Checked" } else { "Unchecked" };
        rows.push(FieldRow {
            label: humanize_key(&checkbox.checkbox_type),
            value: format!("{mark} ({})", percent(checkbox.confidence)),
        });
    }

    rows
}

fn percent(confidence: f64) -> String {
    format!("{:.0}%", (confidence * 100.0).clamp(0.0, 100.0))
}

/// `INCAPABLE_OF_WORK_SINCE` and `firstName` both become sentence case
/// ("Incapable of work since", "First name").
fn humanize_key(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in key.chars() {
        if ch == '_' || ch == ' ' || ch == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = words.join(" ");
    if let Some(first) = out.get(0..1) {
        let upper = first.to_uppercase();
        out.replace_range(0..1, &upper);
    }
    out
}
