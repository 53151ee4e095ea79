// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hand-off of a scan result from the scan screen to the results screen.
//
// The router only carries strings, so the payload is parked here under a
// fresh session id and the id travels in the route. Entries are removed when
// read and dropped once they exceed the expiry.
//
// Ordering: `write` must return before the navigation that carries the id is
// started, otherwise the results screen may find nothing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use certscan_core::types::{MedicalCertificateData, ScanSessionId};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

struct Entry {
    payload: MedicalCertificateData,
    written_at: DateTime<Utc>,
}

/// Keyed, short-lived store of scan results awaiting their results screen.
pub struct ScanResultTransport {
    entries: Mutex<HashMap<ScanSessionId, Entry>>,
    expiry: chrono::Duration,
}

impl ScanResultTransport {
    pub fn new(expiry: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            expiry: chrono::Duration::from_std(expiry)
                .unwrap_or_else(|_| chrono::Duration::days(365)),
        }
    }

    /// Park `payload` and return the id the results screen must ask for.
    pub fn write(&self, payload: MedicalCertificateData) -> ScanSessionId {
        self.write_at(payload, Utc::now())
    }

    /// Take the payload for `session`. A second read returns `None`.
    pub fn read(&self, session: ScanSessionId) -> Option<MedicalCertificateData> {
        self.read_at(session, Utc::now())
    }

    /// Look at the payload for `session` without consuming it.
    #[cfg(test)]
    pub(crate) fn peek(&self, session: ScanSessionId) -> Option<MedicalCertificateData> {
        let now = Utc::now();
        let entries = self.entries.lock().expect("transport lock poisoned");
        entries
            .get(&session)
            .filter(|e| !self.is_expired(e, now))
            .map(|e| e.payload.clone())
    }

    /// Number of results waiting to be read, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("transport lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_at(&self, payload: MedicalCertificateData, now: DateTime<Utc>) -> ScanSessionId {
        let session = ScanSessionId::new();
        let pages = payload.pages.len();

        let mut entries = self.entries.lock().expect("transport lock poisoned");
        let before = entries.len();
        entries.retain(|_, e| !self.is_expired(e, now));
        if entries.len() < before {
            debug!(purged = before - entries.len(), "expired scan results dropped");
        }
        entries.insert(
            session,
            Entry {
                payload,
                written_at: now,
            },
        );

        info!(session = %session, pages, "scan result parked for results screen");
        session
    }

    fn read_at(&self, session: ScanSessionId, now: DateTime<Utc>) -> Option<MedicalCertificateData> {
        let entry = self
            .entries
            .lock()
            .expect("transport lock poisoned")
            .remove(&session)?;
        if self.is_expired(&entry, now) {
            debug!(session = %session, "scan result expired before it was read");
            return None;
        }
        Some(entry.payload)
    }

    fn is_expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.written_at > self.expiry
    }
}
