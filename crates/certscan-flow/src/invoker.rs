// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan invocation — run the scanner and decide whether to open the results
// screen.
//
// Non-success outcomes and scanner failures are deliberately silent for the
// user: the scan screen simply stays where it is and the user can try again.

use std::sync::Arc;

use certscan_bridge::ScannerSdk;
use certscan_core::types::{ScanConfiguration, ScanSessionId, ScanStatus};
use tracing::{error, info, instrument};

use crate::transport::ScanResultTransport;

/// Page name of the scan (home) screen.
pub const HOME_PAGE_NAME: &str = "Home Screen";

/// Page name of the results screen.
pub const RESULTS_PAGE_NAME: &str = "Medical Certificate Results";

/// Forward navigation to the results screen.
pub trait ResultsNavigator {
    /// Push the results screen for `session` onto the navigation stack.
    fn push_results(&self, session: ScanSessionId);
}

/// What a scan invocation ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Result parked in the transport and the results screen requested.
    Navigated(ScanSessionId),
    /// The scanner finished without a result (cancelled or SDK-reported
    /// error). Nothing was written and no navigation happened.
    Aborted(ScanStatus),
    /// The scanner call itself failed. Logged and otherwise ignored.
    Faulted(String),
}

/// Issues scan requests and hands successful results on.
#[derive(Clone)]
pub struct ScanInvoker {
    sdk: Arc<dyn ScannerSdk>,
    transport: Arc<ScanResultTransport>,
    config: ScanConfiguration,
}

impl ScanInvoker {
    pub fn new(
        sdk: Arc<dyn ScannerSdk>,
        transport: Arc<ScanResultTransport>,
        config: ScanConfiguration,
    ) -> Self {
        Self {
            sdk,
            transport,
            config,
        }
    }

    /// Run one scan. On success the payload is written to the transport
    /// first and navigation is requested second.
    #[instrument(skip_all, fields(platform = self.sdk.platform_name()))]
    pub async fn invoke(&self, navigator: &dyn ResultsNavigator) -> ScanOutcome {
        let envelope = match self.sdk.start_scanner(&self.config).await {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(error = %e, "scanner invocation failed");
                return ScanOutcome::Faulted(e.to_string());
            }
        };

        let status = envelope.status();
        let Some(data) = envelope.into_data() else {
            info!(status = %status, "scan ended without a result");
            return ScanOutcome::Aborted(status);
        };

        let pages = data.pages.len();
        let session = self.transport.write(data);
        info!(session = %session, pages, page = RESULTS_PAGE_NAME, "opening results");
        navigator.push_results(session);
        ScanOutcome::Navigated(session)
    }
}
