// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// certscan-flow — The scan-to-preview flow.
//
// Invokes the scanner, hands a successful result to the results screen
// through a keyed transport, and resolves a displayable image reference for
// each scanned page.

pub mod invoker;
pub mod preview;
pub mod results;
pub mod transport;

pub use invoker::{HOME_PAGE_NAME, RESULTS_PAGE_NAME, ResultsNavigator, ScanInvoker, ScanOutcome};
pub use preview::{
    DecryptAndEmbed, DirectReference, LoadFailure, LoadOutcome, LoadState, PreviewImageLoader,
    ResolveStrategy, embed_data_uri, strategy_for,
};
pub use results::{FieldRow, PageSlot, ResultsModel};
pub use transport::ScanResultTransport;
