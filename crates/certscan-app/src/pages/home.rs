// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Home screen — launches the medical certificate scanner.

use dioxus::prelude::*;

use certscan_core::types::ScanSessionId;
use certscan_flow::{ResultsNavigator, ScanOutcome};

use crate::Route;
use crate::services::app_services::AppServices;

/// Pushes the results route on the Dioxus router.
struct RouterNavigator(Navigator);

impl ResultsNavigator for RouterNavigator {
    fn push_results(&self, session: ScanSessionId) {
        self.0.push(Route::Results {
            session: session.to_string(),
        });
    }
}

#[component]
pub fn Home() -> Element {
    let svc = use_context::<AppServices>();
    let mut scanning = use_signal(|| false);
    let scanner_title = svc.config().scanner.footer_title.clone();

    rsx! {
        div {
            Section { title: "Medical Certificate Scanner Demo",
                "Press on the button below to try out the "
                strong { "Medical Certificate Scanner" }
                " Ready-To-Use UI feature!"
            }

            div { style: "padding: 24px;",
                button {
                    style: "width: 100%; padding: 16px; border-radius: 12px; border: none; background: #c8193c; color: white; font-size: 16px;",
                    disabled: *scanning.read(),
                    title: "{scanner_title}",
                    onclick: move |_| {
                        let invoker = svc.invoker().clone();
                        let nav = RouterNavigator(navigator());
                        scanning.set(true);
                        spawn(async move {
                            let outcome = invoker.invoke(&nav).await;
                            if !matches!(outcome, ScanOutcome::Navigated(_)) {
                                tracing::debug!(?outcome, "staying on home screen");
                            }
                            scanning.set(false);
                        });
                    },
                    if *scanning.read() { "Scanning..." } else { "Launch Medical Certificate Scanner" }
                }
            }
        }
    }
}

#[component]
fn Section(title: &'static str, children: Element) -> Element {
    rsx! {
        div { style: "margin-top: 32px; padding: 0 24px;",
            h2 { style: "font-size: 24px; font-weight: 600; color: #000;", "{title}" }
            p { style: "margin-top: 8px; font-size: 18px; font-weight: 400; color: #444;",
                {children}
            }
        }
    }
}
