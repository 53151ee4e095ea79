// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Results screen — page previews and recognised certificate fields for one
// scan session.

use dioxus::prelude::*;

use certscan_core::types::ScanSessionId;

use crate::components::preview_image::PreviewImage;
use crate::services::app_services::AppServices;

#[component]
pub fn Results(session: String) -> Element {
    let svc = use_context::<AppServices>();

    // Read once on mount; the transport entry is consumed by this.
    let model = use_hook(move || match session.parse::<ScanSessionId>() {
        Ok(id) => svc.results(id),
        Err(e) => {
            tracing::warn!(session = %session, error = %e, "malformed scan session id");
            None
        }
    });

    let Some(model) = model else {
        return rsx! {
            p { style: "text-align: center; color: #888; margin: 48px 0;",
                "No scan result to show. Go back and scan a certificate."
            }
        };
    };

    let count = model.pages.len();

    rsx! {
        div {
            h3 { "{count} page(s) scanned" }
            div { style: "display: flex; flex-wrap: wrap; gap: 12px; padding: 8px 0;",
                for slot in model.pages.iter() {
                    div {
                        key: "{slot.key}",
                        style: "display: flex; flex-direction: column; align-items: center; gap: 4px;",
                        PreviewImage {
                            page: slot.page.clone(),
                            style: "width: 160px; height: 220px; object-fit: contain; border: 1px solid #ccc; border-radius: 4px;",
                        }
                        span { style: "font-size: 12px; color: #888;", "Page {slot.number}" }
                    }
                }
            }

            if !model.fields.is_empty() {
                h3 { style: "margin-top: 24px;", "Recognised fields" }
                table { style: "width: 100%; border-collapse: collapse; font-size: 14px;",
                    for row in model.fields.iter() {
                        tr { style: "border-bottom: 1px solid #eee;",
                            td { style: "padding: 6px 8px; color: #666;", "{row.label}" }
                            td { style: "padding: 6px 8px;", "{row.value}" }
                        }
                    }
                }
            }
        }
    }
}
