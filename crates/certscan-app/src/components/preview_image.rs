// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview image for one scanned page.

use dioxus::prelude::*;

use certscan_core::human_errors::Severity;
use certscan_core::types::PageHandle;
use certscan_flow::{LoadOutcome, LoadState};

use crate::services::app_services::AppServices;

/// Shows the preview of `page`, resolving it through the loader picked for
/// the SDK's encryption mode. Passing a different page instance restarts
/// the resolution, even when its content is unchanged; unmounting cancels it.
#[component]
pub fn PreviewImage(page: PageHandle, #[props(default)] style: String) -> Element {
    let svc = use_context::<AppServices>();
    let loader = use_hook(|| svc.preview_loader());
    let mut view = use_signal(LoadState::default);

    let effect_loader = loader.clone();
    use_effect(use_reactive!(|(page,)| {
        let loader = effect_loader.clone();
        view.set(LoadState::Resolving);
        spawn(async move {
            match loader.load(&page).await {
                LoadOutcome::Applied(state) | LoadOutcome::Unchanged(state) => view.set(state),
                LoadOutcome::Superseded => {}
            }
        });
    }));

    use_drop(move || loader.cancel());

    match view() {
        LoadState::Idle | LoadState::Resolving => rsx! {
            div { style: "{style} display: flex; align-items: center; justify-content: center; background: #f4f4f4; color: #999;",
                "Loading…"
            }
        },
        LoadState::Resolved(uri) => rsx! {
            img { style: "{style}", src: "{uri}", alt: "Scanned page preview" }
        },
        LoadState::Failed(failure) => {
            let (background, color) = failure_colors(failure.severity);
            rsx! {
                div {
                    style: "{style} display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 4px; padding: 8px; background: {background}; color: {color}; font-size: 12px; text-align: center;",
                    title: "{failure.detail}",
                    span { "{failure.message}" }
                    span { style: "color: #666;", "{failure.suggestion}" }
                }
            }
        }
    }
}

/// Placeholder colours (background, text) for a failed preview.
fn failure_colors(severity: Severity) -> (&'static str, &'static str) {
    match severity {
        Severity::Transient => ("#f4f4f4", "#555"),
        Severity::ActionRequired => ("#fff4e5", "#8a5300"),
        Severity::Permanent => ("#fdecea", "#b71c1c"),
    }
}
