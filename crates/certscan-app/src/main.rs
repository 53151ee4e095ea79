// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// certscan — Medical certificate scanner front-end.
//
// Entry point. Initialises logging and the service layer, kicks off scanner
// SDK initialisation, and launches the Dioxus UI.

mod components;
mod pages;
mod services;

use dioxus::prelude::*;

use certscan_flow::{HOME_PAGE_NAME, RESULTS_PAGE_NAME};
use pages::home::Home;
use pages::results::Results;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("certscan starting");

    dioxus::launch(app);
}

/// Top-level route enum. The results route carries the scan session id so
/// the results screen reads exactly the result it was opened for.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(ScreenLayout)]
    #[route("/")]
    Home {},
    #[route("/results/:session")]
    Results { session: String },
}

impl Route {
    fn page_name(&self) -> &'static str {
        match self {
            Route::Home {} => HOME_PAGE_NAME,
            Route::Results { .. } => RESULTS_PAGE_NAME,
        }
    }
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(AppServices::init);

    use_context_provider(|| svc.clone());

    // Initialise the scanner SDK once; failures are logged by the service.
    let svc_init = svc.clone();
    use_hook(move || {
        spawn(async move {
            svc_init.initialize_sdk().await;
        });
    });

    rsx! {
        Router::<Route> {}
    }
}

/// Title bar plus the current screen.
#[component]
fn ScreenLayout() -> Element {
    let route = use_route::<Route>();
    let title = route.page_name();
    let can_go_back = !matches!(route, Route::Home {});

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            header {
                style: "display: flex; align-items: center; gap: 12px; padding: 12px 16px; border-bottom: 1px solid #e0e0e0; background: #fafafa;",
                if can_go_back {
                    button {
                        style: "border: none; background: none; color: #c8193c; font-size: 16px;",
                        onclick: move |_| navigator().go_back(),
                        "\u{2039} Back"
                    }
                }
                strong { style: "font-size: 18px;", "{title}" }
            }

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }
        }
    }
}
