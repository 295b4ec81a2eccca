// Shared helpers for integration tests
//
// Set RUST_LOG=autowait=debug to see what actionability checks are waiting
// for while a test runs.

#![allow(dead_code)]

use autowait::{Browser, Page, Playwright, WebApp};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Launches a browser over `app` and opens one page.
pub async fn open(app: WebApp) -> (Browser, Page) {
    init_tracing();
    let playwright = Playwright::launch(app);
    let browser = playwright
        .chromium()
        .launch()
        .await
        .expect("Failed to launch browser");
    let page = browser.new_page().await.expect("Failed to create page");
    (browser, page)
}

/// A page showing `html`, with no app behind it.
pub async fn page_with(html: &str) -> (Browser, Page) {
    let (browser, page) = open(WebApp::new()).await;
    page.set_content(html).await.expect("Failed to set content");
    (browser, page)
}

/// Marks `#id` with `data-clicked` every time it is clicked.
pub fn track_clicks(page: &Page, id: &'static str) {
    page.evaluate(|doc| {
        let node = doc.get_element_by_id(id).expect("tracked element exists");
        doc.add_event_listener(node, autowait::EventType::Click, |cx| {
            let target = cx.current_target();
            let doc = cx.document();
            let count: u32 = doc
                .get_attribute(target, "data-clicked")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let _ = doc.set_attribute(target, "data-clicked", &(count + 1).to_string());
        });
    })
    .expect("Failed to install click tracker");
}
