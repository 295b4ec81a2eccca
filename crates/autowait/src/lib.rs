//! autowait: locators, actionability checks and layered timeouts for
//! browser-style test automation
//!
//! The crate drives an in-process document model instead of a browser.
//! Fixture web apps are registered by URL; pages navigate to them, and
//! locators, actions and assertions behave the way Playwright's do: every
//! action waits for its target to become actionable, every assertion polls,
//! and every wait is bounded by the applicable level of the timeout
//! hierarchy.
//!
//! # Examples
//!
//! ## Auto-waiting
//!
//! ```ignore
//! use autowait::{expect, fixtures, Playwright, WaitForOptions, WaitForState};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> autowait::Result<()> {
//!     let playwright = Playwright::launch(fixtures::ajax_demo());
//!     let browser = playwright.chromium().launch().await?;
//!     let page = browser.new_page().await?;
//!
//!     page.goto(fixtures::AJAX_URL, None).await?;
//!     page.get_by_text("Button triggering AJAX request").click(None).await?;
//!
//!     // The label is inserted 15 seconds after the click.
//!     let success = page.locator(".bg-success");
//!     success
//!         .wait_for(Some(WaitForOptions::builder().state(WaitForState::Attached).build()))
//!         .await?;
//!     expect(success)
//!         .with_timeout(Duration::from_secs(20))
//!         .to_have_text(fixtures::AJAX_SUCCESS_TEXT)
//!         .await?;
//!
//!     browser.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Locators
//!
//! ```ignore
//! use autowait::{expect, fixtures, FilterOptions, Playwright, RoleOptions};
//!
//! #[tokio::main]
//! async fn main() -> autowait::Result<()> {
//!     let playwright = Playwright::launch(fixtures::form_layouts());
//!     let browser = playwright.chromium().launch().await?;
//!     let page = browser.new_page().await?;
//!     page.goto(fixtures::FORMS_APP_URL, None).await?;
//!     page.get_by_text("Forms").click(None).await?;
//!     page.get_by_text("Form Layouts").click(None).await?;
//!
//!     let basic_form = page.locator("nb-card").filter(FilterOptions::new().has_text("Basic form"));
//!     let email = basic_form.get_by_role("textbox", Some(RoleOptions::new().name("Email")));
//!     email.fill("johndoe@example.com", None).await?;
//!     basic_form.locator("nb-checkbox").click(None).await?;
//!
//!     expect(email).to_have_value("johndoe@example.com").await?;
//!     expect(basic_form.locator("nb-checkbox .custom-checkbox"))
//!         .to_have_class_regex("checked")
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Test runner
//!
//! ```ignore
//! use autowait::{fixtures, Suite, TestConfig, TestRunner};
//!
//! #[tokio::main]
//! async fn main() -> autowait::Result<()> {
//!     let config = TestConfig::from_json_str(r#"{ "use": { "actionTimeout": 3000 } }"#)?;
//!     let runner = TestRunner::new(fixtures::ajax_demo(), config)?;
//!     let suite = Suite::new("Timeouts")
//!         .before_each(|t| async move {
//!             t.page.goto(fixtures::AJAX_URL, None).await?;
//!             Ok(())
//!         })
//!         .test("test timeout", |t| async move {
//!             t.info.set_timeout(5000.0);
//!             t.page.wait_for_timeout(6000.0).await;
//!             Ok(())
//!         });
//!     let report = runner.run_suite(suite).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

use std::time::Duration;

pub mod api;
mod assertions;
pub mod dom;
mod error;
pub mod protocol;
pub mod runner;
pub mod server;

/// Default per-test timeout (30 seconds).
///
/// See: <https://playwright.dev/docs/test-timeouts>
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout of polling assertions (5 seconds).
pub const DEFAULT_ASSERTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between actionability polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a page must have no pending timers to count as network-idle.
pub const NETWORK_IDLE: Duration = Duration::from_millis(500);

// Re-export error types
pub use error::{Error, Result};

// Re-export assertions API
pub use assertions::{expect, expect_value, Expectation, ValueExpectation};

// Re-export the main entry point and browser API
pub use protocol::{Browser, BrowserContext, BrowserType, Frame, Page, Playwright, Response};

// Re-export locators
pub use protocol::{FilterOptions, Locator, RoleOptions};

// Re-export navigation and page options
pub use protocol::{GotoOptions, LoadState, WaitUntil};

// Re-export action options
pub use protocol::{
    CheckOptions, ClickOptions, FillOptions, HoverOptions, MouseButton, Position, PressOptions,
    SelectOption, SelectOptions, WaitForOptions, WaitForState,
};

// Re-export actionability and timeouts
pub use protocol::{ActionKind, Predicate, TimeoutScope};

// Re-export browser context options
pub use protocol::{BrowserContextOptions, BrowserContextOptionsBuilder};

// Re-export the document model types tests interact with
pub use dom::{Document, EventContext, EventType, NodeId, Rect, TextMatch, Viewport};

// Re-export fixture apps
pub use server::{fixtures, PageFixture, WebApp};

// Re-export configuration and runner
pub use api::{LaunchOptions, TestConfig};
pub use runner::{Fixtures, RunReport, Suite, TestInfo, TestResult, TestRunner, TestStatus};
