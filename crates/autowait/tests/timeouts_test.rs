// Integration tests for the timeout hierarchy
//
// The AJAX timeout walkthrough runs through the test runner: one test per
// level of the hierarchy, each failing (or passing) with the message of the
// level that fired. Further tests cover the run-wide timeout, nesting
// between levels, and page / context defaults outside the runner.

mod common;

use autowait::{
    expect, fixtures, ClickOptions, GotoOptions, Suite, TestConfig, TestRunner, TestStatus,
    TimeoutScope,
};
use common::{init_tracing, open};
use std::time::Duration;

const AJAX_BUTTON: &str = "Button triggering AJAX request";

fn timeout_suite() -> Suite {
    Suite::new("Timeout Demonstration Suite")
        .before_each(|t| async move {
            t.page.goto(fixtures::AJAX_URL, None).await?;
            Ok(())
        })
        .test("test timeout", |t| async move {
            t.info.set_timeout(5000.0);
            t.page.get_by_text(AJAX_BUTTON).click(None).await?;
            t.page.wait_for_timeout(6000.0).await;
            Ok(())
        })
        .test("action timeout", |t| async move {
            t.page.set_default_timeout(3000.0);
            t.page.get_by_text(AJAX_BUTTON).click(None).await?;
            t.page.locator(".bg-success").click(None).await
        })
        .test("expect timeout", |t| async move {
            t.page.get_by_text(AJAX_BUTTON).click(None).await?;
            expect(t.page.locator(".bg-success"))
                .with_timeout(Duration::from_secs(10))
                .to_have_text(fixtures::AJAX_SUCCESS_TEXT)
                .await
        })
        .test("expect timeout long enough", |t| async move {
            t.page.get_by_text(AJAX_BUTTON).click(None).await?;
            expect(t.page.locator(".bg-success"))
                .with_timeout(Duration::from_secs(20))
                .to_have_text(fixtures::AJAX_SUCCESS_TEXT)
                .await
        })
        .test("navigation timeout", |t| async move {
            t.page.set_default_navigation_timeout(3000.0);
            t.page
                .goto(
                    fixtures::UNREACHABLE_URL,
                    Some(GotoOptions::new().timeout(5000.0)),
                )
                .await?;
            Ok(())
        })
}

#[tokio::test(start_paused = true)]
async fn test_timeout_demonstration_suite() {
    init_tracing();
    let runner = TestRunner::new(fixtures::ajax_demo(), TestConfig::new().workers(5)).unwrap();
    let report = runner.run_suite(timeout_suite()).await.unwrap();
    assert_eq!(report.results.len(), 5);

    let test = report.result("test timeout").unwrap();
    assert_eq!(test.status, TestStatus::TimedOut);
    assert_eq!(test.error.as_deref(), Some("Test timeout of 5000ms exceeded"));
    assert_eq!(test.duration, Duration::from_secs(5));

    let action = report.result("action timeout").unwrap();
    assert_eq!(action.status, TestStatus::Failed);
    let message = action.error.as_deref().unwrap();
    assert!(message.starts_with("click: Timeout 3000ms exceeded"), "{}", message);
    assert!(message.contains("attached"), "{}", message);

    let assertion = report.result("expect timeout").unwrap();
    assert_eq!(assertion.status, TestStatus::Failed);
    assert!(
        assertion.error.as_deref().unwrap().contains("failed after 10000ms"),
        "{:?}",
        assertion.error
    );

    assert_eq!(
        report.result("expect timeout long enough").unwrap().status,
        TestStatus::Passed
    );

    let navigation = report.result("navigation timeout").unwrap();
    assert_eq!(navigation.status, TestStatus::Failed);
    assert!(
        navigation
            .error
            .as_deref()
            .unwrap()
            .starts_with("Navigation timeout of 5000ms exceeded"),
        "{:?}",
        navigation.error
    );

    assert!(!report.all_passed());
    assert!(!report.interrupted);
}

#[tokio::test(start_paused = true)]
async fn test_global_timeout_interrupts_and_skips() {
    init_tracing();
    let config = TestConfig::new().workers(1).global_timeout(8000.0);
    let runner = TestRunner::new(fixtures::ajax_demo(), config).unwrap();
    let suite = Suite::new("slow")
        .test("first", |t| async move {
            t.page.wait_for_timeout(5000.0).await;
            Ok(())
        })
        .test("second", |t| async move {
            t.page.wait_for_timeout(5000.0).await;
            Ok(())
        })
        .test("third", |t| async move {
            t.page.wait_for_timeout(5000.0).await;
            Ok(())
        });
    let report = runner.run_suite(suite).await.unwrap();

    assert_eq!(report.passed(), 1);
    assert_eq!(report.count(TestStatus::Interrupted), 1);
    assert_eq!(report.count(TestStatus::Skipped), 1);
    assert!(report.interrupted);
    let interrupted = report
        .results
        .iter()
        .find(|r| r.status == TestStatus::Interrupted)
        .unwrap();
    assert_eq!(
        interrupted.error.as_deref(),
        Some("Global timeout of 8000ms exceeded")
    );
    assert!(report.duration <= Duration::from_millis(8100));
}

#[tokio::test(start_paused = true)]
async fn test_test_timeout_caps_unbounded_action() {
    init_tracing();
    // No action timeout: the click would wait forever, the test timeout ends it.
    let config = TestConfig::new().timeout(2000.0);
    let runner = TestRunner::new(fixtures::ajax_demo(), config).unwrap();
    let suite = Suite::new("nesting").test("waits on missing element", |t| async move {
        t.page.goto(fixtures::AJAX_URL, None).await?;
        t.page.locator(".bg-success").click(None).await
    });
    let report = runner.run_suite(suite).await.unwrap();
    let result = &report.results[0];
    assert_eq!(result.status, TestStatus::TimedOut);
    assert_eq!(result.duration, Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_test_timeout_counts_hooks() {
    init_tracing();
    let config = TestConfig::new().timeout(1000.0);
    let runner = TestRunner::new(fixtures::ajax_demo(), config).unwrap();
    let suite = Suite::new("hooks")
        .before_each(|t| async move {
            t.page.wait_for_timeout(1500.0).await;
            Ok(())
        })
        .test("never reached", |_| async move { Ok(()) });
    let report = runner.run_suite(suite).await.unwrap();
    assert_eq!(report.results[0].status, TestStatus::TimedOut);
}

// ============================================================================
// Page and context defaults, outside the runner
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_per_call_timeout_beats_page_default() {
    let (_browser, page) = open(fixtures::ajax_demo()).await;
    page.goto(fixtures::AJAX_URL, None).await.unwrap();
    page.set_default_timeout(3000.0);

    let err = page
        .locator(".bg-success")
        .click(Some(ClickOptions::builder().timeout(1000.0).build()))
        .await
        .unwrap_err();
    assert_eq!(err.timeout_scope(), Some(TimeoutScope::Action));
    assert!(err.to_string().contains("1000ms"), "{}", err);

    let err = page.locator(".bg-success").click(None).await.unwrap_err();
    assert!(err.to_string().contains("3000ms"), "{}", err);
}

#[tokio::test(start_paused = true)]
async fn test_navigation_default_falls_back_to_action_default() {
    let (_browser, page) = open(fixtures::ajax_demo()).await;
    page.set_default_timeout(2000.0);
    let err = page.goto(fixtures::UNREACHABLE_URL, None).await.unwrap_err();
    assert_eq!(err.timeout_scope(), Some(TimeoutScope::Navigation));
    assert!(err.to_string().starts_with("Navigation timeout of 2000ms exceeded"));

    page.set_default_navigation_timeout(500.0);
    let err = page.goto(fixtures::UNREACHABLE_URL, None).await.unwrap_err();
    assert!(err.to_string().starts_with("Navigation timeout of 500ms exceeded"));
}

#[tokio::test(start_paused = true)]
async fn test_context_defaults_reach_new_pages() {
    let (browser, _page) = open(fixtures::ajax_demo()).await;
    let context = browser.new_context().await.unwrap();
    context.set_default_timeout(1500.0);
    let page = context.new_page().await.unwrap();
    page.goto(fixtures::AJAX_URL, None).await.unwrap();

    let err = page.locator(".bg-success").click(None).await.unwrap_err();
    assert!(err.to_string().contains("1500ms"), "{}", err);

    // The page's own default shadows the context's.
    page.set_default_timeout(700.0);
    let err = page.locator(".bg-success").click(None).await.unwrap_err();
    assert!(err.to_string().contains("700ms"), "{}", err);
}
