// Integration tests for the test runner
//
// Tests cover:
// - Hook order and after_each on failure
// - Soft assertions failing a test without stopping it
// - Isolation between tests (fresh context and page each)
// - Loading configuration from a JSON file
// - JSON report

mod common;

use autowait::{fixtures, Suite, TestConfig, TestRunner, TestStatus};
use common::init_tracing;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

#[tokio::test(start_paused = true)]
async fn test_hooks_run_around_every_test() {
    init_tracing();
    let log: Arc<Mutex<Vec<String>>> = Arc::default();
    let (before, body, after) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));
    let suite = Suite::new("hooks")
        .before_each(move |t| {
            let log = Arc::clone(&before);
            async move {
                log.lock().push(format!("before {}", t.info.title()));
                Ok(())
            }
        })
        .after_each(move |t| {
            let log = Arc::clone(&after);
            async move {
                log.lock().push(format!("after {}", t.info.title()));
                Ok(())
            }
        })
        .test("passes", move |_| {
            let log = Arc::clone(&body);
            async move {
                log.lock().push("body passes".to_string());
                Ok(())
            }
        })
        .test("fails", |t| async move {
            t.page.locator("#missing").inner_text().await?;
            Ok(())
        });

    let config = TestConfig::new().workers(1).action_timeout(500.0);
    let runner = TestRunner::new(fixtures::ajax_demo(), config).unwrap();
    let report = runner.run_suite(suite).await.unwrap();

    assert_eq!(report.result("passes").unwrap().status, TestStatus::Passed);
    assert_eq!(report.result("fails").unwrap().status, TestStatus::Failed);
    assert_eq!(
        *log.lock(),
        [
            "before passes",
            "body passes",
            "after passes",
            "before fails",
            "after fails"
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_soft_failures_fail_the_test_but_let_it_finish() {
    init_tracing();
    let reached_end = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&reached_end);
    let suite = Suite::new("Assertions").test("soft", move |t| {
        let flag = Arc::clone(&flag);
        async move {
            t.page.goto(fixtures::FORMS_APP_URL, None).await?;
            t.page.get_by_text("Forms").click(None).await?;
            t.page.get_by_text("Form Layouts").click(None).await?;
            let button = t
                .page
                .locator_with("nb-card", autowait::FilterOptions::new().has_text("Basic form"))
                .locator("button");
            t.info.expect_soft(button.clone()).to_have_text("Submittt").await?;
            button.click(None).await?;
            *flag.lock() = true;
            Ok(())
        }
    });

    let config = TestConfig::new().expect_timeout(1000.0);
    let runner = TestRunner::new(fixtures::form_layouts(), config).unwrap();
    let report = runner.run_suite(suite).await.unwrap();

    assert!(*reached_end.lock());
    let result = report.result("soft").unwrap();
    assert_eq!(result.status, TestStatus::Failed);
    assert!(result.error.is_none());
    assert_eq!(result.soft_failures.len(), 1);
    assert!(result.soft_failures[0].contains("failed after 1000ms"));
    assert!(report.to_string().contains("soft: "));
}

#[tokio::test(start_paused = true)]
async fn test_each_test_gets_a_fresh_page() {
    init_tracing();
    let suite = Suite::new("isolation")
        .test("mutates", |t| async move {
            t.page.goto(fixtures::AJAX_URL, None).await?;
            t.page.locator("#ajaxButton").click(None).await?;
            assert_eq!(t.page.pending_timers(), 1);
            Ok(())
        })
        .test("starts blank", |t| async move {
            assert_eq!(t.page.url(), "about:blank");
            assert_eq!(t.page.pending_timers(), 0);
            assert_eq!(t.context.pages().len(), 1);
            Ok(())
        });
    let runner = TestRunner::new(fixtures::ajax_demo(), TestConfig::new().workers(2)).unwrap();
    let report = runner.run_suite(suite).await.unwrap();
    assert!(report.all_passed(), "{}", report);
}

#[tokio::test(start_paused = true)]
async fn test_config_file_drives_the_run() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "timeout": 4000,
            "workers": 2,
            "expect": {{ "timeout": 2000 }},
            "use": {{
                "actionTimeout": 1000,
                "baseURL": "https://uitestingplayground.com/"
            }}
        }}"#
    )
    .unwrap();
    let config = TestConfig::from_file(file.path()).unwrap();
    let runner = TestRunner::new(fixtures::ajax_demo(), config).unwrap();

    let suite = Suite::new("configured")
        .test("relative goto", |t| async move {
            t.page.goto("/ajax", None).await?;
            t.info.expect(t.page.locator("#ajaxButton")).to_be_visible().await
        })
        .test("action timeout from config", |t| async move {
            t.page.goto("ajax", None).await?;
            t.page.locator(".bg-success").click(None).await
        })
        .test("assertion timeout from config", |t| async move {
            t.page.goto("ajax", None).await?;
            t.info.expect(t.page.locator(".bg-success")).to_be_visible().await
        });
    let report = runner.run_suite(suite).await.unwrap();

    assert_eq!(report.result("relative goto").unwrap().status, TestStatus::Passed);
    let action = report.result("action timeout from config").unwrap();
    assert!(action.error.as_deref().unwrap().contains("Timeout 1000ms exceeded"));
    let assertion = report.result("assertion timeout from config").unwrap();
    assert!(assertion.error.as_deref().unwrap().contains("failed after 2000ms"));
}

#[tokio::test(start_paused = true)]
async fn test_report_serializes_to_json() {
    init_tracing();
    let suite = Suite::new("json")
        .test("ok", |_| async move { Ok(()) })
        .test("timed out", |t| async move {
            t.info.set_timeout(100.0);
            t.page.wait_for_timeout(1000.0).await;
            Ok(())
        });
    let runner = TestRunner::new(fixtures::ajax_demo(), TestConfig::new()).unwrap();
    let report = runner.run_suite(suite).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["results"][0]["status"], "passed");
    assert_eq!(json["results"][1]["status"], "timedOut");
    assert_eq!(json["results"][1]["error"], "Test timeout of 100ms exceeded");
    assert_eq!(json["results"][1]["suite"], "json");
}
