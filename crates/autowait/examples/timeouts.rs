// Timeouts example - every level of the hierarchy, through the runner
//
// Shows: test, action, assertion and navigation timeouts failing with their
// own messages, plus a run-wide timeout. Runs on a paused clock.

use autowait::{expect, fixtures, GotoOptions, Suite, TestConfig, TestRunner};
use std::time::Duration;

#[tokio::main(flavor = "current_thread", start_paused = true)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = TestConfig::from_json_str(
        r#"{ "workers": 4, "globalTimeout": 60000, "expect": { "timeout": 5000 } }"#,
    )?;
    let runner = TestRunner::new(fixtures::ajax_demo(), config)?;

    let suite = Suite::new("Timeout Demonstration Suite")
        .before_each(|t| async move {
            t.page.goto(fixtures::AJAX_URL, None).await?;
            Ok(())
        })
        .test("test timeout", |t| async move {
            t.info.set_timeout(5000.0);
            t.page.get_by_text("Button triggering AJAX request").click(None).await?;
            t.page.wait_for_timeout(6000.0).await;
            Ok(())
        })
        .test("action timeout", |t| async move {
            t.page.set_default_timeout(3000.0);
            t.page.get_by_text("Button triggering AJAX request").click(None).await?;
            t.page.locator(".bg-success").click(None).await
        })
        .test("expect timeout", |t| async move {
            t.page.get_by_text("Button triggering AJAX request").click(None).await?;
            expect(t.page.locator(".bg-success"))
                .with_timeout(Duration::from_secs(10))
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
        });

    let report = runner.run_suite(suite).await?;
    println!("{report}");
    println!("{}", report.to_json()?);
    Ok(())
}
