// Auto-waiting example - actions and assertions wait for the page
//
// Shows: clicking a button whose result arrives 15 seconds later, reads that
// wait for attachment, queries that don't, and assertion timeouts.
//
// Runs on a paused clock, so the 15 second delay passes instantly.
// Set RUST_LOG=autowait=debug to watch the waits.

use autowait::{expect, fixtures, Playwright, WaitForOptions, WaitForState};
use std::time::Duration;

#[tokio::main(flavor = "current_thread", start_paused = true)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let playwright = Playwright::launch(fixtures::ajax_demo());
    let browser = playwright.chromium().launch().await?;
    let page = browser.new_page().await?;

    page.goto(fixtures::AJAX_URL, None).await?;
    page.get_by_text("Button Triggering AJAX Request")
        .click(None)
        .await?;
    let success = page.locator(".bg-success");

    // Queries never wait: nothing has arrived yet
    println!("Right after the click: {:?}", success.all_text_contents().await?);

    // text_content waits for the element to be attached
    let text = success.text_content().await?;
    println!("text_content: {:?}", text);

    // Explicit wait, then the non-waiting query sees it
    success
        .wait_for(Some(
            WaitForOptions::builder()
                .state(WaitForState::Attached)
                .build(),
        ))
        .await?;
    println!("all_text_contents: {:?}", success.all_text_contents().await?);

    // Assertions poll up to their own timeout
    expect(success.clone())
        .with_timeout(Duration::from_secs(20))
        .to_have_text(fixtures::AJAX_SUCCESS_TEXT)
        .await?;
    println!("to_have_text passed");

    browser.close().await?;
    Ok(())
}
