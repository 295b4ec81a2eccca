// Integration tests for auto-waiting
//
// Tests cover:
// - Reads that wait for late elements (AJAX demo)
// - Queries that never wait (all_text_contents, count, is_visible)
// - Actions waiting for visible, stable, enabled, editable and
//   receiving-events
// - force / trial
// - Network idle
//
// Every test runs on a paused clock: the 15 second AJAX delay costs nothing.

mod common;

use autowait::{
    expect, fixtures, ClickOptions, Error, FillOptions, GotoOptions, LoadState, Predicate,
    WaitForOptions, WaitForState, WaitUntil,
};
use common::{open, page_with, track_clicks};
use std::time::Duration;
use tokio::time::Instant;

const AJAX_BUTTON: &str = "Button Triggering AJAX Request";

// ============================================================================
// AJAX demo
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_text_content_waits_for_ajax_data() {
    let (_browser, page) = open(fixtures::ajax_demo()).await;
    page.goto(fixtures::AJAX_URL, None).await.unwrap();
    page.get_by_text(AJAX_BUTTON).click(None).await.unwrap();

    let started = Instant::now();
    let text = page.locator(".bg-success").text_content().await.unwrap();
    assert_eq!(text.as_deref(), Some(fixtures::AJAX_SUCCESS_TEXT));
    assert!(started.elapsed() >= fixtures::AJAX_DELAY - Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_all_text_contents_does_not_wait() {
    let (_browser, page) = open(fixtures::ajax_demo()).await;
    page.goto(fixtures::AJAX_URL, None).await.unwrap();
    page.get_by_text(AJAX_BUTTON).click(None).await.unwrap();

    let success = page.locator(".bg-success");
    assert!(success.all_text_contents().await.unwrap().is_empty());
    assert_eq!(success.count().await.unwrap(), 0);
    assert!(!success.is_visible().await.unwrap());

    success
        .wait_for(Some(
            WaitForOptions::builder()
                .state(WaitForState::Attached)
                .build(),
        ))
        .await
        .unwrap();
    assert_eq!(
        success.all_text_contents().await.unwrap(),
        vec![fixtures::AJAX_SUCCESS_TEXT.to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_assertion_needs_longer_timeout_for_ajax() {
    let (_browser, page) = open(fixtures::ajax_demo()).await;
    page.goto(fixtures::AJAX_URL, None).await.unwrap();
    page.get_by_text(AJAX_BUTTON).click(None).await.unwrap();
    let success = page.locator(".bg-success");

    // The default 5s is not enough for a 15s response.
    let err = expect(success.clone())
        .to_have_text(fixtures::AJAX_SUCCESS_TEXT)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AssertionTimeout { .. }));
    assert!(err.to_string().contains("5000ms"), "{}", err);

    expect(success)
        .with_timeout(Duration::from_secs(20))
        .to_have_text(fixtures::AJAX_SUCCESS_TEXT)
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_assertion_on_never_inserted_data_names_attached() {
    let (_browser, page) = open(fixtures::ajax_demo()).await;
    page.goto(fixtures::AJAX_URL, None).await.unwrap();

    // The button is never clicked, so the paragraph never arrives.
    let err = expect(page.locator(".bg-success"))
        .with_timeout(Duration::from_secs(1))
        .to_have_text(fixtures::AJAX_SUCCESS_TEXT)
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.unsatisfied_predicate(), Some(Predicate::Attached));
    let message = err.to_string();
    assert!(message.contains("failed after 1000ms"), "{}", message);
    assert!(
        message.contains("waiting for element to be attached"),
        "{}",
        message
    );
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_times_out_naming_predicate() {
    let (_browser, page) = open(fixtures::ajax_demo()).await;
    page.goto(fixtures::AJAX_URL, None).await.unwrap();

    let err = page
        .locator(".bg-success")
        .wait_for(Some(WaitForOptions::builder().timeout(1000.0).build()))
        .await
        .unwrap_err();
    assert_eq!(err.unsatisfied_predicate(), Some(Predicate::Attached));
    assert!(err.to_string().contains("1000ms"), "{}", err);
}

#[tokio::test(start_paused = true)]
async fn test_network_idle_waits_for_pending_timers() {
    let (_browser, page) = open(fixtures::ajax_demo()).await;
    let started = Instant::now();
    page.goto(
        fixtures::AJAX_URL,
        Some(GotoOptions::new().wait_until(WaitUntil::NetworkIdle)),
    )
    .await
    .unwrap();
    assert!(started.elapsed() >= autowait::NETWORK_IDLE);

    page.get_by_text(AJAX_BUTTON).click(None).await.unwrap();
    assert_eq!(page.pending_timers(), 1);
    let clicked = Instant::now();
    page.wait_for_load_state(Some(LoadState::NetworkIdle))
        .await
        .unwrap();
    assert!(clicked.elapsed() >= fixtures::AJAX_DELAY);
    assert_eq!(page.locator(".bg-success").count().await.unwrap(), 1);
}

// ============================================================================
// Actionability
// ============================================================================

const OBSCURED: &str = "<button id='b'>Save</button>\
    <div id='overlay' style='position:fixed;left:0;top:0;width:1280px;height:720px;z-index:10'></div>";

#[tokio::test(start_paused = true)]
async fn test_click_waits_for_overlay_to_go_away() {
    let (_browser, page) = page_with(OBSCURED).await;
    track_clicks(&page, "b");
    page.evaluate(|doc| {
        doc.set_timeout(Duration::from_secs(2), |doc| {
            if let Some(overlay) = doc.get_element_by_id("overlay") {
                doc.remove(overlay);
            }
        })
    })
    .unwrap();

    let started = Instant::now();
    page.locator("#b").click(None).await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(
        page.locator("#b").get_attribute("data-clicked").await.unwrap().as_deref(),
        Some("1")
    );
}

#[tokio::test(start_paused = true)]
async fn test_obscured_click_times_out_naming_interceptor() {
    let (_browser, page) = page_with(OBSCURED).await;
    let err = page
        .locator("#b")
        .click(Some(ClickOptions::builder().timeout(1000.0).build()))
        .await
        .unwrap_err();
    assert_eq!(err.unsatisfied_predicate(), Some(Predicate::ReceivesEvents));
    let message = err.to_string();
    assert!(message.starts_with("click: Timeout 1000ms exceeded"), "{}", message);
    assert!(message.contains("intercepts pointer events"), "{}", message);
}

#[tokio::test(start_paused = true)]
async fn test_force_and_trial() {
    let (_browser, page) = page_with(OBSCURED).await;
    track_clicks(&page, "b");
    let button = page.locator("#b");

    // A trial run performs the checks only, so it still waits for the overlay.
    let err = button
        .click(Some(
            ClickOptions::builder().trial(true).timeout(500.0).build(),
        ))
        .await
        .unwrap_err();
    assert!(err.is_timeout());

    button
        .click(Some(ClickOptions::builder().force(true).build()))
        .await
        .unwrap();
    assert_eq!(
        button.get_attribute("data-clicked").await.unwrap().as_deref(),
        Some("1")
    );
}

#[tokio::test(start_paused = true)]
async fn test_hidden_element_never_becomes_visible() {
    let (_browser, page) = page_with("<button id='b' style='display:none'>Go</button>").await;
    let err = page
        .locator("#b")
        .click(Some(ClickOptions::builder().timeout(500.0).build()))
        .await
        .unwrap_err();
    assert_eq!(err.unsatisfied_predicate(), Some(Predicate::Visible));
}

#[tokio::test(start_paused = true)]
async fn test_click_waits_for_animation_to_settle() {
    let (_browser, page) = page_with("<button id='b'>Go</button>").await;
    track_clicks(&page, "b");
    let button = page.locator("#b");
    let before = button.bounding_box().await.unwrap().unwrap();
    page.evaluate(|doc| {
        let b = doc.get_element_by_id("b").unwrap();
        doc.start_transition(b, 200.0, 0.0, Duration::from_millis(300))
    })
    .unwrap()
    .unwrap();

    let started = Instant::now();
    button.click(None).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(300));
    let after = button.bounding_box().await.unwrap().unwrap();
    assert_eq!(after.x, before.x + 200.0);
    assert_eq!(
        button.get_attribute("data-clicked").await.unwrap().as_deref(),
        Some("1")
    );
}

#[tokio::test(start_paused = true)]
async fn test_click_waits_for_enabled() {
    let (_browser, page) = page_with("<button id='b' disabled>Go</button>").await;
    track_clicks(&page, "b");
    let button = page.locator("#b");
    assert!(button.is_disabled().await.unwrap());

    let err = button
        .click(Some(ClickOptions::builder().timeout(500.0).build()))
        .await
        .unwrap_err();
    assert_eq!(err.unsatisfied_predicate(), Some(Predicate::Enabled));

    page.evaluate(|doc| {
        doc.set_timeout(Duration::from_secs(1), |doc| {
            if let Some(b) = doc.get_element_by_id("b") {
                let _ = doc.remove_attribute(b, "disabled");
            }
        })
    })
    .unwrap();
    button.click(None).await.unwrap();
    assert_eq!(
        button.get_attribute("data-clicked").await.unwrap().as_deref(),
        Some("1")
    );
}

#[tokio::test(start_paused = true)]
async fn test_fill_waits_for_editable() {
    let (_browser, page) = page_with("<input id='name' readonly value='x'>").await;
    let input = page.locator("#name");
    assert!(!input.is_editable().await.unwrap());

    page.evaluate(|doc| {
        doc.set_timeout(Duration::from_millis(800), |doc| {
            if let Some(input) = doc.get_element_by_id("name") {
                let _ = doc.remove_attribute(input, "readonly");
            }
        })
    })
    .unwrap();
    input.fill("Jane Doe", None).await.unwrap();
    assert_eq!(input.input_value().await.unwrap(), "Jane Doe");
}

#[tokio::test(start_paused = true)]
async fn test_fill_rejects_non_editable_immediately() {
    let (_browser, page) = page_with("<div id='d'>text</div>").await;
    let started = Instant::now();
    let err = page
        .locator("#d")
        .fill("x", Some(FillOptions::builder().timeout(5000.0).build()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotEditable { .. }));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_strict_mode_violation_is_not_retried() {
    let (_browser, page) = page_with("<button>One</button><button>Two</button>").await;
    let err = page.locator("button").click(None).await.unwrap_err();
    match err {
        Error::StrictModeViolation { count, .. } => assert_eq!(count, 2),
        other => panic!("expected strict mode violation, got {other}"),
    }
    page.locator("button").last().click(None).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_nth_out_of_range_waits_for_attached() {
    let (_browser, page) = page_with("<p>one</p><p>two</p><p>three</p>").await;
    let sixth = page.locator("p").nth(5);

    assert_eq!(sixth.count().await.unwrap(), 0);
    assert!(sixth.all_text_contents().await.unwrap().is_empty());

    let err = sixth
        .click(Some(ClickOptions::builder().timeout(500.0).build()))
        .await
        .unwrap_err();
    assert_eq!(err.unsatisfied_predicate(), Some(Predicate::Attached));
    let message = err.to_string();
    assert!(message.contains("p >> nth=5"), "{}", message);
    assert!(
        message.contains("nth=5 is out of range, locator resolved to 3 elements"),
        "{}",
        message
    );

    // The page default bounds reads the same way.
    page.set_default_timeout(500.0);
    let err = sixth.text_content().await.unwrap_err();
    assert_eq!(err.unsatisfied_predicate(), Some(Predicate::Attached));
}

#[tokio::test(start_paused = true)]
async fn test_element_attached_late_is_acted_on() {
    let (_browser, page) = page_with("<div id='root'></div>").await;
    page.evaluate(|doc| {
        doc.set_timeout(Duration::from_secs(3), |doc| {
            if let Some(root) = doc.get_element_by_id("root") {
                let _ = doc.append_html(root, "<input id='late' placeholder='Late'>");
            }
        })
    })
    .unwrap();

    let late = page.get_by_placeholder("Late");
    late.fill("arrived", None).await.unwrap();
    expect(late).to_have_value("arrived").await.unwrap();
}
