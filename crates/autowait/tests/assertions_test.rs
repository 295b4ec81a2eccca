// Integration tests for polling assertions
//
// Tests cover:
// - Visibility, attachment and count matchers reacting to late changes
// - Text, value, class and attribute matchers (exact, contains, regex)
// - Enabled / disabled, checked / unchecked, editable, focused
// - Negation and the failure message

mod common;

use autowait::{expect, CheckOptions, Error};
use common::page_with;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_visibility_matchers_wait_for_change() {
    let (_browser, page) = page_with("<div id='spinner'>Loading</div>").await;
    page.evaluate(|doc| {
        doc.set_timeout(Duration::from_secs(2), |doc| {
            if let Some(spinner) = doc.get_element_by_id("spinner") {
                let _ = doc.set_attribute(spinner, "style", "display:none");
            }
        })
    })
    .unwrap();

    let spinner = page.locator("#spinner");
    expect(spinner.clone()).to_be_visible().await.unwrap();
    let started = Instant::now();
    expect(spinner.clone()).to_be_hidden().await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(2));

    // Hidden but still in the document
    expect(spinner.clone()).to_be_attached().await.unwrap();
    expect(spinner).not().to_be_visible().await.unwrap();

    // Missing elements count as hidden
    expect(page.locator("#nothing")).to_be_hidden().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_count_follows_appended_rows() {
    let (_browser, page) = page_with("<ul id='list'><li>one</li></ul>").await;
    page.evaluate(|doc| {
        for (delay, text) in [(1, "two"), (2, "three")] {
            doc.set_timeout(Duration::from_secs(delay), move |doc| {
                if let Some(list) = doc.get_element_by_id("list") {
                    let _ = doc.append_html(list, &format!("<li>{}</li>", text));
                }
            });
        }
    })
    .unwrap();

    let rows = page.locator("#list li");
    expect(rows.clone()).to_have_count(3).await.unwrap();
    expect(rows.clone()).not().to_have_count(1).await.unwrap();
    assert_eq!(
        rows.all_text_contents().await.unwrap(),
        vec!["one", "two", "three"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_text_matchers() {
    let (_browser, page) = page_with(
        "<p id='msg'>  Data   loaded with AJAX get request. </p>",
    )
    .await;
    let msg = page.locator("#msg");

    expect(msg.clone())
        .to_have_text("Data loaded with AJAX get request.")
        .await
        .unwrap();
    expect(msg.clone()).to_contain_text("AJAX get").await.unwrap();
    expect(msg.clone()).to_have_text_regex(r"^Data .* request\.$").await.unwrap();
    expect(msg.clone()).to_contain_text_regex(r"AJAX \w+").await.unwrap();

    // to_contain_text is case-sensitive
    let err = expect(msg.clone())
        .with_timeout(Duration::from_millis(300))
        .to_contain_text("ajax get")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AssertionTimeout { .. }));
    expect(msg).not().to_contain_text("ajax get").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_failure_message_shows_received_text() {
    let (_browser, page) = page_with("<button>Submit</button>").await;
    let err = expect(page.locator("button"))
        .with_timeout(Duration::from_secs(1))
        .to_have_text("Submittt")
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("to_have_text"), "{}", message);
    assert!(message.contains("failed after 1000ms"), "{}", message);
    assert!(message.contains("Submit"), "{}", message);
}

#[tokio::test(start_paused = true)]
async fn test_value_class_and_attribute_matchers() {
    let (_browser, page) = page_with(
        "<input id='email' type='email' placeholder='Email' class='input-full-width  status-basic'>",
    )
    .await;
    let email = page.locator("#email");
    email.fill("johndoe@example.com", None).await.unwrap();

    expect(email.clone()).to_have_value("johndoe@example.com").await.unwrap();
    expect(email.clone()).to_have_value_regex(r"@example\.com$").await.unwrap();
    expect(email.clone())
        .to_have_class("input-full-width status-basic")
        .await
        .unwrap();
    expect(email.clone()).to_have_class_regex("status-").await.unwrap();
    expect(email.clone())
        .to_have_attribute("placeholder", "Email")
        .await
        .unwrap();
    expect(email).not().to_have_attribute("placeholder", "Name").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_state_matchers() {
    let (_browser, page) = page_with(
        "<fieldset disabled><input id='inside' type='text'></fieldset>\
         <input id='readonly' type='text' readonly>\
         <label><input id='agree' type='checkbox'>Agree</label>\
         <input id='name' type='text'>",
    )
    .await;

    expect(page.locator("#inside")).to_be_disabled().await.unwrap();
    expect(page.locator("#readonly")).to_be_enabled().await.unwrap();
    expect(page.locator("#readonly")).not().to_be_editable().await.unwrap();
    expect(page.locator("#name")).to_be_editable().await.unwrap();

    let agree = page.get_by_label("Agree");
    expect(agree.clone()).to_be_unchecked().await.unwrap();
    agree.check(Some(CheckOptions::builder().build())).await.unwrap();
    expect(agree.clone()).to_be_checked().await.unwrap();
    agree.uncheck(None).await.unwrap();
    expect(agree).not().to_be_checked().await.unwrap();

    let name = page.locator("#name");
    expect(name.clone()).not().to_be_focused().await.unwrap();
    name.focus().await.unwrap();
    expect(name).to_be_focused().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_negated_matcher_fails_on_missing_element() {
    let (_browser, page) = page_with("<p>here</p>").await;
    let err = expect(page.locator("#gone"))
        .with_timeout(Duration::from_millis(500))
        .not()
        .to_have_text("anything")
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(err.to_string().contains("received <element(s) not found>"), "{}", err);
}
