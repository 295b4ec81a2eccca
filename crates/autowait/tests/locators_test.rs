// Integration tests for locators against the form layouts app
//
// Tests cover:
// - CSS and text pseudo-class syntax
// - User-facing locators (role, label, placeholder, text, title)
// - Child locators, nth, parent filtering with has / has_text / filter
// - Re-used locators filling a form
// - Extracting text, values and attributes

mod common;

use autowait::{
    expect, expect_value, fixtures, FilterOptions, Locator, Page, RoleOptions, TestInfo,
};
use common::open;

/// Opens the app and walks the sidebar to Forms > Form Layouts.
async fn form_layouts_page() -> Page {
    let (_browser, page) = open(fixtures::form_layouts()).await;
    page.goto(fixtures::FORMS_APP_URL, None).await.unwrap();
    page.get_by_text("Forms").click(None).await.unwrap();
    page.get_by_text("Form Layouts").click(None).await.unwrap();
    page
}

fn basic_form(page: &Page) -> Locator {
    page.locator("nb-card")
        .filter(FilterOptions::new().has_text("Basic form"))
}

#[tokio::test(start_paused = true)]
async fn test_locator_syntax() {
    let page = form_layouts_page().await;

    assert_eq!(page.locator("input").count().await.unwrap(), 20);
    assert_eq!(page.locator("#inputEmail1").count().await.unwrap(), 1);
    assert_eq!(page.locator(".shape-rectangle").count().await.unwrap(), 4);
    assert_eq!(
        page.locator(r#"[class="input-full-width size-medium status-basic shape-rectangle nb-transition"]"#)
            .count()
            .await
            .unwrap(),
        4
    );
    assert_eq!(page.locator(r#"[placeholder="Email"]"#).count().await.unwrap(), 5);
    assert_eq!(
        page.locator(r#"input[placeholder="Email"][nbinput]"#)
            .count()
            .await
            .unwrap(),
        5
    );
    assert_eq!(
        page.locator(r#":text("Using")"#).all_text_contents().await.unwrap(),
        vec!["Using the Grid".to_string()]
    );
    assert_eq!(page.locator(r#":text-is("Using the Grid")"#).count().await.unwrap(), 1);
    assert_eq!(page.locator(r#":text-is("Using")"#).count().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_user_facing_locators() {
    let page = form_layouts_page().await;

    let email = page
        .get_by_role("textbox", Some(RoleOptions::new().name("Email")))
        .first();
    email.click(None).await.unwrap();
    expect(email).to_be_focused().await.unwrap();

    page.get_by_role("button", Some(RoleOptions::new().name("Sign in")))
        .first()
        .click(None)
        .await
        .unwrap();

    let labelled = page.get_by_label("Email").first();
    labelled.click(None).await.unwrap();
    assert_eq!(
        labelled.get_attribute("id").await.unwrap().as_deref(),
        Some("inputEmail1")
    );

    page.get_by_placeholder("Jane Doe").click(None).await.unwrap();
    page.get_by_text("Using the Grid").click(None).await.unwrap();

    page.get_by_title("IoT Dashboard").click(None).await.unwrap();
    expect(page.locator(".status-card")).to_have_count(3).await.unwrap();
    assert_eq!(page.locator("nb-card").count().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_child_locators() {
    let page = form_layouts_page().await;

    page.locator(r#"nb-card nb-radio :text-is("Option 1")"#)
        .click(None)
        .await
        .unwrap();
    expect(page.get_by_role("radio", Some(RoleOptions::new().name("Option 1"))))
        .to_be_checked()
        .await
        .unwrap();

    page.locator("nb-card")
        .get_by_role("button", Some(RoleOptions::new().name("Sign in")))
        .first()
        .click(None)
        .await
        .unwrap();

    let fourth = page.locator("nb-card").nth(3).get_by_role("button", None);
    assert_eq!(fourth.text_content().await.unwrap().as_deref(), Some("Submit"));
    fourth.click(None).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_parent_locators() {
    let page = form_layouts_page().await;
    let email = RoleOptions::new().name("Email");

    let by_text = page
        .locator_with("nb-card", FilterOptions::new().has_text("Using the Grid"))
        .get_by_role("textbox", Some(email.clone()));
    by_text.click(None).await.unwrap();

    let by_child = page
        .locator_with(
            "nb-card",
            FilterOptions::new().has(page.locator("#inputEmail1")),
        )
        .get_by_role("textbox", Some(email.clone()));
    assert_eq!(
        by_child.get_attribute("id").await.unwrap(),
        by_text.get_attribute("id").await.unwrap()
    );

    let filtered = basic_form(&page).get_by_role("textbox", Some(email));
    filtered.click(None).await.unwrap();
    assert_eq!(
        filtered.get_attribute("id").await.unwrap().as_deref(),
        Some("exampleInputEmail1")
    );

    // Filters only narrow: a card without the text drops out entirely.
    let none = page
        .locator("nb-card")
        .filter(FilterOptions::new().has_text("Basic form"))
        .filter(FilterOptions::new().has_not_text("Check me out"));
    assert_eq!(none.count().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reusing_locators() {
    let page = form_layouts_page().await;
    let form = basic_form(&page);
    let email = form.get_by_role("textbox", Some(RoleOptions::new().name("Email")));
    let password = form.get_by_role("textbox", Some(RoleOptions::new().name("Password")));
    let submit = form.get_by_role("button", Some(RoleOptions::new().name("Submit")));

    email.fill("johndoe@example.com", None).await.unwrap();
    password.fill("12345", None).await.unwrap();
    form.locator("nb-checkbox").click(None).await.unwrap();
    submit.click(None).await.unwrap();

    expect(email).to_have_value("johndoe@example.com").await.unwrap();
    expect(password).to_have_value("12345").await.unwrap();
    expect(form.locator("nb-checkbox .custom-checkbox"))
        .to_have_class_regex("checked")
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_extracting_values() {
    let page = form_layouts_page().await;
    let form = basic_form(&page);

    let button_text = form
        .get_by_role("button", Some(RoleOptions::new().name("Submit")))
        .text_content()
        .await
        .unwrap();
    expect_value(button_text).to_be_text("Submit").unwrap();

    let radios = page.locator("nb-radio").all_text_contents().await.unwrap();
    expect_value(radios.len()).to_be(3usize).unwrap();
    let radios = expect_value(radios);
    radios.to_contain("Option 1").unwrap();
    radios.to_contain("Option 2").unwrap();
    radios.to_contain("Disabled Option").unwrap();

    let email = form.get_by_role("textbox", Some(RoleOptions::new().name("Email")));
    email.fill("johndoe@example.com", None).await.unwrap();
    expect_value(email.input_value().await.unwrap())
        .to_be("johndoe@example.com")
        .unwrap();
    expect_value(email.get_attribute("placeholder").await.unwrap())
        .to_be_text("Email")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_general_locator_and_soft_assertions() {
    let page = form_layouts_page().await;
    let info = TestInfo::detached("Assertions");

    expect_value(5_i32).to_equal(5_i32).unwrap();

    let button = basic_form(&page).locator("button");
    let text = button.text_content().await.unwrap();
    expect_value(text).to_be_text("Submit").unwrap();

    expect(button.clone()).to_have_text("Submit").await.unwrap();

    // A soft failure is recorded and the test carries on.
    info.expect_soft(button.clone())
        .to_have_text("Submittt")
        .await
        .unwrap();
    button.click(None).await.unwrap();

    assert!(info.has_soft_failures());
    let failures = info.soft_failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("Submittt"), "{}", failures[0]);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_radio_is_reported() {
    let page = form_layouts_page().await;
    let disabled = page.get_by_role(
        "radio",
        Some(RoleOptions::new().name("Disabled Option")),
    );
    expect(disabled.clone()).to_be_disabled().await.unwrap();
    assert_eq!(
        page.get_by_role("radio", Some(RoleOptions::new().disabled(false)))
            .count()
            .await
            .unwrap(),
        2
    );
}
