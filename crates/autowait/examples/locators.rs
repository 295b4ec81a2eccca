// Locators example - find elements the way a user would
//
// Shows: CSS and text selectors, get_by_* locators, parent filtering,
// re-used locators and value extraction on the form layouts app.

use autowait::{expect, fixtures, FilterOptions, Playwright, RoleOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let playwright = Playwright::launch(fixtures::form_layouts());
    let browser = playwright.chromium().launch().await?;
    let page = browser.new_page().await?;

    page.goto(fixtures::FORMS_APP_URL, None).await?;
    page.get_by_text("Forms").click(None).await?;
    page.get_by_text("Form Layouts").click(None).await?;

    // Selector syntax
    println!("inputs: {}", page.locator("input").count().await?);
    println!(
        "email placeholders: {}",
        page.locator(r#"input[placeholder="Email"][nbinput]"#).count().await?
    );
    println!(
        ":text-is: {:?}",
        page.locator(r#":text-is("Using the Grid")"#).text_content().await?
    );

    // User-facing locators
    page.get_by_role("textbox", Some(RoleOptions::new().name("Email")))
        .first()
        .click(None)
        .await?;
    page.get_by_placeholder("Jane Doe").fill("Jane Doe", None).await?;

    // Parent filtering and re-use
    let basic_form = page
        .locator("nb-card")
        .filter(FilterOptions::new().has_text("Basic form"));
    let email = basic_form.get_by_role("textbox", Some(RoleOptions::new().name("Email")));
    let password = basic_form.get_by_role("textbox", Some(RoleOptions::new().name("Password")));
    email.fill("johndoe@example.com", None).await?;
    password.fill("12345", None).await?;
    basic_form.locator("nb-checkbox").click(None).await?;
    basic_form
        .get_by_role("button", Some(RoleOptions::new().name("Submit")))
        .click(None)
        .await?;

    expect(email.clone()).to_have_value("johndoe@example.com").await?;
    expect(basic_form.locator("nb-checkbox .custom-checkbox"))
        .to_have_class_regex("checked")
        .await?;

    // Extracting values
    println!("radios: {:?}", page.locator("nb-radio").all_text_contents().await?);
    println!("email value: {}", email.input_value().await?);
    println!("email placeholder: {:?}", email.get_attribute("placeholder").await?);

    browser.close().await?;
    Ok(())
}
