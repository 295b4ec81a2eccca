// Bundled demo applications
//
// Two small sites with just enough behaviour to drive the auto-waiting,
// timeout and locator walkthroughs:
//
// - `ajax_demo()`: a page whose button inserts a `.bg-success` paragraph
//   after a 15 second "request", plus a host that never answers
// - `form_layouts()`: an admin dashboard whose sidebar opens a page of
//   form cards (inline, grid, basic, block, horizontal)

use super::web_app::{PageFixture, WebApp};
use crate::dom::{Document, EventContext, EventType, NodeId};
use crate::error::{Error, Result};
use std::time::Duration;

/// URL of the AJAX demo page.
pub const AJAX_URL: &str = "https://uitestingplayground.com/ajax";
/// A host that accepts connections and never responds.
pub const UNREACHABLE_URL: &str = "https://example.com:81";
/// Delay between clicking the AJAX button and the data showing up.
pub const AJAX_DELAY: Duration = Duration::from_secs(15);
/// Text of the paragraph the AJAX request inserts.
pub const AJAX_SUCCESS_TEXT: &str = "Data loaded with AJAX get request.";

/// Root of the form layouts application.
pub const FORMS_APP_URL: &str = "http://localhost:4200/";
const DASHBOARD_URL: &str = "http://localhost:4200/pages/iot-dashboard";
const FORM_LAYOUTS_URL: &str = "http://localhost:4200/pages/forms/layouts";

const AJAX_PAGE: &str = r#"<title>AJAX Data</title>
<nav class="navbar"><a class="navbar-brand" href="/">UITAP</a></nav>
<section>
<div class="container">
<h3>AJAX Data</h3>
<p>An element may appear on a page after loading data with AJAX request.</p>
<button type="button" class="btn btn-primary" id="ajaxButton">Button Triggering AJAX Request</button>
<i id="spinner" class="fa fa-spinner fa-spin" hidden></i>
<div id="content"></div>
</div>
</section>"#;

/// The AJAX demo plus an unreachable host for navigation timeouts.
///
/// Clicking "Button Triggering AJAX Request" schedules a timer; after
/// [`AJAX_DELAY`] a `<p class="bg-success">` with [`AJAX_SUCCESS_TEXT`] is
/// appended to `#content`.
pub fn ajax_demo() -> WebApp {
    WebApp::new()
        .page(AJAX_URL, PageFixture::new(AJAX_PAGE).on_load(install_ajax_button))
        .unreachable(UNREACHABLE_URL)
}

fn install_ajax_button(doc: &mut Document) -> Result<()> {
    doc.on("#ajaxButton", EventType::Click, |cx| {
        let doc = cx.document();
        if let Some(spinner) = doc.get_element_by_id("spinner") {
            let _ = doc.remove_attribute(spinner, "hidden");
        }
        cx.set_timeout(AJAX_DELAY, |doc| {
            if let Some(spinner) = doc.get_element_by_id("spinner") {
                let _ = doc.set_attribute(spinner, "hidden", "");
            }
            let Some(content) = doc.get_element_by_id("content") else {
                return;
            };
            let markup = format!(r#"<p class="bg-success">{}</p>"#, AJAX_SUCCESS_TEXT);
            if let Err(e) = doc.append_html(content, &markup) {
                tracing::warn!("AJAX response could not be rendered: {}", e);
            }
        });
    })?;
    Ok(())
}

const SHELL: &str = r#"<title>ngx-admin Demo Application</title>
<nb-layout>
<nb-layout-header><a class="logo" href="/pages/dashboard">ngx-admin</a></nb-layout-header>
<nb-sidebar>
<ul class="menu-items">
<li class="menu-item"><a title="IoT Dashboard" href="/pages/iot-dashboard"><span class="menu-title">IoT Dashboard</span></a></li>
<li class="menu-item"><a title="Forms" id="forms-menu"><span class="menu-title">Forms</span></a>
<ul class="menu-items" id="forms-submenu" hidden>
<li class="menu-item"><a title="Form Inputs" href="/pages/forms/inputs"><span class="menu-title">Form Inputs</span></a></li>
<li class="menu-item"><a title="Form Layouts" id="form-layouts-link" href="/pages/forms/layouts"><span class="menu-title">Form Layouts</span></a></li>
<li class="menu-item"><a title="Datepicker" href="/pages/forms/datepicker"><span class="menu-title">Datepicker</span></a></li>
</ul>
</li>
</ul>
</nb-sidebar>
<div class="layout-container"></div>
</nb-layout>"#;

const DASHBOARD: &str = r#"<div class="row">
<section class="status-card"><div class="title">Light</div><div class="status">ON</div></section>
<section class="status-card"><div class="title">Roller Shades</div><div class="status">ON</div></section>
<section class="status-card"><div class="title">Wireless Audio</div><div class="status">ON</div></section>
</div>"#;

// Radios and checkboxes are written without whitespace between tags so each
// widget's text content is exactly its label.
const FORM_LAYOUTS: &str = concat!(
    r#"<div class="row"><div class="col-md-12">"#,
    r#"<nb-card><nb-card-header>Inline form</nb-card-header><nb-card-body>
<form class="form-inline">
<input type="text" nbinput fullwidth placeholder="Jane Doe" class="input-full-width size-medium status-basic shape-rectangle nb-transition">
<input type="text" nbinput fullwidth placeholder="Email" class="input-full-width size-medium status-basic shape-rectangle nb-transition">
<nb-checkbox><label class="label"><input type="checkbox" class="native-input visually-hidden"><span class="custom-checkbox"></span><span class="text">Remember me</span></label></nb-checkbox>
<button type="submit" nbbutton status="primary" class="status-primary">Submit</button>
</form>
</nb-card-body></nb-card>"#,
    r#"</div></div><div class="row"><div class="col-md-6">"#,
    r#"<nb-card><nb-card-header>Using the Grid</nb-card-header><nb-card-body>
<form>
<div class="form-group row"><label for="inputEmail1" class="label col-sm-3 col-form-label">Email</label><div class="col-sm-9"><input type="email" nbinput fullwidth id="inputEmail1" placeholder="Email" class="input-full-width size-medium status-basic shape-rectangle nb-transition"></div></div>
<div class="form-group row"><label for="inputPassword2" class="label col-sm-3 col-form-label">Password</label><div class="col-sm-9"><input type="password" nbinput fullwidth id="inputPassword2" placeholder="Password" class="input-full-width size-medium status-basic shape-rectangle nb-transition"></div></div>
<fieldset class="form-group"><div class="row"><legend class="label col-sm-3">Radios</legend><div class="col-sm-9"><nb-radio-group>"#,
    r#"<nb-radio><label><input type="radio" class="native-input visually-hidden" name="gridRadios" value="option1"><span class="outer-circle"></span><span class="inner-circle"></span><span class="text">Option 1</span></label></nb-radio>"#,
    r#"<nb-radio><label><input type="radio" class="native-input visually-hidden" name="gridRadios" value="option2"><span class="outer-circle"></span><span class="inner-circle"></span><span class="text">Option 2</span></label></nb-radio>"#,
    r#"<nb-radio class="disabled"><label><input type="radio" class="native-input visually-hidden" name="gridRadios" value="option3" disabled><span class="outer-circle"></span><span class="inner-circle"></span><span class="text">Disabled Option</span></label></nb-radio>"#,
    r#"</nb-radio-group></div></div></fieldset>
<div class="form-group row"><div class="offset-sm-3 col-sm-9"><button type="submit" nbbutton status="primary" class="status-primary">Sign in</button></div></div>
</form>
</nb-card-body></nb-card>"#,
    r#"<nb-card><nb-card-header>Form without labels</nb-card-header><nb-card-body>
<form>
<div class="form-group"><input nbinput fullwidth placeholder="Recipients"></div>
<div class="form-group"><input nbinput fullwidth placeholder="Subject"></div>
<div class="form-group"><textarea nbinput fullwidth placeholder="Message"></textarea></div>
<button type="submit" nbbutton status="success" class="status-success">Send</button>
</form>
</nb-card-body></nb-card>"#,
    r#"</div><div class="col-md-6">"#,
    r#"<nb-card><nb-card-header>Basic form</nb-card-header><nb-card-body>
<form>
<div class="form-group"><label for="exampleInputEmail1" class="label">Email address</label><input type="email" nbinput fullwidth id="exampleInputEmail1" placeholder="Email"></div>
<div class="form-group"><label for="exampleInputPassword1" class="label">Password</label><input type="password" nbinput fullwidth id="exampleInputPassword1" placeholder="Password"></div>
<div class="form-group"><nb-checkbox><label class="label"><input type="checkbox" class="native-input visually-hidden"><span class="custom-checkbox"></span><span class="text">Check me out</span></label></nb-checkbox></div>
<button type="submit" nbbutton status="danger" class="status-danger">Submit</button>
</form>
</nb-card-body></nb-card>"#,
    r#"<nb-card><nb-card-header>Block form</nb-card-header><nb-card-body>
<form>
<div class="form-group"><label for="inputFirstName" class="label">First Name</label><input type="text" nbinput fullwidth id="inputFirstName" placeholder="First Name"></div>
<div class="form-group"><label for="inputLastName" class="label">Last Name</label><input type="text" nbinput fullwidth id="inputLastName" placeholder="Last Name"></div>
<div class="form-group"><label for="inputEmail" class="label">Email</label><input type="email" nbinput fullwidth id="inputEmail" placeholder="Email"></div>
<div class="form-group"><label for="inputWebsite" class="label">Website</label><input type="text" nbinput fullwidth id="inputWebsite" placeholder="Website"></div>
<button type="submit" nbbutton class="status-basic">Submit</button>
</form>
</nb-card-body></nb-card>"#,
    r#"</div></div><div class="row"><div class="col-md-12">"#,
    r#"<nb-card><nb-card-header>Horizontal form</nb-card-header><nb-card-body>
<form class="form-horizontal">
<div class="form-group row"><label for="inputEmail3" class="label col-sm-3 form-control-label">Email</label><div class="col-sm-9"><input type="email" nbinput fullwidth id="inputEmail3" placeholder="Email"></div></div>
<div class="form-group row"><label for="inputPassword3" class="label col-sm-3 form-control-label">Password</label><div class="col-sm-9"><input type="password" nbinput fullwidth id="inputPassword3" placeholder="Password"></div></div>
<div class="form-group row"><div class="offset-sm-3 col-sm-9"><nb-checkbox><label class="label"><input type="checkbox" class="native-input visually-hidden"><span class="custom-checkbox"></span><span class="text">Remember me</span></label></nb-checkbox></div></div>
<div class="form-group row"><div class="offset-sm-3 col-sm-9"><button type="submit" nbbutton status="warning" class="status-warning">Sign in</button></div></div>
</form>
</nb-card-body></nb-card>"#,
    r#"</div></div>"#,
);

/// The admin dashboard with its form layouts page.
///
/// The home page shows the IoT dashboard. Clicking "Forms" in the sidebar
/// expands a hidden submenu; clicking "Form Layouts" replaces the main
/// content with six cards, in this order: Inline form, Using the Grid,
/// Form without labels, Basic form, Block form, Horizontal form.
/// Every `nb-checkbox` mirrors its native input onto a `.custom-checkbox`
/// span through the `checked` class.
pub fn form_layouts() -> WebApp {
    let home = PageFixture::new(SHELL).on_load(|doc| {
        install_sidebar(doc)?;
        show_content(doc, DASHBOARD, DASHBOARD_URL)?;
        Ok(())
    });
    let layouts = PageFixture::new(SHELL).on_load(|doc| {
        install_sidebar(doc)?;
        show_form_layouts(doc)
    });
    WebApp::new()
        .page(FORMS_APP_URL, home.clone())
        .page(DASHBOARD_URL, home)
        .page(FORM_LAYOUTS_URL, layouts)
}

fn install_sidebar(doc: &mut Document) -> Result<()> {
    doc.on("#forms-menu", EventType::Click, |cx| {
        let doc = cx.document();
        let Some(submenu) = doc.get_element_by_id("forms-submenu") else {
            return;
        };
        let expanded = !doc
            .element(submenu)
            .is_some_and(|el| el.has_attribute("hidden"));
        let toggled = if expanded {
            doc.set_attribute(submenu, "hidden", "")
        } else {
            doc.remove_attribute(submenu, "hidden")
        };
        if let Err(e) = toggled {
            tracing::warn!("Forms menu could not toggle: {}", e);
        }
    })?;
    doc.on("#form-layouts-link", EventType::Click, |cx| {
        if let Err(e) = show_form_layouts(cx.document()) {
            tracing::warn!("Form layouts could not render: {}", e);
        }
    })?;
    doc.on(r#"a[title="IoT Dashboard"]"#, EventType::Click, |cx| {
        if let Err(e) = show_content(cx.document(), DASHBOARD, DASHBOARD_URL) {
            tracing::warn!("Dashboard could not render: {}", e);
        }
    })?;
    Ok(())
}

fn show_content(doc: &mut Document, markup: &str, url: &str) -> Result<Vec<NodeId>> {
    let container = doc
        .query_selector(".layout-container")?
        .ok_or_else(|| Error::InvalidArgument("page has no .layout-container".to_string()))?;
    let inserted = doc.set_inner_html(container, markup)?;
    doc.set_url(url);
    Ok(inserted)
}

fn show_form_layouts(doc: &mut Document) -> Result<()> {
    show_content(doc, FORM_LAYOUTS, FORM_LAYOUTS_URL)?;
    doc.on(
        r#"nb-checkbox input[type="checkbox"]"#,
        EventType::Change,
        sync_custom_checkbox,
    )?;
    Ok(())
}

fn sync_custom_checkbox(cx: &mut EventContext<'_>) {
    let input = cx.target();
    let doc = cx.document();
    let checked = doc.is_checked(input).unwrap_or(false);
    let Some(label) = doc.parent(input) else {
        return;
    };
    let boxes: Vec<NodeId> = doc
        .element_children(label)
        .into_iter()
        .filter(|n| doc.element(*n).is_some_and(|el| el.has_class("custom-checkbox")))
        .collect();
    for node in boxes {
        let result = if checked {
            doc.add_class(node, "checked")
        } else {
            doc.remove_class(node, "checked")
        };
        if let Err(e) = result {
            tracing::warn!("nb-checkbox state could not sync: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn load(app: &WebApp, url: &str) -> Document {
        match app.resolve(&Url::parse(url).unwrap()).unwrap() {
            super::super::web_app::Route::Page(page) => page.build(url).unwrap(),
            other => panic!("unexpected route {other:?}"),
        }
    }

    #[test]
    fn test_ajax_button_schedules_insertion() {
        let app = ajax_demo();
        let mut doc = load(&app, AJAX_URL);
        assert_eq!(doc.title(), "AJAX Data");
        let button = doc.get_element_by_id("ajaxButton").unwrap();
        doc.click(button, 1);
        let mut timers = doc.take_scheduled();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].delay, AJAX_DELAY);
        assert!(doc.query_selector(".bg-success").unwrap().is_none());

        let timer = timers.remove(0);
        (timer.callback)(&mut doc);
        let success = doc.query_selector(".bg-success").unwrap().unwrap();
        assert_eq!(doc.text_content(success), AJAX_SUCCESS_TEXT);
    }

    #[test]
    fn test_sidebar_opens_form_layouts() {
        let app = form_layouts();
        let mut doc = load(&app, FORMS_APP_URL);
        assert_eq!(doc.url(), DASHBOARD_URL);
        assert!(doc.query_selector("nb-card").unwrap().is_none());

        let forms = doc.query_selector("#forms-menu span").unwrap().unwrap();
        doc.click(forms, 1);
        let submenu = doc.get_element_by_id("forms-submenu").unwrap();
        assert!(!doc.element(submenu).unwrap().has_attribute("hidden"));

        let layouts = doc.query_selector("#form-layouts-link span").unwrap().unwrap();
        doc.click(layouts, 1);
        assert_eq!(doc.url(), FORM_LAYOUTS_URL);
        let headers: Vec<String> = doc
            .query_selector_all("nb-card-header")
            .unwrap()
            .into_iter()
            .map(|h| doc.text_content(h))
            .collect();
        assert_eq!(
            headers,
            [
                "Inline form",
                "Using the Grid",
                "Form without labels",
                "Basic form",
                "Block form",
                "Horizontal form"
            ]
        );
    }

    #[test]
    fn test_nb_checkbox_mirrors_state() {
        let app = form_layouts();
        let mut doc = load(&app, FORM_LAYOUTS_URL);
        let text = doc
            .query_selector_all("nb-checkbox .text")
            .unwrap()
            .into_iter()
            .find(|n| doc.text_content(*n) == "Check me out")
            .unwrap();
        doc.click(text, 1);
        let checkbox = doc.query_selector_all("nb-checkbox .custom-checkbox").unwrap()[1];
        assert!(doc.element(checkbox).unwrap().has_class("checked"));

        let radios: Vec<String> = doc
            .query_selector_all("nb-radio")
            .unwrap()
            .into_iter()
            .map(|n| doc.text_content(n))
            .collect();
        assert_eq!(radios, ["Option 1", "Option 2", "Disabled Option"]);
    }
}
