// WebApp - in-process registry of fixture pages
//
// Stands in for the network: navigation looks a URL up here and gets back
// the markup to load, how long the "server" takes to answer, and a setup
// hook that installs the page's behaviour (event listeners, timers).
//
// URLs are normalised with the `url` crate before lookup, so
// `http://localhost:4200` and `http://localhost:4200/` are the same page.

use crate::dom::Document;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Setup hook run on a freshly parsed document before it is shown.
pub type SetupFn = Arc<dyn Fn(&mut Document) -> Result<()> + Send + Sync>;

/// One page served by a [`WebApp`].
///
/// # Example
///
/// ```ignore
/// use autowait::{EventType, PageFixture};
///
/// let page = PageFixture::new("<button id='go'>Go</button><div id='out'></div>")
///     .title("Demo")
///     .on_load(|doc| {
///         doc.on("#go", EventType::Click, |cx| {
///             let doc = cx.document();
///             if let Some(out) = doc.get_element_by_id("out") {
///                 let _ = doc.set_text_content(out, "clicked");
///             }
///         })?;
///         Ok(())
///     });
/// ```
#[derive(Clone)]
pub struct PageFixture {
    html: String,
    title: Option<String>,
    latency: Duration,
    setup: Option<SetupFn>,
}

impl PageFixture {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            title: None,
            latency: Duration::ZERO,
            setup: None,
        }
    }

    /// Sets the document title (overrides a `<title>` in the markup).
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Time between the request and the response.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Installs page behaviour after parsing.
    pub fn on_load<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut Document) -> Result<()> + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(setup));
        self
    }

    pub fn get_latency(&self) -> Duration {
        self.latency
    }

    /// Parses the markup and runs the setup hook.
    pub(crate) fn build(&self, url: &str) -> Result<Document> {
        let mut doc = Document::from_html(&self.html);
        doc.set_url(url);
        if let Some(title) = &self.title {
            doc.set_title(title.clone());
        }
        if let Some(setup) = &self.setup {
            setup(&mut doc).map_err(|e| e.context(format!("setting up '{}'", url)))?;
        }
        Ok(doc)
    }
}

impl fmt::Debug for PageFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageFixture")
            .field("title", &self.title)
            .field("latency", &self.latency)
            .field("html_len", &self.html.len())
            .field("has_setup", &self.setup.is_some())
            .finish()
    }
}

/// What a URL resolves to.
#[derive(Debug, Clone)]
pub(crate) enum Route {
    Page(PageFixture),
    /// The host accepts the connection and never answers
    Unreachable,
}

/// Registry of the pages a browser can navigate to.
///
/// ```ignore
/// let app = WebApp::new()
///     .page("https://uitestingplayground.com/ajax", PageFixture::new("..."))
///     .unreachable("https://example.com:81");
/// ```
#[derive(Debug, Clone, Default)]
pub struct WebApp {
    routes: HashMap<String, Route>,
}

impl WebApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `page` at `url`. Unparsable URLs are kept verbatim.
    pub fn page(mut self, url: &str, page: PageFixture) -> Self {
        self.routes.insert(route_key(url), Route::Page(page));
        self
    }

    /// Registers a URL whose server never responds.
    pub fn unreachable(mut self, url: &str) -> Self {
        self.routes.insert(route_key(url), Route::Unreachable);
        self
    }

    /// Merges the routes of `other` into this app.
    pub fn merge(mut self, other: WebApp) -> Self {
        self.routes.extend(other.routes);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Looks `url` up, ignoring its fragment and, as a fallback, its query.
    pub(crate) fn resolve(&self, url: &Url) -> Result<&Route> {
        let mut key = url.clone();
        key.set_fragment(None);
        if let Some(route) = self.routes.get(key.as_str()) {
            return Ok(route);
        }
        key.set_query(None);
        self.routes
            .get(key.as_str())
            .ok_or_else(|| Error::NavigationFailed {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            })
    }
}

fn route_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}
