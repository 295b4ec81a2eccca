// Suite - a described group of tests sharing hooks
//
// Tests and hooks are async closures over `Fixtures`. They are stored boxed
// so suites of differently typed closures can be run by one runner.

use crate::error::Result;
use crate::protocol::{BrowserContext, Page};
use crate::runner::TestInfo;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// What a test or hook receives: its own context and page, plus its
/// TestInfo.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub page: Page,
    pub context: BrowserContext,
    pub info: TestInfo,
}

pub(crate) type TestFn = Arc<dyn Fn(Fixtures) -> BoxFuture<'static, Result<()>> + Send + Sync>;

fn boxed<F, Fut>(f: F) -> TestFn
where
    F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |fixtures| Box::pin(f(fixtures)))
}

#[derive(Clone)]
pub(crate) struct TestCase {
    pub(crate) title: String,
    pub(crate) body: TestFn,
}

/// A group of tests, the counterpart of `test.describe()`.
///
/// # Example
///
/// ```ignore
/// use autowait::{fixtures, Suite};
///
/// let suite = Suite::new("AJAX")
///     .before_each(|t| async move {
///         t.page.goto(fixtures::AJAX_URL, None).await?;
///         Ok(())
///     })
///     .test("shows the label", |t| async move {
///         t.info
///             .expect(t.page.locator("#ajaxButton"))
///             .to_be_visible()
///             .await
///     });
/// ```
#[derive(Clone)]
pub struct Suite {
    name: String,
    before_each: Vec<TestFn>,
    after_each: Vec<TestFn>,
    tests: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_each: Vec::new(),
            after_each: Vec::new(),
            tests: Vec::new(),
        }
    }

    /// Runs `hook` before every test of the suite, counted against the
    /// test's timeout.
    pub fn before_each<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.before_each.push(boxed(hook));
        self
    }

    /// Runs `hook` after every test, whether it passed or not.
    pub fn after_each<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.after_each.push(boxed(hook));
        self
    }

    /// Adds a test.
    pub fn test<F, Fut>(mut self, title: impl Into<String>, body: F) -> Self
    where
        F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.tests.push(TestCase {
            title: title.into(),
            body: boxed(body),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub(crate) fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Hooks and body of one test, in execution order.
    pub(crate) async fn run_test(&self, case: &TestCase, fixtures: Fixtures) -> Result<()> {
        let mut outcome = Ok(());
        for hook in &self.before_each {
            if let Err(e) = hook(fixtures.clone()).await {
                outcome = Err(e.context("before_each"));
                break;
            }
        }
        if outcome.is_ok() {
            outcome = (case.body)(fixtures.clone()).await;
        }
        for hook in &self.after_each {
            let result = hook(fixtures.clone()).await;
            if outcome.is_ok() {
                outcome = result.map_err(|e| e.context("after_each"));
            }
        }
        outcome
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .field(
                "tests",
                &self.tests.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
