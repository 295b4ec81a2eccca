// Error types for autowait

use crate::protocol::actionability::Predicate;
use crate::protocol::timeout_settings::TimeoutScope;
use thiserror::Error;

/// Result type alias for autowait operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving a page
#[derive(Debug, Error)]
pub enum Error {
    /// An action's target never became actionable
    ///
    /// Names the first actionability predicate that was still unsatisfied when
    /// the action timeout elapsed, e.g. `visible` while an element is hidden or
    /// `attached` while nothing matches the locator yet.
    #[error(
        "{action}: Timeout {timeout_ms}ms exceeded waiting for element to be {predicate} [selector: {selector}]{}",
        detail_suffix(.detail)
    )]
    ActionTimeout {
        action: String,
        selector: String,
        predicate: Predicate,
        timeout_ms: u64,
        detail: Option<String>,
    },

    /// A timeout scope other than an action elapsed
    ///
    /// The scope identifies which level of the hierarchy fired: the whole run,
    /// one test, a navigation or a `wait_for` call.
    #[error("{scope} timeout of {timeout_ms}ms exceeded{}", detail_suffix(.context))]
    Timeout {
        scope: TimeoutScope,
        timeout_ms: u64,
        context: Option<String>,
    },

    /// Assertion timeout (expect API)
    ///
    /// `predicate` is `Some(Attached)` when the locator still matched nothing
    /// at the deadline.
    #[error("Assertion timeout: {message}{}", waiting_suffix(.predicate))]
    AssertionTimeout {
        message: String,
        predicate: Option<Predicate>,
    },

    /// Static (non-polling) assertion mismatch
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// A single-element operation matched several elements
    #[error(
        "Strict mode violation: selector '{selector}' resolved to {count} elements. Use first(), last() or nth() to pick one"
    )]
    StrictModeViolation { selector: String, count: usize },

    /// Text input attempted on an element that cannot hold text
    #[error("Element is not an <input>, <textarea>, <select> or [contenteditable] element: <{tag}> [selector: {selector}]")]
    NotEditable { selector: String, tag: String },

    /// Selector could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Navigation could not reach the target
    #[error("Navigation to '{url}' failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    /// Target was closed (context or page)
    ///
    /// Occurs when attempting to perform an operation on a closed target.
    /// The target must be recreated before it can be used again.
    #[error("Target closed: Cannot perform operation on closed {target_type}. {context}")]
    TargetClosed {
        target_type: String,
        context: String,
    },

    /// Invalid argument provided to method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" ({detail})"),
        None => String::new(),
    }
}

fn waiting_suffix(predicate: &Option<Predicate>) -> String {
    match predicate {
        Some(predicate) => format!(" (waiting for element to be {predicate})"),
        None => String::new(),
    }
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns the timeout scope that produced this error, if it is a timeout.
    pub fn timeout_scope(&self) -> Option<TimeoutScope> {
        match self {
            Error::ActionTimeout { .. } => Some(TimeoutScope::Action),
            Error::Timeout { scope, .. } => Some(*scope),
            Error::AssertionTimeout { .. } => Some(TimeoutScope::Assertion),
            Error::Context(_, inner) => inner.timeout_scope(),
            _ => None,
        }
    }

    /// Returns the actionability predicate an action or assertion was still
    /// waiting on.
    pub fn unsatisfied_predicate(&self) -> Option<Predicate> {
        match self {
            Error::ActionTimeout { predicate, .. } => Some(*predicate),
            Error::AssertionTimeout { predicate, .. } => *predicate,
            Error::Context(_, inner) => inner.unsatisfied_predicate(),
            _ => None,
        }
    }

    /// True for every timeout, whatever its scope.
    pub fn is_timeout(&self) -> bool {
        self.timeout_scope().is_some()
    }
}
