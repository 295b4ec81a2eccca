// Select option variants for dropdown selection
//
// Provides different ways to pick an `<option>`: by value, label, or index.

use crate::dom::text::normalize_whitespace;

/// Select option variant
///
/// # Example
///
/// ```ignore
/// use autowait::protocol::SelectOption;
///
/// let opt = SelectOption::Value("option1".to_string());
/// let opt = SelectOption::Label("First Option".to_string());
/// let opt = SelectOption::Index(0);
/// ```
///
/// See: <https://playwright.dev/docs/api/class-locator#locator-select-option>
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOption {
    /// Select by option value attribute
    Value(String),
    /// Select by option label (visible text)
    Label(String),
    /// Select by option index (0-based)
    Index(usize),
}

impl SelectOption {
    /// Whether the option at `index` with `value` and `label` is the one meant.
    pub(crate) fn matches(&self, index: usize, value: &str, label: &str) -> bool {
        match self {
            SelectOption::Value(v) => v == value,
            SelectOption::Label(l) => normalize_whitespace(l) == normalize_whitespace(label),
            SelectOption::Index(i) => *i == index,
        }
    }
}

// Strings select by value
impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        SelectOption::Value(value.to_string())
    }
}

impl From<String> for SelectOption {
    fn from(value: String) -> Self {
        SelectOption::Value(value)
    }
}
