// Text matching shared by selectors, semantic locators and filters

use regex::Regex;

/// How a piece of text is matched against an element's text.
///
/// Strings convert into [`TextMatch::Substring`], which is how Playwright
/// treats `getByText("...")`, `hasText` and `:text(...)`: whitespace is
/// normalised and the comparison ignores case.
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Case-insensitive substring match after whitespace normalisation
    Substring(String),
    /// Case-sensitive full-string match after whitespace normalisation
    Exact(String),
    /// Regular expression searched in the normalised text
    Regex(Regex),
}

impl TextMatch {
    /// Builds a matcher, exact or substring depending on `exact`.
    pub fn new(text: impl Into<String>, exact: bool) -> Self {
        if exact {
            TextMatch::Exact(text.into())
        } else {
            TextMatch::Substring(text.into())
        }
    }

    /// Builds a regex matcher.
    pub fn regex(pattern: &str) -> crate::Result<Self> {
        Regex::new(pattern)
            .map(TextMatch::Regex)
            .map_err(|e| crate::Error::InvalidArgument(format!("Invalid regex: {}", e)))
    }

    /// Tests `haystack` against this matcher.
    pub fn matches(&self, haystack: &str) -> bool {
        let haystack = normalize_whitespace(haystack);
        match self {
            TextMatch::Substring(needle) => haystack
                .to_lowercase()
                .contains(&normalize_whitespace(needle).to_lowercase()),
            TextMatch::Exact(expected) => haystack == normalize_whitespace(expected),
            TextMatch::Regex(re) => re.is_match(&haystack),
        }
    }

    /// Renders the matcher the way Playwright prints it in selectors.
    pub(crate) fn describe(&self) -> String {
        match self {
            TextMatch::Substring(text) => format!("{:?}i", text),
            TextMatch::Exact(text) => format!("{:?}s", text),
            TextMatch::Regex(re) => format!("/{}/", re.as_str()),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(text: &str) -> Self {
        TextMatch::Substring(text.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(text: String) -> Self {
        TextMatch::Substring(text)
    }
}

impl From<Regex> for TextMatch {
    fn from(re: Regex) -> Self {
        TextMatch::Regex(re)
    }
}

/// Collapses runs of whitespace into single spaces and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_ignores_case_and_spacing() {
        let m = TextMatch::from("basic   FORM");
        assert!(m.matches("  Basic form\n  Email "));
        assert!(!m.matches("Inline form"));
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let m = TextMatch::new("Using the Grid", true);
        assert!(m.matches(" Using  the Grid "));
        assert!(!m.matches("using the grid"));
        assert!(!m.matches("Using the Grid layout"));
    }

    #[test]
    fn test_regex() {
        let m = TextMatch::regex("^Option \\d$").unwrap();
        assert!(m.matches("Option 1"));
        assert!(!m.matches("Disabled Option"));
        assert!(TextMatch::regex("(").is_err());
    }
}
