// Click options and related types
//
// Configuration for click, dblclick and tap, matching Playwright's option names.

use super::action_options::action_options;
use serde::{Deserialize, Serialize};

/// Mouse button for click actions
///
/// # Example
///
/// ```ignore
/// use autowait::protocol::click::MouseButton;
///
/// let button = MouseButton::Right;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Left mouse button (default)
    #[default]
    Left,
    /// Right mouse button, dispatches `contextmenu`
    Right,
    /// Middle mouse button, dispatches `auxclick`
    Middle,
}

/// Position for click actions
///
/// Coordinates are relative to the top-left corner of the element's box.
/// The position is also the point that is hit-tested for `ReceivesEvents`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

action_options! {
    /// Options for `click()`, `dblclick()` and `tap()`.
    ///
    /// ```ignore
    /// use autowait::protocol::click::{ClickOptions, MouseButton};
    ///
    /// // Right-click
    /// let options = ClickOptions::builder().button(MouseButton::Right).build();
    ///
    /// // Skip actionability checks except attachment
    /// let options = ClickOptions::builder().force(true).build();
    ///
    /// // Run the checks only
    /// let options = ClickOptions::builder().trial(true).timeout(1000.0).build();
    /// ```
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-click>
    ClickOptions / ClickOptionsBuilder {
        /// Mouse button to press
        button: MouseButton,
        /// Number of clicks dispatched in a row
        click_count: u32,
        /// Skip every check but attachment
        force: bool,
        /// Point to click, relative to the element's top-left corner
        position: Position,
        /// Run the checks without clicking
        trial: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_mouse_button_serialization() {
        assert_eq!(
            serde_json::to_string(&MouseButton::Left).unwrap(),
            "\"left\""
        );
        assert_eq!(
            serde_json::from_str::<MouseButton>("\"middle\"").unwrap(),
            MouseButton::Middle
        );
    }

    #[test]
    fn test_builder_multiple_options() {
        let options = ClickOptions::builder()
            .button(MouseButton::Right)
            .position(Position { x: 5.0, y: 10.0 })
            .force(true)
            .timeout(3000.0)
            .build();

        assert_eq!(options.button, Some(MouseButton::Right));
        assert_eq!(options.position, Some(Position { x: 5.0, y: 10.0 }));
        assert_eq!(options.force, Some(true));
        assert_eq!(options.timeout_override(), Some(Duration::from_secs(3)));
        assert_eq!(options.trial, None);
    }

    #[test]
    fn test_zero_timeout_is_kept_as_unbounded_marker() {
        let options = ClickOptions::builder().timeout(0.0).build();
        assert_eq!(options.timeout_override(), Some(Duration::ZERO));
        assert_eq!(ClickOptions::default().timeout_override(), None);
    }
}
