// Action options for various Locator methods
//
// Provides configuration for fill, press, check, hover, select and wait_for.
// Timeouts are per-call overrides in milliseconds; 0 disables the timeout.

use super::click::Position;

/// Declares an options struct for one family of locator actions together
/// with its builder. Every field is optional; `None` means "use the page
/// default" for the timeout and `false` for the flags.
macro_rules! action_options {
    (
        $(#[$meta:meta])*
        $name:ident / $builder:ident {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: Option<$ty>, )*
            /// Maximum time in milliseconds, 0 disables the timeout
            pub timeout: Option<f64>,
        }

        impl $name {
            /// Create a new builder
            pub fn builder() -> $builder {
                $builder::default()
            }

            pub(crate) fn timeout_override(&self) -> Option<::std::time::Duration> {
                self.timeout
                    .map($crate::protocol::timeout_settings::from_millis)
            }
        }

        #[doc = concat!("Builder for [`", stringify!($name), "`]")]
        #[derive(Debug, Clone, Default)]
        pub struct $builder {
            inner: $name,
        }

        impl $builder {
            $(
                $(#[$field_meta])*
                pub fn $field(mut self, $field: $ty) -> Self {
                    self.inner.$field = Some($field);
                    self
                }
            )*

            /// Set timeout in milliseconds
            pub fn timeout(mut self, timeout: f64) -> Self {
                self.inner.timeout = Some(timeout);
                self
            }

            pub fn build(self) -> $name {
                self.inner
            }
        }
    };
}

pub(crate) use action_options;

action_options! {
    /// Options for `fill()` and `clear()`.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-fill>
    FillOptions / FillOptionsBuilder {
        /// Skip every check but attachment
        force: bool,
    }
}

action_options! {
    /// Options for `press()` and `type_text()`. Only attachment is awaited.
    PressOptions / PressOptionsBuilder {}
}

action_options! {
    /// Options for `check()`, `uncheck()` and `set_checked()`.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-check>
    CheckOptions / CheckOptionsBuilder {
        /// Skip every check but attachment
        force: bool,
        /// Point to click, relative to the element's top-left corner
        position: Position,
        /// Run the checks without toggling
        trial: bool,
    }
}

action_options! {
    /// Options for `hover()`.
    HoverOptions / HoverOptionsBuilder {
        /// Skip every check but attachment
        force: bool,
        /// Point to hover, relative to the element's top-left corner
        position: Position,
        /// Run the checks without moving the pointer
        trial: bool,
    }
}

action_options! {
    /// Options for `select_option()`.
    SelectOptions / SelectOptionsBuilder {
        /// Skip every check but attachment
        force: bool,
    }
}

/// State awaited by [`Locator::wait_for`](crate::protocol::Locator::wait_for).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitForState {
    /// Present in the document
    Attached,
    /// Absent from the document
    Detached,
    /// Present with a non-empty, rendered box (default)
    #[default]
    Visible,
    /// Absent, or present but not visible
    Hidden,
}

impl WaitForState {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            WaitForState::Attached => "attached",
            WaitForState::Detached => "detached",
            WaitForState::Visible => "visible",
            WaitForState::Hidden => "hidden",
        }
    }
}

action_options! {
    /// Options for `wait_for()`.
    ///
    /// ```ignore
    /// locator
    ///     .wait_for(Some(WaitForOptions::builder().state(WaitForState::Attached).build()))
    ///     .await?;
    /// ```
    WaitForOptions / WaitForOptionsBuilder {
        /// State to wait for, `Visible` when unset
        state: WaitForState,
    }
}
