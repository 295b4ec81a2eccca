// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Engine objects
//
// Browser -> BrowserContext -> Page -> Frame is the ownership chain; Locator
// is a cheap handle that refers back to its Frame. Actionability and the
// timeout settings are the two mechanisms every locator call goes through.

pub mod action_options;
pub mod actionability;
pub mod browser;
pub mod browser_context;
pub mod browser_type;
pub mod click;
pub mod frame;
pub mod locator;
pub mod page;
pub mod playwright;
pub mod select_option;
pub mod timeout_settings;

pub use action_options::{
    CheckOptions, FillOptions, HoverOptions, PressOptions, SelectOptions, WaitForOptions,
    WaitForState,
};
pub use actionability::{ActionKind, Predicate};
pub use browser::Browser;
pub use browser_context::{BrowserContext, BrowserContextOptions, BrowserContextOptionsBuilder};
pub use browser_type::BrowserType;
pub use click::{ClickOptions, MouseButton, Position};
pub use frame::Frame;
pub use locator::{FilterOptions, Locator, RoleOptions};
pub use page::{GotoOptions, LoadState, Page, Response, WaitUntil};
pub use playwright::Playwright;
pub use select_option::SelectOption;
pub use timeout_settings::{Deadline, TimeoutScope, TimeoutSettings};
