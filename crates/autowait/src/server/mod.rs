//! In-process stand-in for the browser and the network
//!
//! Pages are served from a [`WebApp`] registry instead of over HTTP, and
//! timers scheduled by page listeners run on the tokio runtime through a
//! per-page [`TimerQueue`](timers::TimerQueue).

pub mod fixtures;
pub(crate) mod timers;
pub mod web_app;

pub use web_app::{PageFixture, SetupFn, WebApp};
