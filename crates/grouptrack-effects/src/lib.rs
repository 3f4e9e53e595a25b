//! Grouptrack Effects - Handler Layer
//!
//! Implementations of the effect traits defined in `grouptrack-core`:
//!
//! - `HttpPlatformHandler`: live platform client over reqwest
//! - `MockPlatformHandler`: in-memory platform with call recording
//! - `RealTimeHandler` / `SimulatedTimeHandler`: wall clock and test clock
//! - `ShutdownToken`: cancellation flipped by Ctrl-C / SIGTERM or by hand
//! - `EffectSystem`: one value carrying a platform and a clock handler

pub mod cancel;
pub mod platform;
pub mod system;
pub mod time;

pub use cancel::ShutdownToken;
pub use platform::http::HttpPlatformHandler;
pub use platform::mock::{MockCall, MockGroup, MockPlatformHandler};
pub use system::EffectSystem;
pub use time::real::RealTimeHandler;
pub use time::simulated::SimulatedTimeHandler;
