//! # Environment boundary
//!
//! The composables in `smartvui` never touch browser APIs directly; they go
//! through the [`Env`] driver installed for the current execution context.
//! An embedding installs its driver once with [`set_env`] before mounting
//! anything; with no driver installed every composable takes the
//! deterministic server-rendering path.
//!
//! ```rust
//! use smartvui_env::{set_env, clear_env, is_interactive, sim::SimEnv};
//!
//! assert!(!is_interactive());
//! let env = SimEnv::desktop();
//! set_env(env);
//! assert!(is_interactive());
//! clear_env();
//! ```
//!
//! [`sim::SimEnv`] is a fully scripted in-memory driver: tests and demos
//! mutate its media/geometry state, dispatch events, and pump its frame and
//! timeout queues by hand.

pub mod ambient;
pub mod driver;
pub mod sim;
pub mod tests;
pub mod throttle;

pub use ambient::*;
pub use driver::*;
pub use throttle::*;
