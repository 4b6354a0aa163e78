//! # Signals, scopes, and injected options
//!
//! SmartVui's composables share singleton browser-observed state between
//! independent UI instances. This crate holds the framework-free primitives
//! they are built from:
//!
//! - `Signal<T>` — observable value cell with synchronous subscribers.
//! - `Computed<T>` — read-only view recomputed on every `get`.
//! - `Source<T>` — a plain value, a signal, or a getter; how options stay
//!   reactive.
//! - `Scope` — composition context; disposers registered during `run` fire
//!   on `dispose`, which is the unmount hook of every composable.
//! - injected options — "first caller wins" option sharing for a provider
//!   subtree, the plugin-install analog.
//!
//! ## Signals
//!
//! ```rust
//! use smartvui_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## Scopes
//!
//! ```rust
//! use smartvui_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     scoped_effect(|| -> Box<dyn FnOnce()> {
//!         // acquire something...
//!         Box::new(|| { /* ...release it on dispose */ })
//!     });
//! });
//! scope.dispose();
//! ```
//!
//! Everything here is single-threaded: one execution context per rendered
//! page, all mutation synchronous inside listener callbacks.

pub mod options;
pub mod scope;
pub mod signal;
pub mod state;
pub mod tests;

pub use options::*;
pub use scope::*;
pub use signal::*;
pub use state::*;
