//! # SmartVui composables
//!
//! Reactive trackers for the environment a UI runs in:
//!
//! - [`use_platform`] — pointer/touch/hover capability and OS/browser
//!   identity, from media queries plus a user-agent parse.
//! - [`use_prefers_dark`] — the `prefers-color-scheme: dark` preference,
//!   with per-group overrides.
//! - [`use_screen`] — page/window/viewport measurements, virtual-keyboard
//!   status, and the shared scroll lock.
//! - [`use_render`] — programmatic subtree mounting with scoped teardown.
//!
//! All consumers of a tracker share one singleton state; the underlying
//! environment subscriptions are reference counted, installed on the first
//! mount and removed on the last. Composables must run inside a
//! [`Scope`](smartvui_core::Scope) to take part in that lifecycle; outside
//! one they still return values but never subscribe.
//!
//! ```rust
//! use std::rc::Rc;
//! use smartvui::use_screen;
//! use smartvui_core::Scope;
//! use smartvui_env::{clear_env, set_env, sim::SimEnv};
//!
//! let env = SimEnv::desktop();
//! set_env(env.clone());
//!
//! let scope = Scope::new();
//! let screen = scope.run(|| use_screen(None));
//! assert!(screen.screen_inline_size.get() > 0.0);
//!
//! screen.scroll_lock_requested.set(true);
//! assert!(screen.scroll_locked.get());
//! screen.scroll_lock_requested.set(false);
//!
//! scope.dispose();
//! clear_env();
//! ```
//!
//! With no driver installed (the server-rendering path) every tracker
//! yields deterministic values derived only from supplied options.

pub mod error;
pub mod platform;
pub mod prefers_dark;
pub mod render;
pub mod screen;

pub use error::Error;
pub use platform::{
    AgentPlatform, Platform, PlatformOptions, PlatformState, parse_user_agent, platform_plugin,
    use_platform,
};
pub use prefers_dark::{
    Group, PrefersDark, PrefersDarkOptions, prefers_dark_plugin, use_prefers_dark,
};
pub use render::{Mounted, Render, use_render};
pub use screen::{
    Screen, ScreenOptions, ScreenState, ScrollLockRequest, UnlockClear, screen_plugin, use_screen,
};
