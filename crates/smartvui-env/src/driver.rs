//! The environment boundary.
//!
//! Everything the composables observe about a browser — media queries,
//! navigator facts, page and visual-viewport geometry, frame/timeout
//! scheduling, the root-element side channel — goes through the `Env`
//! trait. A real embedding supplies a driver backed by actual browser
//! APIs; tests and the demo use [`crate::sim::SimEnv`]. With no driver
//! installed the composables take the deterministic server-side path.

use std::rc::Rc;

use web_time::Duration;

/// Media features the detectors subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaFeature {
    PointerFine,
    PointerCoarse,
    PointerNone,
    Hover,
    DisplayStandalone,
    PrefersDark,
}

impl MediaFeature {
    /// The CSS media query this feature stands for.
    pub fn css_query(self) -> &'static str {
        match self {
            MediaFeature::PointerFine => "screen and (any-pointer: fine)",
            MediaFeature::PointerCoarse => "screen and (any-pointer: coarse)",
            MediaFeature::PointerNone => "screen and (any-pointer: none)",
            MediaFeature::Hover => "screen and (any-hover: hover)",
            MediaFeature::DisplayStandalone => "screen and (display-mode: standalone)",
            MediaFeature::PrefersDark => "screen and (prefers-color-scheme: dark)",
        }
    }
}

/// Event sources the screen tracker listens on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvEventSource {
    Resize,
    Scroll,
    OrientationChange,
    ViewportResize,
    ViewportScroll,
    /// Virtual-keyboard geometry changes; only delivered when the API exists.
    KeyboardGeometry,
    FocusIn,
    FocusOut,
    /// Resize-observer notifications for the root document element.
    RootResize,
}

/// Navigator facts read once per mount group.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    pub user_agent: String,
    pub vendor: Option<String>,
    pub max_touch_points: Option<u32>,
    /// Whether a user-agent-data object is present (Chromium family).
    pub has_user_agent_data: bool,
    /// Legacy `navigator.standalone` flag (iOS home-screen apps).
    pub legacy_standalone: bool,
}

/// Layout-viewport and page metrics, one synchronous read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageMetrics {
    pub inner_width: f64,
    pub inner_height: f64,
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

/// Visual-viewport metrics; absent when the API is missing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    pub width: f64,
    pub height: f64,
    pub offset_left: f64,
    pub offset_top: f64,
    pub page_left: f64,
    pub page_top: f64,
    pub scale: f64,
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            offset_left: 0.0,
            offset_top: 0.0,
            page_left: 0.0,
            page_top: 0.0,
            scale: 1.0,
        }
    }
}

/// Opaque element handle, driver-scoped.
pub type ElementId = u64;

/// Facts about the element a focus event targeted, resolved by the driver
/// so the composables never query the DOM themselves.
#[derive(Clone, Debug)]
pub struct FocusTarget {
    pub element: ElementId,
    pub editable: bool,
    /// Element (or ancestor) opted out via the no-focus-fix marker.
    pub no_focus_fix: bool,
    /// Inside a screen-anchored container marker.
    pub screen_anchored: bool,
    /// Inside a dialog/popover or a fixed-position ancestor.
    pub fixed_or_popover_ancestor: bool,
    pub input_type: Option<String>,
    pub input_mode: Option<String>,
}

/// Payload delivered to event listeners.
#[derive(Clone, Debug)]
pub enum EnvEvent {
    /// Geometry-affecting event with no payload.
    Changed,
    /// Focus moved into or out of `FocusTarget`.
    Focus(FocusTarget),
}

/// Listener registration handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Scheduled frame/timeout handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// Driver for one browser-like execution environment.
///
/// Single-threaded: listeners fire synchronously on the caller's thread and
/// may re-enter the driver (subscribe, scroll, schedule).
pub trait Env {
    fn media_matches(&self, feature: MediaFeature) -> bool;
    fn subscribe_media(&self, feature: MediaFeature, on_change: Rc<dyn Fn(bool)>) -> ListenerId;
    fn subscribe_event(&self, source: EnvEventSource, on_event: Rc<dyn Fn(&EnvEvent)>)
    -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);

    fn navigator(&self) -> Navigator;
    fn page_metrics(&self) -> PageMetrics;
    fn visual_viewport(&self) -> Option<ViewportMetrics>;
    /// Whether the virtual-keyboard geometry API exists.
    fn has_virtual_keyboard(&self) -> bool {
        false
    }

    fn scroll_to(&self, x: f64, y: f64);
    fn scroll_by(&self, dx: f64, dy: f64);

    /// Dataset attribute on the root element; `None` removes it.
    fn set_root_flag(&self, name: &str, value: Option<&str>);
    /// CSS custom property on the root element; `None` removes it.
    fn set_root_var(&self, name: &str, value: Option<&str>);

    /// Whether a frame-scheduling primitive is available.
    fn supports_frames(&self) -> bool {
        true
    }
    fn request_frame(&self, cb: Box<dyn FnOnce()>) -> TaskId;
    fn set_timeout(&self, delay: Duration, cb: Box<dyn FnOnce()>) -> TaskId;
    fn cancel_task(&self, id: TaskId);

    fn active_element(&self) -> Option<ElementId>;
    /// Create the throwaway input used by the iOS focus fix.
    fn create_focus_decoy(&self, input_type: Option<&str>, input_mode: Option<&str>) -> ElementId;
    fn focus_element(&self, id: ElementId);
    fn remove_element(&self, id: ElementId);
}
