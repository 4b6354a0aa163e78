//! Scripted environment driver.
//!
//! Plays the role a real browser plays for the composables: media-query
//! state, navigator facts, page/viewport geometry, frame and timeout
//! queues, the root-element side channel, and a tiny element registry for
//! the focus-fix path. Tests and the demo drive it manually: mutate state,
//! dispatch events, pump frames, advance time.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use slotmap::{DefaultKey, Key, KeyData, SlotMap};
use web_time::Duration;

use crate::driver::{
    ElementId, Env, EnvEvent, EnvEventSource, FocusTarget, ListenerId, MediaFeature, Navigator,
    PageMetrics, TaskId, ViewportMetrics,
};

enum Sub {
    Media(MediaFeature, Rc<dyn Fn(bool)>),
    Event(EnvEventSource, Rc<dyn Fn(&EnvEvent)>),
}

/// An element known to the simulated document.
#[derive(Clone, Debug, Default)]
pub struct SimElement {
    pub input_type: Option<String>,
    pub input_mode: Option<String>,
    /// Created through `create_focus_decoy`.
    pub decoy: bool,
}

struct SimInner {
    media: HashMap<MediaFeature, bool>,
    subs: SlotMap<DefaultKey, Sub>,
    navigator: Navigator,
    page: PageMetrics,
    viewport: Option<ViewportMetrics>,
    virtual_keyboard: bool,
    frames_supported: bool,
    frames: Vec<(u64, Box<dyn FnOnce()>)>,
    timeouts: Vec<(u64, Duration, Box<dyn FnOnce()>)>,
    next_task: u64,
    root_flags: HashMap<String, String>,
    root_vars: HashMap<String, String>,
    elements: HashMap<ElementId, SimElement>,
    next_element: ElementId,
    active: Option<ElementId>,
    focus_log: Vec<ElementId>,
}

pub struct SimEnv {
    inner: RefCell<SimInner>,
}

impl SimEnv {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            inner: RefCell::new(SimInner {
                media: HashMap::new(),
                subs: SlotMap::new(),
                navigator: Navigator::default(),
                page: PageMetrics::default(),
                viewport: None,
                virtual_keyboard: false,
                frames_supported: true,
                frames: Vec::new(),
                timeouts: Vec::new(),
                next_task: 1,
                root_flags: HashMap::new(),
                root_vars: HashMap::new(),
                elements: HashMap::new(),
                next_element: 1,
                active: None,
                focus_log: Vec::new(),
            }),
        })
    }

    /// A typical desktop session: fine pointer, hover, a vertical scrollbar.
    pub fn desktop() -> Rc<Self> {
        let env = Self::new();
        env.set_media_silent(MediaFeature::PointerFine, true);
        env.set_media_silent(MediaFeature::Hover, true);
        env.set_navigator(Navigator {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Chrome/126.0".into(),
            vendor: Some("Google Inc.".into()),
            max_touch_points: Some(0),
            has_user_agent_data: true,
            legacy_standalone: false,
        });
        env.set_page(PageMetrics {
            inner_width: 1280.0,
            inner_height: 800.0,
            client_width: 1265.0,
            client_height: 800.0,
            scroll_width: 1265.0,
            scroll_height: 2400.0,
            scroll_left: 0.0,
            scroll_top: 0.0,
        });
        env.set_viewport(Some(ViewportMetrics {
            width: 1265.0,
            height: 800.0,
            ..Default::default()
        }));
        env
    }

    // --- scripting -------------------------------------------------------

    /// Set a media query and notify listeners on transition.
    pub fn set_media(&self, feature: MediaFeature, matches: bool) {
        let listeners: Vec<Rc<dyn Fn(bool)>> = {
            let mut inner = self.inner.borrow_mut();
            let prev = inner.media.insert(feature, matches);
            if prev == Some(matches) || (prev.is_none() && !matches) {
                return;
            }
            inner
                .subs
                .values()
                .filter_map(|s| match s {
                    Sub::Media(f, cb) if *f == feature => Some(Rc::clone(cb)),
                    _ => None,
                })
                .collect()
        };
        log::trace!("sim: {:?} -> {}", feature, matches);
        for cb in listeners {
            cb(matches);
        }
    }

    /// Set a media query without dispatching (initial conditions).
    pub fn set_media_silent(&self, feature: MediaFeature, matches: bool) {
        self.inner.borrow_mut().media.insert(feature, matches);
    }

    pub fn set_navigator(&self, navigator: Navigator) {
        self.inner.borrow_mut().navigator = navigator;
    }

    pub fn set_page(&self, page: PageMetrics) {
        self.inner.borrow_mut().page = page;
    }

    pub fn update_page(&self, f: impl FnOnce(&mut PageMetrics)) {
        f(&mut self.inner.borrow_mut().page);
    }

    pub fn set_viewport(&self, viewport: Option<ViewportMetrics>) {
        self.inner.borrow_mut().viewport = viewport;
    }

    pub fn update_viewport(&self, f: impl FnOnce(&mut ViewportMetrics)) {
        let mut inner = self.inner.borrow_mut();
        if let Some(v) = inner.viewport.as_mut() {
            f(v);
        }
    }

    pub fn set_virtual_keyboard_api(&self, present: bool) {
        self.inner.borrow_mut().virtual_keyboard = present;
    }

    pub fn set_frames_supported(&self, supported: bool) {
        self.inner.borrow_mut().frames_supported = supported;
    }

    /// Fire a payload-free event (resize, scroll, orientation, ...).
    pub fn dispatch(&self, source: EnvEventSource) {
        self.dispatch_event(source, &EnvEvent::Changed);
    }

    /// Focus moves into `target`; the element becomes active.
    pub fn focus_in(&self, target: FocusTarget) {
        self.inner.borrow_mut().active = Some(target.element);
        self.dispatch_event(EnvEventSource::FocusIn, &EnvEvent::Focus(target));
    }

    pub fn focus_out(&self, target: FocusTarget) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.active == Some(target.element) {
                inner.active = None;
            }
        }
        self.dispatch_event(EnvEventSource::FocusOut, &EnvEvent::Focus(target));
    }

    fn dispatch_event(&self, source: EnvEventSource, event: &EnvEvent) {
        let listeners: Vec<Rc<dyn Fn(&EnvEvent)>> = self
            .inner
            .borrow()
            .subs
            .values()
            .filter_map(|s| match s {
                Sub::Event(src, cb) if *src == source => Some(Rc::clone(cb)),
                _ => None,
            })
            .collect();
        for cb in listeners {
            cb(event);
        }
    }

    /// Run the currently queued animation frames. Frames scheduled while
    /// draining wait for the next call.
    pub fn run_frames(&self) {
        let frames = std::mem::take(&mut self.inner.borrow_mut().frames);
        for (_, cb) in frames {
            cb();
        }
    }

    /// Advance simulated time, running timeouts that come due in order.
    pub fn advance(&self, delta: Duration) {
        let due: Vec<Box<dyn FnOnce()>> = {
            let mut inner = self.inner.borrow_mut();
            let mut due = Vec::new();
            let mut remaining = Vec::new();
            for (id, left, cb) in std::mem::take(&mut inner.timeouts) {
                if left <= delta {
                    due.push(cb);
                } else {
                    remaining.push((id, left - delta, cb));
                }
            }
            inner.timeouts = remaining;
            due
        };
        for cb in due {
            cb();
        }
    }

    pub fn add_element(&self, element: SimElement) -> ElementId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_element;
        inner.next_element += 1;
        inner.elements.insert(id, element);
        id
    }

    // --- inspection ------------------------------------------------------

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().subs.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    pub fn pending_timeouts(&self) -> usize {
        self.inner.borrow().timeouts.len()
    }

    pub fn root_flag(&self, name: &str) -> Option<String> {
        self.inner.borrow().root_flags.get(name).cloned()
    }

    pub fn root_var(&self, name: &str) -> Option<String> {
        self.inner.borrow().root_vars.get(name).cloned()
    }

    pub fn page(&self) -> PageMetrics {
        self.inner.borrow().page
    }

    pub fn element(&self, id: ElementId) -> Option<SimElement> {
        self.inner.borrow().elements.get(&id).cloned()
    }

    /// Every decoy element currently in the document.
    pub fn decoys(&self) -> Vec<ElementId> {
        let inner = self.inner.borrow();
        let mut ids: Vec<ElementId> = inner
            .elements
            .iter()
            .filter(|(_, e)| e.decoy)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Elements focused so far, in order.
    pub fn focus_log(&self) -> Vec<ElementId> {
        self.inner.borrow().focus_log.clone()
    }
}

impl SimEnv {
    fn insert_sub(&self, sub: Sub) -> ListenerId {
        let key = self.inner.borrow_mut().subs.insert(sub);
        ListenerId(key.data().as_ffi())
    }
}

impl Env for SimEnv {
    fn media_matches(&self, feature: MediaFeature) -> bool {
        self.inner.borrow().media.get(&feature).copied().unwrap_or(false)
    }

    fn subscribe_media(&self, feature: MediaFeature, on_change: Rc<dyn Fn(bool)>) -> ListenerId {
        self.insert_sub(Sub::Media(feature, on_change))
    }

    fn subscribe_event(
        &self,
        source: EnvEventSource,
        on_event: Rc<dyn Fn(&EnvEvent)>,
    ) -> ListenerId {
        self.insert_sub(Sub::Event(source, on_event))
    }

    fn unsubscribe(&self, id: ListenerId) {
        let key = DefaultKey::from(KeyData::from_ffi(id.0));
        self.inner.borrow_mut().subs.remove(key);
    }

    fn navigator(&self) -> Navigator {
        self.inner.borrow().navigator.clone()
    }

    fn page_metrics(&self) -> PageMetrics {
        self.inner.borrow().page
    }

    fn visual_viewport(&self) -> Option<ViewportMetrics> {
        self.inner.borrow().viewport
    }

    fn has_virtual_keyboard(&self) -> bool {
        self.inner.borrow().virtual_keyboard
    }

    fn scroll_to(&self, x: f64, y: f64) {
        let mut inner = self.inner.borrow_mut();
        let max_x = (inner.page.scroll_width - inner.page.client_width).max(0.0);
        let max_y = (inner.page.scroll_height - inner.page.client_height).max(0.0);
        inner.page.scroll_left = x.clamp(0.0, max_x);
        inner.page.scroll_top = y.clamp(0.0, max_y);
        let (left, top) = (inner.page.scroll_left, inner.page.scroll_top);
        if let Some(v) = inner.viewport.as_mut() {
            v.page_left = left + v.offset_left;
            v.page_top = top + v.offset_top;
        }
    }

    fn scroll_by(&self, dx: f64, dy: f64) {
        let (x, y) = {
            let inner = self.inner.borrow();
            (inner.page.scroll_left + dx, inner.page.scroll_top + dy)
        };
        self.scroll_to(x, y);
    }

    fn set_root_flag(&self, name: &str, value: Option<&str>) {
        let mut inner = self.inner.borrow_mut();
        match value {
            Some(v) => {
                inner.root_flags.insert(name.to_owned(), v.to_owned());
            }
            None => {
                inner.root_flags.remove(name);
            }
        }
    }

    fn set_root_var(&self, name: &str, value: Option<&str>) {
        let mut inner = self.inner.borrow_mut();
        match value {
            Some(v) => {
                inner.root_vars.insert(name.to_owned(), v.to_owned());
            }
            None => {
                inner.root_vars.remove(name);
            }
        }
    }

    fn supports_frames(&self) -> bool {
        self.inner.borrow().frames_supported
    }

    fn request_frame(&self, cb: Box<dyn FnOnce()>) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_task;
        inner.next_task += 1;
        inner.frames.push((id, cb));
        TaskId(id)
    }

    fn set_timeout(&self, delay: Duration, cb: Box<dyn FnOnce()>) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_task;
        inner.next_task += 1;
        inner.timeouts.push((id, delay, cb));
        TaskId(id)
    }

    fn cancel_task(&self, id: TaskId) {
        let mut inner = self.inner.borrow_mut();
        inner.frames.retain(|(t, _)| *t != id.0);
        inner.timeouts.retain(|(t, _, _)| *t != id.0);
    }

    fn active_element(&self) -> Option<ElementId> {
        self.inner.borrow().active
    }

    fn create_focus_decoy(&self, input_type: Option<&str>, input_mode: Option<&str>) -> ElementId {
        self.add_element(SimElement {
            input_type: input_type.map(str::to_owned),
            input_mode: input_mode.map(str::to_owned),
            decoy: true,
        })
    }

    fn focus_element(&self, id: ElementId) {
        let mut inner = self.inner.borrow_mut();
        if inner.elements.contains_key(&id) {
            inner.active = Some(id);
            inner.focus_log.push(id);
        }
    }

    fn remove_element(&self, id: ElementId) {
        let mut inner = self.inner.borrow_mut();
        inner.elements.remove(&id);
        if inner.active == Some(id) {
            inner.active = None;
        }
    }
}
