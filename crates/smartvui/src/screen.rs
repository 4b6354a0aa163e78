//! Screen/viewport tracker.
//!
//! `use_screen` measures the page, window, and visual viewport into one
//! shared [`ScreenState`], throttled on every geometry event, with
//! platform-specific branches: iOS needs a pinch-zoom scale correction and
//! an overscroll convergence loop, Android infers the virtual keyboard from
//! viewport shrinkage, desktop additionally reports scrollbar gutters.
//!
//! It also owns the scroll lock: consumers raise and drop a shared request
//! counter through [`ScrollLockRequest`]; the lock engages whenever the
//! counter leaves zero and releases (draining the unlock queue) when it
//! returns.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use smartvui_core::{Computed, InjectedKey, Signal, Source, current_scope, provide, use_injected};
use smartvui_env::{
    self as env, EnvEvent, EnvEventSource, FocusTarget, ListenerId, TaskId, Throttle,
    ThrottleOptions,
};
use web_time::Duration;

const SCREEN_DEFAULT_WIDTH: f64 = 1280.0;
const SCREEN_DEFAULT_HEIGHT: f64 = 960.0;
// magic experimental value
const IOS_FIX_OVERSCROLL_COUNT_MAX: u32 = 20;
const SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Shared measurement state. All fields are `None` until the first consumer
/// mounts in an interactive environment, and again after the last unmount.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScreenState {
    pub page_inline_size: Option<f64>,
    pub page_block_size: Option<f64>,
    pub screen_inline_size: Option<f64>,
    pub screen_block_size: Option<f64>,
    pub view_inline_size: Option<f64>,
    pub view_block_size: Option<f64>,
    pub view_scale: Option<f64>,
    pub scroll_inline_gutter: Option<f64>,
    pub scroll_block_gutter: Option<f64>,
    pub page_inline_start: Option<f64>,
    pub page_block_start: Option<f64>,
}

struct Work {
    mounted: usize,
    is_ios: bool,
    is_android: bool,
    scroll_count: u32,
    prev_view_scale: f64,
    prev_view_block_size: f64,
    listeners: SmallVec<[ListenerId; 8]>,
    overscroll_frame: Option<TaskId>,
    restore_inline_start: f64,
    restore_block_start: f64,
    restore_inline_scroll: f64,
    restore_block_scroll: f64,
    lock_engaged: bool,
}

impl Default for Work {
    fn default() -> Self {
        Self {
            mounted: 0,
            is_ios: false,
            is_android: false,
            scroll_count: 0,
            prev_view_scale: 1.0,
            prev_view_block_size: 0.0,
            listeners: SmallVec::new(),
            overscroll_frame: None,
            restore_inline_start: 0.0,
            restore_block_start: 0.0,
            restore_inline_scroll: 0.0,
            restore_block_scroll: 0.0,
            lock_engaged: false,
        }
    }
}

thread_local! {
    static STATE: Signal<ScreenState> = Signal::new(ScreenState::default());
    static VIRTUAL_KEYBOARD_OPEN: Signal<bool> = Signal::new(false);
    static LOCK_REQUESTS: Signal<u32> = Signal::new(0);
    static UNLOCK_QUEUE: RefCell<Vec<Rc<dyn Fn()>>> = const { RefCell::new(Vec::new()) };
    static WORK: RefCell<Work> = RefCell::new(Work::default());
    static UPDATE_THROTTLED: Throttle<()> =
        Throttle::new(ThrottleOptions::default(), |_: &()| update_values());
}

fn state() -> Signal<ScreenState> {
    STATE.with(Signal::clone)
}

fn virtual_keyboard_open() -> Signal<bool> {
    VIRTUAL_KEYBOARD_OPEN.with(Signal::clone)
}

fn lock_requests() -> Signal<u32> {
    LOCK_REQUESTS.with(Signal::clone)
}

/// Two-decimal comparison; visual-viewport metrics jitter below that.
fn to_fixed2(v: f64) -> i64 {
    (v * 100.0).round() as i64
}

fn px(v: f64) -> String {
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v}px")
}

fn update_values() {
    let Some(env) = env::env() else {
        return;
    };
    let page = env.page_metrics();
    let viewport = env.visual_viewport();
    let (vp_width, vp_height, vp_offset_left, vp_offset_top, vp_scale) = match viewport {
        Some(v) => (v.width, v.height, v.offset_left, v.offset_top, v.scale),
        None => (0.0, 0.0, 0.0, 0.0, 1.0),
    };

    let (is_ios, is_android) = WORK.with(|w| {
        let w = w.borrow();
        (w.is_ios, w.is_android)
    });

    if is_ios {
        // Pinch zoom changes the reported viewport height without a real
        // layout change; keep the previous baseline and correct by the
        // scale ratio instead.
        let scale_correction = WORK.with(|w| {
            let mut w = w.borrow_mut();
            if to_fixed2(w.prev_view_block_size) == to_fixed2(vp_height)
                && to_fixed2(w.prev_view_scale) != to_fixed2(vp_scale)
            {
                w.prev_view_scale / vp_scale
            } else {
                w.prev_view_block_size = vp_height;
                w.prev_view_scale = vp_scale;
                1.0
            }
        });

        state().set(ScreenState {
            page_inline_size: Some(page.scroll_width),
            page_block_size: Some(page.scroll_height),
            screen_inline_size: Some(page.client_width),
            screen_block_size: Some(page.client_height),
            view_inline_size: Some((vp_width * scale_correction).floor()),
            view_block_size: Some((vp_height * scale_correction).floor()),
            view_scale: Some(vp_scale),
            scroll_inline_gutter: Some(0.0),
            scroll_block_gutter: Some(0.0),
            page_inline_start: Some(page.scroll_left.floor()),
            page_block_start: Some(page.scroll_top.floor()),
        });

        env.set_timeout(SETTLE_DELAY, Box::new(ios_fix_overscroll));
    } else if is_android {
        let view_inline = if vp_width != 0.0 { vp_width } else { page.client_width };
        let view_block = if vp_height != 0.0 { vp_height } else { page.client_height };
        state().set(ScreenState {
            page_inline_size: Some(page.scroll_width),
            page_block_size: Some(page.scroll_height),
            screen_inline_size: Some(page.client_width),
            screen_block_size: Some(page.client_height),
            view_inline_size: Some(view_inline.floor()),
            view_block_size: Some(view_block.floor()),
            view_scale: Some(vp_scale),
            scroll_inline_gutter: Some(0.0),
            scroll_block_gutter: Some(0.0),
            page_inline_start: Some((page.scroll_left + vp_offset_left).floor()),
            page_block_start: Some((page.scroll_top + vp_offset_top).floor()),
        });

        // A viewport much shorter than the screen means the keyboard is up.
        let vk = view_block.floor() * vp_scale < page.client_height * 0.8;
        virtual_keyboard_open().set_if_changed(vk);
    } else {
        let view_inline = if vp_width != 0.0 { vp_width } else { page.client_width };
        let view_block = if vp_height != 0.0 { vp_height } else { page.client_height };
        state().set(ScreenState {
            page_inline_size: Some(page.scroll_width),
            page_block_size: Some(page.scroll_height),
            screen_inline_size: Some(page.inner_width),
            screen_block_size: Some(page.inner_height),
            view_inline_size: Some(view_inline.floor()),
            view_block_size: Some(view_block.floor()),
            view_scale: Some(vp_scale),
            scroll_inline_gutter: Some(page.inner_height - page.client_height),
            scroll_block_gutter: Some(page.inner_width - page.client_width),
            page_inline_start: Some((page.scroll_left + vp_offset_left).floor()),
            page_block_start: Some((page.scroll_top + vp_offset_top).floor()),
        });

        virtual_keyboard_open().set_if_changed(false);
    }
}

/// Converge an iOS rubber-band overscroll back inside page bounds: wait
/// out the bounce frame by frame (bounded), then nudge by half the
/// remaining overflow.
fn ios_fix_overscroll() {
    let Some(env) = env::env() else {
        return;
    };

    WORK.with(|w| {
        let mut w = w.borrow_mut();
        if let Some(task) = w.overscroll_frame.take() {
            env.cancel_task(task);
        }
    });

    let snapshot = state().get();
    let (Some(page_block_size), Some(page_block_start), Some(view_block_size), Some(screen_block_size)) = (
        snapshot.page_block_size,
        snapshot.page_block_start,
        snapshot.view_block_size,
        snapshot.screen_block_size,
    ) else {
        return;
    };
    let vp_offset_top = env.visual_viewport().map_or(0.0, |v| v.offset_top);

    let past_bottom = view_block_size + vp_offset_top.ceil() >= screen_block_size - 1.0
        || view_block_size + page_block_start > page_block_size + 1.0;
    let scroll_correction = if past_bottom {
        Some(f64::min(
            -1.0,
            (page_block_size + 1.0 - page_block_start - view_block_size) / 2.0,
        ))
    } else if page_block_start < 0.0 {
        Some(f64::max(1.0, -page_block_start / 2.0))
    } else {
        None
    };

    if view_block_size < screen_block_size && let Some(correction) = scroll_correction {
        let retry = WORK.with(|w| w.borrow().scroll_count < IOS_FIX_OVERSCROLL_COUNT_MAX);
        if retry {
            let task = env.request_frame(Box::new(|| {
                WORK.with(|w| {
                    let mut w = w.borrow_mut();
                    w.overscroll_frame = None;
                    w.scroll_count = IOS_FIX_OVERSCROLL_COUNT_MAX;
                });
                ios_fix_overscroll();
            }));
            WORK.with(|w| {
                let mut w = w.borrow_mut();
                w.scroll_count += 1;
                w.overscroll_frame = Some(task);
            });
        } else {
            env.scroll_by(0.0, correction);
        }
    } else {
        WORK.with(|w| w.borrow_mut().scroll_count = 0);
    }
}

/// iOS focus fix: focusing an editable inside a fixed/popover/anchored
/// container makes Safari scroll the page to an OS-chosen position. Focus a
/// throwaway input first so the keyboard opens without that scroll, then
/// hand focus back one frame later.
fn ios_on_focusin(target: &FocusTarget) {
    let Some(env) = env::env() else {
        return;
    };
    if !target.editable {
        return;
    }

    virtual_keyboard_open().set(true);
    env.scroll_by(0.0, 0.0);

    if target.no_focus_fix {
        return;
    }
    if !target.screen_anchored && !target.fixed_or_popover_ancestor {
        return;
    }

    let decoy = env.create_focus_decoy(
        Some(target.input_type.as_deref().unwrap_or("text")),
        Some(target.input_mode.as_deref().unwrap_or("")),
    );
    env.focus_element(decoy);

    {
        let env2 = Rc::clone(&env);
        env.request_frame(Box::new(move || env2.focus_element(decoy)));
    }

    let env2 = Rc::clone(&env);
    let real = target.element;
    env.set_timeout(
        SETTLE_DELAY,
        Box::new(move || {
            if env2.active_element() == Some(decoy) {
                env2.focus_element(real);
            }
            env2.remove_element(decoy);
        }),
    );
}

fn ios_on_focusout(target: &FocusTarget) {
    let Some(env) = env::env() else {
        return;
    };
    if target.editable {
        virtual_keyboard_open().set(false);
        env.scroll_by(0.0, 0.0);
    }
}

fn scroll_lock_on() {
    let Some(env) = env::env() else {
        return;
    };
    let engaged = WORK.with(|w| w.borrow().lock_engaged);
    if engaged {
        return;
    }

    let (is_ios, is_android) = WORK.with(|w| {
        let w = w.borrow();
        (w.is_ios, w.is_android)
    });

    if is_ios {
        let page = env.page_metrics();
        let (offset_left, offset_top, page_left, page_top) = env
            .visual_viewport()
            .map_or((0.0, 0.0, 0.0, 0.0), |v| {
                (v.offset_left, v.offset_top, v.page_left, v.page_top)
            });

        WORK.with(|w| {
            let mut w = w.borrow_mut();
            w.restore_inline_start = page.scroll_left;
            w.restore_block_start = page.scroll_top;
            w.lock_engaged = true;
        });
        env.set_root_flag("sv-scroll-locked", Some("ios"));

        // Scroll so the visual viewport stays anchored on its current
        // content, and publish the clamped correction for the stylesheet
        // to compensate.
        let inline_scroll_req = f64::max(0.0, page_left - offset_left);
        let inline_scroll_max = f64::max(0.0, page.scroll_width - page.client_width);
        let block_scroll_req = f64::max(0.0, page_top - offset_top);
        let block_scroll_max = f64::max(0.0, page.scroll_height - page.client_height);

        let inline_start = inline_scroll_req.clamp(0.0, inline_scroll_max);
        let block_start = block_scroll_req.clamp(0.0, block_scroll_max);

        env.set_root_var("--sv-scroll-locked-inline-start", Some(&px(-inline_start)));
        env.set_root_var("--sv-scroll-locked-block-start", Some(&px(-block_start)));

        env.scroll_to(
            offset_left + f64::max(0.0, inline_scroll_req - inline_scroll_max),
            offset_top + f64::max(0.0, block_scroll_req - block_scroll_max),
        );
        let after = env.page_metrics();
        WORK.with(|w| {
            let mut w = w.borrow_mut();
            w.restore_inline_scroll = after.scroll_left;
            w.restore_block_scroll = after.scroll_top;
        });
    } else if is_android {
        WORK.with(|w| w.borrow_mut().lock_engaged = true);
        env.set_root_flag("sv-scroll-locked", Some("android"));
    } else {
        let gutter = state().with(|s| s.scroll_block_gutter.unwrap_or(0.0));
        if gutter > 0.0 {
            env.set_root_flag("sv-scroll-locked-gutter", Some(""));
        } else {
            env.set_root_flag("sv-scroll-locked-gutter", None);
        }
        WORK.with(|w| w.borrow_mut().lock_engaged = true);
        env.set_root_flag("sv-scroll-locked", Some("desktop"));
    }
}

fn scroll_lock_off() {
    let Some(env) = env::env() else {
        return;
    };
    let engaged = WORK.with(|w| w.borrow().lock_engaged);
    if !engaged {
        return;
    }

    let (is_ios, is_android) = WORK.with(|w| {
        let w = w.borrow();
        (w.is_ios, w.is_android)
    });

    if is_ios {
        let page = env.page_metrics();
        let (restore_inline, restore_block) = WORK.with(|w| {
            let mut w = w.borrow_mut();
            w.lock_engaged = false;
            (
                w.restore_inline_start + page.scroll_left - w.restore_inline_scroll,
                w.restore_block_start + page.scroll_top - w.restore_block_scroll,
            )
        });
        env.set_root_flag("sv-scroll-locked", None);
        env.set_root_var("--sv-scroll-locked-inline-start", None);
        env.set_root_var("--sv-scroll-locked-block-start", None);
        // restore the pre-lock position plus whatever drifted during the lock
        env.scroll_to(restore_inline, restore_block);
    } else if is_android {
        WORK.with(|w| w.borrow_mut().lock_engaged = false);
        env.set_root_flag("sv-scroll-locked", None);
    } else {
        WORK.with(|w| w.borrow_mut().lock_engaged = false);
        env.set_root_flag("sv-scroll-locked", None);
        env.set_root_flag("sv-scroll-locked-gutter", None);
    }
}

/// Re-evaluate the lock after every counter transition; draining the
/// unlock queue only when the counter has returned to zero.
fn lock_sync() {
    if !env::is_interactive() {
        return;
    }

    let requests = lock_requests().get();
    if requests > 0 {
        log::trace!("scroll lock held by {requests} request(s)");
        scroll_lock_on();
    } else {
        log::trace!("scroll lock released");
        scroll_lock_off();

        let queue = UNLOCK_QUEUE.with(|q| std::mem::take(&mut *q.borrow_mut()));
        for f in queue {
            f();
        }
    }
}

fn attach(is_ios: bool, is_android: bool) {
    let first = WORK.with(|w| {
        let mut w = w.borrow_mut();
        w.mounted += 1;
        w.mounted == 1
    });
    if !first {
        return;
    }
    let Some(env) = env::env() else {
        return;
    };

    WORK.with(|w| {
        let mut w = w.borrow_mut();
        w.is_ios = is_ios;
        w.is_android = is_android;
    });

    let mut listeners: SmallVec<[ListenerId; 8]> = SmallVec::new();
    let on_geometry: Rc<dyn Fn(&EnvEvent)> =
        Rc::new(|_evt| UPDATE_THROTTLED.with(|t| t.call(())));

    listeners.push(env.subscribe_event(EnvEventSource::Resize, Rc::clone(&on_geometry)));
    listeners.push(env.subscribe_event(EnvEventSource::Scroll, Rc::clone(&on_geometry)));
    listeners.push(env.subscribe_event(EnvEventSource::OrientationChange, Rc::clone(&on_geometry)));

    if env.visual_viewport().is_some() {
        listeners.push(env.subscribe_event(EnvEventSource::ViewportResize, Rc::clone(&on_geometry)));
        listeners.push(env.subscribe_event(EnvEventSource::ViewportScroll, Rc::clone(&on_geometry)));
    }

    if is_ios {
        listeners.push(env.subscribe_event(
            EnvEventSource::FocusIn,
            Rc::new(|evt| {
                if let EnvEvent::Focus(target) = evt {
                    ios_on_focusin(target);
                }
            }),
        ));
        listeners.push(env.subscribe_event(
            EnvEventSource::FocusOut,
            Rc::new(|evt| {
                if let EnvEvent::Focus(target) = evt {
                    ios_on_focusout(target);
                }
            }),
        ));
    }

    if env.has_virtual_keyboard() {
        listeners.push(env.subscribe_event(
            EnvEventSource::KeyboardGeometry,
            Rc::clone(&on_geometry),
        ));
    }

    listeners.push(env.subscribe_event(EnvEventSource::RootResize, Rc::clone(&on_geometry)));

    WORK.with(|w| w.borrow_mut().listeners = listeners);

    update_values();
}

fn detach(requested: &Signal<bool>) {
    WORK.with(|w| {
        let mut w = w.borrow_mut();
        w.mounted = w.mounted.saturating_sub(1);
    });

    // A consumer unmounting with its request held releases it.
    if requested.get() {
        requested.set(false);
        lock_requests().update(|n| *n = n.saturating_sub(1));
        lock_sync();
    }

    let teardown = WORK.with(|w| {
        let mut w = w.borrow_mut();
        if w.mounted == 0 {
            Some(std::mem::take(&mut w.listeners))
        } else {
            None
        }
    });

    if let Some(listeners) = teardown {
        if let Some(env) = env::env() {
            for id in listeners {
                env.unsubscribe(id);
            }
        }
        state().set(ScreenState::default());
        virtual_keyboard_open().set_if_changed(false);
    }
}

/// Options for `use_screen`; server-side page sizes when nothing has been
/// measured yet.
#[derive(Clone, Default)]
pub struct ScreenOptions {
    /// Initial page width before the first measurement; `None` is 1280.
    pub width: Source<Option<f64>>,
    /// Initial page height before the first measurement; `None` is 960.
    pub height: Source<Option<f64>>,
}

/// Per-consumer write handle for the shared scroll-lock counter.
///
/// Writing the same value twice is a no-op on the counter; outside an
/// interactive environment the value is stored locally and the shared
/// counter is never touched.
pub struct ScrollLockRequest {
    requested: Signal<bool>,
}

impl ScrollLockRequest {
    pub fn get(&self) -> bool {
        self.requested.get()
    }

    pub fn set(&self, value: bool) {
        if !env::is_interactive() {
            self.requested.set(value);
            return;
        }

        if value && !self.requested.get() {
            self.requested.set(true);
            lock_requests().update(|n| *n += 1);
            lock_sync();
        } else if !value && self.requested.get() {
            self.requested.set(false);
            lock_requests().update(|n| *n = n.saturating_sub(1));
            lock_sync();
        }
    }
}

/// Target of [`Screen::on_scroll_unlocked_clear`].
pub enum UnlockClear {
    /// Drop every queued callback.
    All,
    /// Drop one queued callback, matched by identity.
    One(Rc<dyn Fn()>),
}

/// Reactive screen measurements and scroll-lock handles returned by
/// `use_screen`.
pub struct Screen {
    /// Page (document) inline size in px.
    pub page_inline_size: Computed<f64>,
    /// Page (document) block size in px.
    pub page_block_size: Computed<f64>,
    /// Screen (window) inline size in px.
    pub screen_inline_size: Computed<f64>,
    /// Screen (window) block size in px.
    pub screen_block_size: Computed<f64>,
    /// Visible-viewport inline size in px.
    pub view_inline_size: Computed<f64>,
    /// Visible-viewport block size in px.
    pub view_block_size: Computed<f64>,
    /// Visible-viewport scale factor.
    pub view_scale: Computed<f64>,
    /// Inline (horizontal) scrollbar size in px.
    pub scroll_inline_gutter: Computed<f64>,
    /// Block (vertical) scrollbar size in px.
    pub scroll_block_gutter: Computed<f64>,
    /// Page inline scroll start in px.
    pub page_inline_start: Computed<f64>,
    /// Page block scroll start in px.
    pub page_block_start: Computed<f64>,
    /// Whether the virtual keyboard is open.
    pub virtual_keyboard_open: Computed<bool>,
    /// Whether page scroll is locked. Always `false` server-side.
    pub scroll_locked: Computed<bool>,
    /// This consumer's lock request.
    pub scroll_lock_requested: ScrollLockRequest,
}

impl Screen {
    /// Run `f` when scroll is unlocked: immediately if nothing holds the
    /// lock, otherwise once the request counter returns to zero. Never runs
    /// server-side.
    pub fn on_scroll_unlocked(&self, f: Rc<dyn Fn()>) {
        if !env::is_interactive() {
            return;
        }

        if lock_requests().get() == 0 {
            f();
        } else {
            UNLOCK_QUEUE.with(|q| q.borrow_mut().push(f));
        }
    }

    /// Remove queued unlock callbacks before they get a chance to run.
    pub fn on_scroll_unlocked_clear(&self, what: UnlockClear) {
        UNLOCK_QUEUE.with(|q| {
            let mut q = q.borrow_mut();
            match what {
                UnlockClear::All => q.clear(),
                UnlockClear::One(f) => {
                    if let Some(index) = q.iter().position(|g| Rc::ptr_eq(g, &f)) {
                        q.remove(index);
                    }
                }
            }
        });
    }
}

static SCREEN_OPTIONS: InjectedKey<ScreenOptions> = InjectedKey::new("useScreen");

/// Install `use_screen` as a singleton for everything run inside `f`.
pub fn screen_plugin<R>(options: Option<ScreenOptions>, f: impl FnOnce() -> R) -> R {
    provide(&SCREEN_OPTIONS, options, f)
}

/// Reactive screen measurements, virtual-keyboard status, and the scroll
/// lock.
pub fn use_screen(options: Option<ScreenOptions>) -> Screen {
    let local = use_injected(&SCREEN_OPTIONS, options.unwrap_or_default());
    let requested = Signal::new(false);
    let platform = crate::platform::use_platform(None);

    if let Some(scope) = current_scope() {
        attach(
            platform.is_ios.get() == Some(true),
            platform.is_android.get() == Some(true),
        );
        let requested = requested.clone();
        scope.add_disposer(move || detach(&requested));
    }

    let st = state();

    let sized = |pick: fn(&ScreenState) -> Option<f64>,
                 fallback: Source<Option<f64>>,
                 default: f64| {
        let st = st.clone();
        Computed::new(move || {
            st.with(pick)
                .or_else(|| fallback.get())
                .unwrap_or(default)
        })
    };
    let raw = |pick: fn(&ScreenState) -> Option<f64>, default: f64| {
        let st = st.clone();
        Computed::new(move || st.with(pick).unwrap_or(default))
    };

    Screen {
        page_inline_size: sized(
            |s| s.page_inline_size,
            local.width.clone(),
            SCREEN_DEFAULT_WIDTH,
        ),
        page_block_size: sized(
            |s| s.page_block_size,
            local.height.clone(),
            SCREEN_DEFAULT_HEIGHT,
        ),
        screen_inline_size: sized(
            |s| s.screen_inline_size,
            local.width.clone(),
            SCREEN_DEFAULT_WIDTH,
        ),
        screen_block_size: sized(
            |s| s.screen_block_size,
            local.height.clone(),
            SCREEN_DEFAULT_HEIGHT,
        ),
        view_inline_size: sized(
            |s| s.view_inline_size,
            local.width.clone(),
            SCREEN_DEFAULT_WIDTH,
        ),
        view_block_size: sized(
            |s| s.view_block_size,
            local.height.clone(),
            SCREEN_DEFAULT_HEIGHT,
        ),
        view_scale: raw(|s| s.view_scale, 1.0),
        scroll_inline_gutter: raw(|s| s.scroll_inline_gutter, 0.0),
        scroll_block_gutter: raw(|s| s.scroll_block_gutter, 0.0),
        page_inline_start: raw(|s| s.page_inline_start, 0.0),
        page_block_start: raw(|s| s.page_block_start, 0.0),
        virtual_keyboard_open: {
            let vk = virtual_keyboard_open();
            Computed::new(move || vk.get())
        },
        scroll_locked: {
            let requests = lock_requests();
            Computed::new(move || env::is_interactive() && requests.get() > 0)
        },
        scroll_lock_requested: ScrollLockRequest { requested },
    }
}
