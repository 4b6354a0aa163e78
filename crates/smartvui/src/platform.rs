//! Platform detection.
//!
//! `use_platform` derives pointer/touch/hover capability and OS/browser
//! identity from media queries plus a one-shot user-agent parse. All
//! consumers share one `PlatformState` singleton; the underlying media
//! subscriptions are installed when the first consumer mounts and removed
//! (with a reset to undetected) when the last one unmounts.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use smartvui_core::{Computed, InjectedKey, Signal, Source, current_scope, provide, use_injected};
use smartvui_env::{self as env, ListenerId, MediaFeature};

/// Shared detection state. Every field is `None` until the first consumer
/// mounts in an environment with a live driver.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlatformState {
    pub has_pointer: Option<bool>,
    pub has_touch: Option<bool>,
    pub has_hover: Option<bool>,

    pub is_desktop: Option<bool>,
    pub is_mobile: Option<bool>,

    pub is_standalone: Option<bool>,
    pub is_emulated: Option<bool>,

    pub is_android: Option<bool>,
    pub is_ios: Option<bool>,
    pub is_linux: Option<bool>,
    pub is_macos: Option<bool>,
    pub is_windows: Option<bool>,
    pub is_chromeos: Option<bool>,

    pub is_chrome: Option<bool>,
    pub is_firefox: Option<bool>,
    pub is_safari: Option<bool>,
}

/// Result of one user-agent parse. `has_touch` is only set for touch-first
/// devices; the other fields are concrete (matched or ruled out).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AgentPlatform {
    pub has_touch: Option<bool>,

    pub is_desktop: bool,
    pub is_mobile: bool,
    pub is_emulated: bool,

    pub is_android: bool,
    pub is_ios: bool,
    pub is_linux: bool,
    pub is_macos: bool,
    pub is_windows: bool,
    pub is_chromeos: bool,

    pub is_chrome: bool,
    pub is_firefox: bool,
    pub is_safari: bool,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Deterministic, order-sensitive user-agent classification; first match
/// wins per group.
pub fn parse_user_agent(
    user_agent: &str,
    has_touch: Option<bool>,
    vendor: Option<&str>,
    max_touch_points: Option<u32>,
    has_user_agent_data: bool,
) -> AgentPlatform {
    let ua = user_agent.to_ascii_lowercase();
    let mut agent = AgentPlatform::default();

    if contains_any(&ua, &["firefox", "fxios"]) {
        agent.is_firefox = true;
    } else if contains_any(&ua, &["chrom", "crios"]) || has_user_agent_data {
        agent.is_chrome = true;
    } else if ua.contains("safari") {
        agent.is_safari = true;
    }

    if contains_any(&ua, &["iphone", "ipad", "ipod"])
        || (ua.contains("macintosh") && has_touch == Some(true))
    {
        agent.is_ios = true;
        agent.is_mobile = true;
        agent.has_touch = Some(true);

        if !agent.is_firefox && !agent.is_chrome && !agent.is_safari {
            agent.is_safari = true;
        }

        // iPhone UA with a non-Apple vendor or a single-point touch screen
        // is a devtools emulation.
        let foreign_vendor = vendor.is_some_and(|v| !v.to_ascii_lowercase().contains("apple"));
        if foreign_vendor || matches!(max_touch_points, Some(0) | Some(1)) {
            agent.is_emulated = true;
        }
    } else if ua.contains("macintosh") {
        agent.is_macos = true;
        agent.is_desktop = true;
    } else if ua.contains("cros") {
        agent.is_chromeos = true;
        agent.is_desktop = true;
    } else if ua.contains("android") {
        agent.is_android = true;
        agent.is_mobile = true;
        agent.has_touch = Some(true);

        if matches!(max_touch_points, Some(0) | Some(1)) {
            agent.is_emulated = true;
        }
    } else if contains_any(&ua, &["linux", "x11"]) {
        agent.is_linux = true;
        agent.is_desktop = true;
    } else if ua.contains("windows") {
        agent.is_windows = true;
        agent.is_desktop = true;
    }

    agent
}

thread_local! {
    static STATE: Signal<PlatformState> = Signal::new(PlatformState::default());
    static LIFECYCLE: RefCell<Lifecycle> = RefCell::new(Lifecycle::default());
}

#[derive(Default)]
struct Lifecycle {
    mounted: usize,
    listeners: SmallVec<[ListenerId; 5]>,
}

fn state() -> Signal<PlatformState> {
    STATE.with(Signal::clone)
}

fn apply_agent(st: &Signal<PlatformState>, agent: AgentPlatform) {
    st.update(|s| {
        if let Some(touch) = agent.has_touch {
            s.has_touch = Some(touch);
        }
        s.is_desktop = Some(agent.is_desktop);
        s.is_mobile = Some(agent.is_mobile);
        s.is_emulated = Some(agent.is_emulated);
        s.is_android = Some(agent.is_android);
        s.is_ios = Some(agent.is_ios);
        s.is_linux = Some(agent.is_linux);
        s.is_macos = Some(agent.is_macos);
        s.is_windows = Some(agent.is_windows);
        s.is_chromeos = Some(agent.is_chromeos);
        s.is_chrome = Some(agent.is_chrome);
        s.is_firefox = Some(agent.is_firefox);
        s.is_safari = Some(agent.is_safari);
    });
}

fn attach() {
    let first = LIFECYCLE.with(|l| {
        let mut l = l.borrow_mut();
        l.mounted += 1;
        l.mounted == 1
    });
    if !first {
        return;
    }
    let Some(env) = env::env() else {
        return;
    };
    let st = state();
    let mut listeners: SmallVec<[ListenerId; 5]> = SmallVec::new();

    {
        let st2 = st.clone();
        listeners.push(env.subscribe_media(
            MediaFeature::PointerFine,
            Rc::new(move |m| st2.update(|s| s.has_pointer = Some(m))),
        ));
        st.update(|s| s.has_pointer = Some(env.media_matches(MediaFeature::PointerFine)));
    }

    {
        let st2 = st.clone();
        listeners.push(env.subscribe_media(
            MediaFeature::PointerCoarse,
            Rc::new(move |m| st2.update(|s| s.has_touch = Some(m))),
        ));
        st.update(|s| s.has_touch = Some(env.media_matches(MediaFeature::PointerCoarse)));
    }

    {
        // no pointing device at all rules out pointer, touch, and hover
        let st2 = st.clone();
        listeners.push(env.subscribe_media(
            MediaFeature::PointerNone,
            Rc::new(move |m| {
                if m {
                    st2.update(|s| {
                        s.has_pointer = Some(false);
                        s.has_touch = Some(false);
                        s.has_hover = Some(false);
                    });
                }
            }),
        ));
        if env.media_matches(MediaFeature::PointerNone) {
            st.update(|s| {
                s.has_pointer = Some(false);
                s.has_touch = Some(false);
                s.has_hover = Some(false);
            });
        }
    }

    {
        let st2 = st.clone();
        listeners.push(env.subscribe_media(
            MediaFeature::Hover,
            Rc::new(move |m| st2.update(|s| s.has_hover = Some(m))),
        ));
        st.update(|s| s.has_hover = Some(env.media_matches(MediaFeature::Hover)));
    }

    {
        let st2 = st.clone();
        listeners.push(env.subscribe_media(
            MediaFeature::DisplayStandalone,
            Rc::new(move |m| st2.update(|s| s.is_standalone = Some(m))),
        ));
        let navigator = env.navigator();
        let standalone =
            env.media_matches(MediaFeature::DisplayStandalone) || navigator.legacy_standalone;
        st.update(|s| s.is_standalone = Some(standalone));

        let touch = st.with(|s| s.has_touch);
        apply_agent(
            &st,
            parse_user_agent(
                &navigator.user_agent,
                touch,
                navigator.vendor.as_deref(),
                navigator.max_touch_points,
                navigator.has_user_agent_data,
            ),
        );
    }

    LIFECYCLE.with(|l| l.borrow_mut().listeners = listeners);
}

fn detach() {
    let teardown = LIFECYCLE.with(|l| {
        let mut l = l.borrow_mut();
        l.mounted = l.mounted.saturating_sub(1);
        if l.mounted == 0 {
            Some(std::mem::take(&mut l.listeners))
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
        state().set(PlatformState::default());
    }
}

/// Options for `use_platform`. Every force is reactive; `None` means auto
/// detection.
#[derive(Clone, Default)]
pub struct PlatformOptions {
    pub force_has_pointer: Source<Option<bool>>,
    pub force_has_touch: Source<Option<bool>>,
    pub force_is_standalone: Source<Option<bool>>,
    pub force_user_agent: Source<Option<String>>,
}

/// Reactive platform flags returned by `use_platform`. Getters resolve
/// live-detected state first, then the forced user-agent derivation, then
/// explicit forces, then `None`.
pub struct Platform {
    pub has_pointer: Computed<Option<bool>>,
    pub has_touch: Computed<Option<bool>>,
    pub has_hover: Computed<Option<bool>>,

    pub is_desktop: Computed<Option<bool>>,
    pub is_mobile: Computed<Option<bool>>,

    pub is_standalone: Computed<Option<bool>>,
    pub is_emulated: Computed<Option<bool>>,

    pub is_android: Computed<Option<bool>>,
    pub is_ios: Computed<Option<bool>>,
    pub is_linux: Computed<Option<bool>>,
    pub is_macos: Computed<Option<bool>>,
    pub is_windows: Computed<Option<bool>>,
    pub is_chromeos: Computed<Option<bool>>,

    pub is_chrome: Computed<Option<bool>>,
    pub is_firefox: Computed<Option<bool>>,
    pub is_safari: Computed<Option<bool>>,
}

static PLATFORM_OPTIONS: InjectedKey<PlatformOptions> = InjectedKey::new("usePlatform");

/// Install `use_platform` as a singleton for everything run inside `f`
/// (the plugin-install analog).
pub fn platform_plugin<R>(options: Option<PlatformOptions>, f: impl FnOnce() -> R) -> R {
    provide(&PLATFORM_OPTIONS, Some(options.unwrap_or_default()), f)
}

/// Reactive booleans for platform related flags. `None` is returned in auto
/// detect mode on the server side and before the first mount.
pub fn use_platform(options: Option<PlatformOptions>) -> Platform {
    let local = use_injected(&PLATFORM_OPTIONS, options.unwrap_or_default());

    if let Some(scope) = current_scope() {
        attach();
        scope.add_disposer(detach);
    }

    let st = state();

    let force_platform = {
        let ua = local.force_user_agent.clone();
        let touch = local.force_has_touch.clone();
        Computed::new(move || match ua.get() {
            Some(s) if !s.is_empty() => {
                Some(parse_user_agent(&s, touch.get(), None, None, false))
            }
            _ => None,
        })
    };

    // live value ?? UA-derived value ?? explicit force ?? None
    let agent_field = |pick_live: fn(&PlatformState) -> Option<bool>,
                       pick_agent: fn(&AgentPlatform) -> bool| {
        let st = st.clone();
        let fp = force_platform.clone();
        Computed::new(move || st.with(pick_live).or_else(|| fp.get().map(|a| pick_agent(&a))))
    };

    Platform {
        has_pointer: {
            let st = st.clone();
            let f = local.force_has_pointer.clone();
            Computed::new(move || st.with(|s| s.has_pointer).or_else(|| f.get()))
        },
        has_touch: {
            let st = st.clone();
            let fp = force_platform.clone();
            let f = local.force_has_touch.clone();
            Computed::new(move || {
                st.with(|s| s.has_touch)
                    .or_else(|| fp.get().and_then(|a| a.has_touch))
                    .or_else(|| f.get())
            })
        },
        has_hover: {
            // hover capability follows the pointer force when undetected
            let st = st.clone();
            let f = local.force_has_pointer.clone();
            Computed::new(move || st.with(|s| s.has_hover).or_else(|| f.get()))
        },

        is_desktop: agent_field(|s| s.is_desktop, |a| a.is_desktop),
        is_mobile: agent_field(|s| s.is_mobile, |a| a.is_mobile),

        is_standalone: {
            let st = st.clone();
            let f = local.force_is_standalone.clone();
            Computed::new(move || st.with(|s| s.is_standalone).or_else(|| f.get()))
        },
        is_emulated: {
            let st = st.clone();
            Computed::new(move || st.with(|s| s.is_emulated))
        },

        is_android: agent_field(|s| s.is_android, |a| a.is_android),
        is_ios: agent_field(|s| s.is_ios, |a| a.is_ios),
        is_linux: agent_field(|s| s.is_linux, |a| a.is_linux),
        is_macos: agent_field(|s| s.is_macos, |a| a.is_macos),
        is_windows: agent_field(|s| s.is_windows, |a| a.is_windows),
        is_chromeos: agent_field(|s| s.is_chromeos, |a| a.is_chromeos),

        is_chrome: agent_field(|s| s.is_chrome, |a| a.is_chrome),
        is_firefox: agent_field(|s| s.is_firefox, |a| a.is_firefox),
        is_safari: agent_field(|s| s.is_safari, |a| a.is_safari),
    }
}
