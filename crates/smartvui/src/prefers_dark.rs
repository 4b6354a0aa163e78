//! Dark-preference tracker.
//!
//! One shared `prefers-color-scheme: dark` subscription feeds every
//! consumer; per-[`Group`] override signals let independent areas of an
//! application pin their own scheme without fighting over one flag.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use smartvui_core::{Computed, InjectedKey, Signal, Source, current_scope, provide, use_injected};
use smartvui_env::{self as env, ListenerId, MediaFeature};

/// Override-storage key. Distinct groups hold independent forced values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Group {
    #[default]
    Default,
    Named(String),
}

impl From<&str> for Group {
    fn from(name: &str) -> Self {
        Group::Named(name.to_owned())
    }
}

type Store = Rc<RefCell<HashMap<Group, Signal<Option<bool>>>>>;

static PREFERS_DARK_STORE: InjectedKey<Store> = InjectedKey::new("usePrefersDark");

thread_local! {
    static STATE: Signal<Option<bool>> = Signal::new(None);
    static LIFECYCLE: RefCell<Lifecycle> = RefCell::new(Lifecycle::default());
}

#[derive(Default)]
struct Lifecycle {
    mounted: usize,
    listener: Option<ListenerId>,
}

fn state() -> Signal<Option<bool>> {
    STATE.with(Signal::clone)
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
    let st2 = st.clone();
    let id = env.subscribe_media(
        MediaFeature::PrefersDark,
        Rc::new(move |m| st2.set(Some(m))),
    );
    st.set(Some(env.media_matches(MediaFeature::PrefersDark)));
    LIFECYCLE.with(|l| l.borrow_mut().listener = Some(id));
}

fn detach() {
    let teardown = LIFECYCLE.with(|l| {
        let mut l = l.borrow_mut();
        l.mounted = l.mounted.saturating_sub(1);
        if l.mounted == 0 { Some(l.listener.take()) } else { None }
    });

    if let Some(listener) = teardown {
        if let (Some(id), Some(env)) = (listener, env::env()) {
            env.unsubscribe(id);
        }
        state().set(None);
    }
}

/// Options for `use_prefers_dark`.
#[derive(Clone, Default)]
pub struct PrefersDarkOptions {
    /// Initial forced value for the group's override; `None` is auto detect.
    pub force_dark: Source<Option<bool>>,
    pub group: Group,
}

/// Returned by `use_prefers_dark`.
pub struct PrefersDark {
    /// Group override if pinned, otherwise the system preference
    /// (`None` server-side).
    pub is_dark: Computed<Option<bool>>,
    /// The group's override signal. Set `None` to restore auto detection.
    pub force_dark: Signal<Option<bool>>,
}

/// Install the shared override store for everything run inside `f`.
pub fn prefers_dark_plugin<R>(f: impl FnOnce() -> R) -> R {
    provide(&PREFERS_DARK_STORE, Some(Store::default()), f)
}

/// Reactive status for `prefers-color-scheme: dark`, with a per-group
/// override handle.
pub fn use_prefers_dark(options: Option<PrefersDarkOptions>) -> PrefersDark {
    let options = options.unwrap_or_default();
    let store = use_injected(&PREFERS_DARK_STORE, Store::default());

    let force_dark = store
        .borrow_mut()
        .entry(options.group.clone())
        .or_insert_with(|| Signal::new(options.force_dark.get()))
        .clone();

    if let Some(scope) = current_scope() {
        attach();
        scope.add_disposer(detach);
    }

    let is_dark = {
        let force = force_dark.clone();
        let st = state();
        Computed::new(move || force.get().or_else(|| st.get()))
    };

    PrefersDark { is_dark, force_dark }
}
