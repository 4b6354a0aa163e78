//! Injected-options registry.
//!
//! Each composable owns a typed key. Installing the composable (the plugin
//! analog) pushes a provider frame holding a single option slot for a
//! subtree; the first call inside that subtree populates the slot and every
//! later call receives the stored options, so all of them drive the same
//! shared state. Without an installed provider the call falls back to its
//! own local options and a console warning points out the lost sharing.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::scope::current_scope;

type Slot = Rc<RefCell<Option<Box<dyn Any>>>>;
type Frame = HashMap<(TypeId, &'static str), Slot>;

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Typed lookup key for one composable's injected options.
pub struct InjectedKey<T: 'static> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> InjectedKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn id(&self) -> (TypeId, &'static str) {
        (TypeId::of::<T>(), self.name)
    }
}

/// Install a provider frame for `key` and run `f` inside it.
///
/// `initial` pre-populates the slot; `None` leaves it for the first caller.
pub fn provide<T: 'static, R>(
    key: &InjectedKey<T>,
    initial: Option<T>,
    f: impl FnOnce() -> R,
) -> R {
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            FRAMES.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }

    FRAMES.with(|st| {
        let mut frame = Frame::new();
        let slot: Slot = Rc::new(RefCell::new(initial.map(|v| Box::new(v) as Box<dyn Any>)));
        frame.insert(key.id(), slot);
        st.borrow_mut().push(frame);
    });
    let _guard = Guard;
    f()
}

/// Resolve the options for `key`, preferring an ancestor-provided slot.
///
/// First caller wins: an empty slot is populated with `local` and later
/// callers in the same branch get that stored value back. Outside any
/// composition context this is a plain pass-through.
pub fn use_injected<T: Clone + 'static>(key: &InjectedKey<T>, local: T) -> T {
    if current_scope().is_none() {
        return local;
    }

    let slot = FRAMES.with(|st| {
        st.borrow()
            .iter()
            .rev()
            .find_map(|frame| frame.get(&key.id()).cloned())
    });

    match slot {
        Some(slot) => {
            let mut stored = slot.borrow_mut();
            if let Some(existing) = stored.as_ref().and_then(|b| b.downcast_ref::<T>()) {
                existing.clone()
            } else {
                *stored = Some(Box::new(local.clone()));
                local
            }
        }
        None => {
            log::warn!(
                "[ SmartVui ] {} was not installed. It will not work as a singleton.",
                key.name
            );
            local
        }
    }
}
