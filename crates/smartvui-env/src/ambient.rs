//! Ambient driver install.
//!
//! One driver per execution context, installed by the embedding before any
//! composable mounts. No driver installed means the server-rendering path:
//! detectors return snapshots derived from forced options only.

use std::cell::RefCell;
use std::rc::Rc;

use crate::driver::Env;

thread_local! {
    static ENV: RefCell<Option<Rc<dyn Env>>> = const { RefCell::new(None) };
}

pub fn set_env(env: Rc<dyn Env>) {
    ENV.with(|e| *e.borrow_mut() = Some(env));
}

pub fn clear_env() {
    ENV.with(|e| *e.borrow_mut() = None);
}

pub fn env() -> Option<Rc<dyn Env>> {
    ENV.with(|e| e.borrow().clone())
}

/// The `isClient` check: whether a live environment is installed.
pub fn is_interactive() -> bool {
    ENV.with(|e| e.borrow().is_some())
}
