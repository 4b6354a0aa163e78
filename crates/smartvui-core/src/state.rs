use std::rc::Rc;

use crate::Signal;

/// Read-only view that recomputes from its dependencies on every `get`.
///
/// The layered fallback chains of the composables (live value, then derived,
/// then forced, then `None`) are expressed as plain closures wrapped in this
/// type; there is no caching and no dependency graph to invalidate.
pub struct Computed<T>(Rc<dyn Fn() -> T>);

impl<T> Computed<T> {
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn get(&self) -> T {
        (self.0)()
    }
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

/// A value that may be plain, reactive, or computed on demand.
///
/// Options accept this wherever the consumer may want the option to track
/// one of its own signals instead of being fixed at call time.
pub enum Source<T: 'static> {
    Value(T),
    Signal(Signal<T>),
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone> Source<T> {
    pub fn get(&self) -> T {
        match self {
            Source::Value(v) => v.clone(),
            Source::Signal(s) => s.get(),
            Source::Getter(f) => f(),
        }
    }
}

impl<T> Source<T> {
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        Source::Getter(Rc::new(f))
    }
}

impl<T: Clone> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Source::Value(v) => Source::Value(v.clone()),
            Source::Signal(s) => Source::Signal(s.clone()),
            Source::Getter(f) => Source::Getter(Rc::clone(f)),
        }
    }
}

impl<T> From<T> for Source<T> {
    fn from(v: T) -> Self {
        Source::Value(v)
    }
}

impl<T> From<Signal<T>> for Source<T> {
    fn from(s: Signal<T>) -> Self {
        Source::Signal(s)
    }
}

/// Optional sources default to "not forced".
impl<T> Default for Source<Option<T>> {
    fn default() -> Self {
        Source::Value(None)
    }
}
