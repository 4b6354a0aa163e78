use std::cell::RefCell;
use std::rc::Rc;

use web_time::Duration;

use crate::ambient;

/// Window used when no explicit delay is given and the driver cannot
/// schedule animation frames.
const FALLBACK_DELAY: Duration = Duration::from_millis(20);

#[derive(Clone, Copy, Debug)]
pub struct ThrottleOptions {
    /// Invoke on the first call of a window.
    pub leading: bool,
    /// Invoke with the latest coalesced arguments when the window ends.
    pub trailing: bool,
    /// Window length; `None` means one animation frame.
    pub delay: Option<Duration>,
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
            delay: None,
        }
    }
}

/// Leading/trailing rate limiter coalescing high-frequency events.
///
/// Within one window the wrapped function runs at most twice: once leading
/// with the first call's arguments, once trailing with the last call's.
pub struct Throttle<A: 'static> {
    state: Rc<RefCell<State<A>>>,
    func: Rc<dyn Fn(&A)>,
    opts: ThrottleOptions,
}

struct State<A> {
    waiting: bool,
    latest: Option<A>,
}

impl<A: 'static> Throttle<A> {
    pub fn new(opts: ThrottleOptions, f: impl Fn(&A) + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                waiting: false,
                latest: None,
            })),
            func: Rc::new(f),
            opts,
        }
    }

    pub fn call(&self, args: A) {
        let waiting = self.state.borrow().waiting;
        if waiting {
            self.state.borrow_mut().latest = Some(args);
            return;
        }

        {
            let mut st = self.state.borrow_mut();
            st.waiting = true;
            st.latest = None;
        }
        if self.opts.leading {
            (self.func)(&args);
        } else {
            self.state.borrow_mut().latest = Some(args);
        }
        self.schedule();
    }

    fn schedule(&self) {
        let state = Rc::clone(&self.state);
        let func = Rc::clone(&self.func);
        let trailing = self.opts.trailing;
        let end = move || {
            let latest = {
                let mut st = state.borrow_mut();
                st.waiting = false;
                st.latest.take()
            };
            if let Some(args) = latest
                && trailing
            {
                func(&args);
            }
        };

        match ambient::env() {
            Some(env) => match self.opts.delay {
                Some(delay) => {
                    env.set_timeout(delay, Box::new(end));
                }
                None if env.supports_frames() => {
                    env.request_frame(Box::new(end));
                }
                None => {
                    env.set_timeout(FALLBACK_DELAY, Box::new(end));
                }
            },
            // No scheduler: close the window right away.
            None => end(),
        }
    }
}

impl<A: 'static> Clone for Throttle<A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            func: Rc::clone(&self.func),
            opts: self.opts,
        }
    }
}
