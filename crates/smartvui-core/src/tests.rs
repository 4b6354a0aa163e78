#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::options::{InjectedKey, provide, use_injected};
    use crate::scope::*;
    use crate::signal::*;
    use crate::state::{Computed, Source};

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen2 = seen.clone();
        let id = sig.subscribe(move |v| seen2.borrow_mut().push(*v));

        sig.set(1);
        sig.set(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);

        sig.unsubscribe(id);
        sig.set(3);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_signal_reentrant_subscription_during_notify() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sig2 = sig.clone();
        let seen2 = seen.clone();
        sig.subscribe(move |v| {
            seen2.borrow_mut().push(*v);
            // re-entering the signal from inside a notification must work
            let id = sig2.subscribe(|_| {});
            sig2.unsubscribe(id);
        });

        sig.set(1);
        sig.set(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_signal_subscriber_may_write_back() {
        let sig = signal(1);

        // a clamping subscriber writes the signal it is notified by
        let sig2 = sig.clone();
        sig.subscribe(move |v| {
            if *v > 10 {
                sig2.set_if_changed(10);
            }
        });

        sig.set(42);
        assert_eq!(sig.get(), 10);
    }

    #[test]
    fn test_signal_set_if_changed() {
        let sig = signal(5);
        let fired = Rc::new(RefCell::new(0));

        let fired2 = fired.clone();
        sig.subscribe(move |_| *fired2.borrow_mut() += 1);

        assert!(!sig.set_if_changed(5));
        assert_eq!(*fired.borrow(), 0);

        assert!(sig.set_if_changed(6));
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_scope_dispose_runs_disposers() {
        let cleaned_up = Rc::new(RefCell::new(false));

        let scope = Scope::new();
        let cleaned_up2 = cleaned_up.clone();
        scope.add_disposer(move || {
            *cleaned_up2.borrow_mut() = true;
        });

        assert!(!*cleaned_up.borrow());
        scope.dispose();
        assert!(*cleaned_up.borrow());
    }

    #[test]
    fn test_scope_children_dispose_first() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let scope = Scope::new();
        let child = scope.child();
        let o1 = order.clone();
        scope.add_disposer(move || o1.borrow_mut().push("parent"));
        let o2 = order.clone();
        child.add_disposer(move || o2.borrow_mut().push("child"));

        scope.dispose();
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
    }

    #[test]
    fn test_current_scope_tracking() {
        assert!(current_scope().is_none());

        let scope = Scope::new();
        scope.run(|| {
            assert!(current_scope().is_some());
        });
        assert!(current_scope().is_none());
        scope.dispose();
    }

    #[test]
    fn test_scoped_effect_cleanup() {
        let released = Rc::new(RefCell::new(false));

        let scope = Scope::new();
        let released2 = released.clone();
        scope.run(move || {
            scoped_effect(move || -> Box<dyn FnOnce()> {
                Box::new(move || *released2.borrow_mut() = true)
            });
        });

        assert!(!*released.borrow());
        scope.dispose();
        assert!(*released.borrow());
    }

    #[test]
    fn test_computed_recomputes() {
        let sig = signal(1);
        let sig2 = sig.clone();
        let doubled = Computed::new(move || sig2.get() * 2);

        assert_eq!(doubled.get(), 2);
        sig.set(21);
        assert_eq!(doubled.get(), 42);
    }

    #[test]
    fn test_source_variants() {
        let plain: Source<i32> = 7.into();
        assert_eq!(plain.get(), 7);

        let sig = signal(1);
        let reactive: Source<i32> = sig.clone().into();
        assert_eq!(reactive.get(), 1);
        sig.set(2);
        assert_eq!(reactive.get(), 2);

        let derived = Source::getter(|| 9);
        assert_eq!(derived.get(), 9);
    }

    static KEY: InjectedKey<i32> = InjectedKey::new("testOptions");

    #[test]
    fn test_injected_outside_context_is_passthrough() {
        assert_eq!(use_injected(&KEY, 11), 11);
    }

    #[test]
    fn test_injected_first_caller_wins() {
        let scope = Scope::new();
        provide(&KEY, None, || {
            scope.run(|| {
                assert_eq!(use_injected(&KEY, 1), 1);
                // later callers in the same branch get the stored options
                assert_eq!(use_injected(&KEY, 2), 1);
            });
        });
        scope.dispose();
    }

    #[test]
    fn test_injected_install_value_wins() {
        let scope = Scope::new();
        provide(&KEY, Some(99), || {
            scope.run(|| {
                assert_eq!(use_injected(&KEY, 1), 99);
            });
        });
        scope.dispose();
    }

    #[test]
    fn test_injected_without_install_stays_local() {
        let scope = Scope::new();
        scope.run(|| {
            assert_eq!(use_injected(&KEY, 3), 3);
            // no slot anywhere: each caller keeps its own options
            assert_eq!(use_injected(&KEY, 4), 4);
        });
        scope.dispose();
    }
}
