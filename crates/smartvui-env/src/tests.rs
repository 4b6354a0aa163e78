#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use web_time::Duration;

    use crate::ambient::{clear_env, is_interactive, set_env};
    use crate::driver::{Env, EnvEvent, EnvEventSource, MediaFeature, PageMetrics};
    use crate::sim::SimEnv;
    use crate::throttle::{Throttle, ThrottleOptions};

    fn recording_throttle(opts: ThrottleOptions) -> (Throttle<i32>, Rc<RefCell<Vec<i32>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let calls2 = calls.clone();
        let t = Throttle::new(opts, move |v: &i32| calls2.borrow_mut().push(*v));
        (t, calls)
    }

    #[test]
    fn test_throttle_leading_only() {
        let env = SimEnv::new();
        set_env(env.clone());

        let (t, calls) = recording_throttle(ThrottleOptions {
            leading: true,
            trailing: false,
            delay: None,
        });

        t.call(1);
        t.call(2);
        t.call(3);
        assert_eq!(*calls.borrow(), vec![1]);

        env.run_frames();
        assert_eq!(*calls.borrow(), vec![1]);

        // window closed: next call leads again
        t.call(4);
        assert_eq!(*calls.borrow(), vec![1, 4]);

        clear_env();
    }

    #[test]
    fn test_throttle_trailing_only() {
        let env = SimEnv::new();
        set_env(env.clone());

        let (t, calls) = recording_throttle(ThrottleOptions {
            leading: false,
            trailing: true,
            delay: None,
        });

        t.call(1);
        t.call(2);
        t.call(3);
        assert!(calls.borrow().is_empty());

        env.run_frames();
        assert_eq!(*calls.borrow(), vec![3]);

        clear_env();
    }

    #[test]
    fn test_throttle_leading_and_trailing() {
        let env = SimEnv::new();
        set_env(env.clone());

        let (t, calls) = recording_throttle(ThrottleOptions::default());

        t.call(1);
        t.call(2);
        t.call(3);
        env.run_frames();
        // at most twice per window: first call's args, then the last call's
        assert_eq!(*calls.borrow(), vec![1, 3]);

        clear_env();
    }

    #[test]
    fn test_throttle_single_call_no_trailing_repeat() {
        let env = SimEnv::new();
        set_env(env.clone());

        let (t, calls) = recording_throttle(ThrottleOptions::default());

        t.call(7);
        env.run_frames();
        assert_eq!(*calls.borrow(), vec![7]);

        clear_env();
    }

    #[test]
    fn test_throttle_explicit_delay() {
        let env = SimEnv::new();
        set_env(env.clone());

        let (t, calls) = recording_throttle(ThrottleOptions {
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        });

        t.call(1);
        t.call(2);
        env.advance(Duration::from_millis(30));
        assert_eq!(*calls.borrow(), vec![1]);

        env.advance(Duration::from_millis(20));
        assert_eq!(*calls.borrow(), vec![1, 2]);

        clear_env();
    }

    #[test]
    fn test_throttle_timeout_fallback_without_frames() {
        let env = SimEnv::new();
        env.set_frames_supported(false);
        set_env(env.clone());

        let (t, calls) = recording_throttle(ThrottleOptions::default());

        t.call(1);
        t.call(2);
        assert_eq!(env.pending_frames(), 0);
        assert_eq!(env.pending_timeouts(), 1);

        env.advance(Duration::from_millis(20));
        assert_eq!(*calls.borrow(), vec![1, 2]);

        clear_env();
    }

    #[test]
    fn test_throttle_without_env_degrades_to_direct_calls() {
        assert!(!is_interactive());
        let (t, calls) = recording_throttle(ThrottleOptions::default());

        t.call(1);
        t.call(2);
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_sim_media_dispatch_on_transition_only() {
        let env = SimEnv::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen2 = seen.clone();
        let id = env.subscribe_media(
            MediaFeature::PrefersDark,
            Rc::new(move |m| seen2.borrow_mut().push(m)),
        );

        env.set_media(MediaFeature::PrefersDark, true);
        env.set_media(MediaFeature::PrefersDark, true);
        env.set_media(MediaFeature::PrefersDark, false);
        assert_eq!(*seen.borrow(), vec![true, false]);

        env.unsubscribe(id);
        env.set_media(MediaFeature::PrefersDark, true);
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert_eq!(env.listener_count(), 0);
    }

    #[test]
    fn test_sim_event_routing() {
        let env = SimEnv::new();
        let count = Rc::new(RefCell::new(0));

        let count2 = count.clone();
        env.subscribe_event(
            EnvEventSource::Resize,
            Rc::new(move |evt| {
                assert!(matches!(evt, EnvEvent::Changed));
                *count2.borrow_mut() += 1;
            }),
        );

        env.dispatch(EnvEventSource::Resize);
        env.dispatch(EnvEventSource::Scroll);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_sim_scroll_clamps_to_page_bounds() {
        let env = SimEnv::new();
        env.set_page(PageMetrics {
            client_width: 400.0,
            client_height: 600.0,
            scroll_width: 400.0,
            scroll_height: 1000.0,
            ..Default::default()
        });

        env.scroll_to(0.0, 900.0);
        assert_eq!(env.page().scroll_top, 400.0);

        env.scroll_by(0.0, -1000.0);
        assert_eq!(env.page().scroll_top, 0.0);
    }

    #[test]
    fn test_sim_task_cancellation() {
        let env = SimEnv::new();
        let ran = Rc::new(RefCell::new(false));

        let ran2 = ran.clone();
        let task = env.request_frame(Box::new(move || *ran2.borrow_mut() = true));
        env.cancel_task(task);
        env.run_frames();
        assert!(!*ran.borrow());

        let ran3 = ran.clone();
        let task = env.set_timeout(
            Duration::from_millis(10),
            Box::new(move || *ran3.borrow_mut() = true),
        );
        env.cancel_task(task);
        env.advance(Duration::from_millis(20));
        assert!(!*ran.borrow());
    }

    #[test]
    fn test_sim_frames_queued_during_drain_wait() {
        let env = SimEnv::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let env2 = env.clone();
        let order2 = order.clone();
        env.request_frame(Box::new(move || {
            order2.borrow_mut().push(1);
            let order3 = order2.clone();
            env2.request_frame(Box::new(move || order3.borrow_mut().push(2)));
        }));

        env.run_frames();
        assert_eq!(*order.borrow(), vec![1]);
        env.run_frames();
        assert_eq!(*order.borrow(), vec![1, 2]);
    }
}
