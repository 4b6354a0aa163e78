//! Drives the composables against the scripted environment: mounts the
//! trackers, simulates a window resize, then exercises the scroll lock and
//! its unlock queue. Run with `RUST_LOG=debug` for the full picture.

use std::rc::Rc;

use anyhow::Result;
use smartvui::{use_platform, use_prefers_dark, use_screen};
use smartvui_core::Scope;
use smartvui_env::sim::SimEnv;
use smartvui_env::{EnvEventSource, MediaFeature, clear_env, set_env};

fn main() -> Result<()> {
    env_logger::init();

    let env = SimEnv::desktop();
    env.set_media_silent(MediaFeature::PrefersDark, true);
    set_env(env.clone());

    let scope = Scope::new();
    let (platform, dark, screen) =
        scope.run(|| (use_platform(None), use_prefers_dark(None), use_screen(None)));

    log::info!(
        "platform: linux={:?} chrome={:?} pointer={:?} hover={:?}",
        platform.is_linux.get(),
        platform.is_chrome.get(),
        platform.has_pointer.get(),
        platform.has_hover.get(),
    );
    log::info!("prefers dark: {:?}", dark.is_dark.get());
    log::info!(
        "screen: {}x{} (page {}x{}, gutter {})",
        screen.screen_inline_size.get(),
        screen.screen_block_size.get(),
        screen.page_inline_size.get(),
        screen.page_block_size.get(),
        screen.scroll_block_gutter.get(),
    );

    // the window grows
    env.update_page(|p| {
        p.inner_width = 1920.0;
        p.inner_height = 1080.0;
        p.client_width = 1905.0;
        p.client_height = 1080.0;
    });
    env.dispatch(EnvEventSource::Resize);
    env.run_frames();
    log::info!(
        "after resize: {}x{}",
        screen.screen_inline_size.get(),
        screen.screen_block_size.get(),
    );

    // a modal opens and locks scrolling
    screen.scroll_lock_requested.set(true);
    log::info!(
        "locked={} root flag={:?}",
        screen.scroll_locked.get(),
        env.root_flag("sv-scroll-locked"),
    );
    screen.on_scroll_unlocked(Rc::new(|| log::info!("unlock queue drained")));

    screen.scroll_lock_requested.set(false);
    log::info!("locked={}", screen.scroll_locked.get());

    scope.dispose();
    clear_env();
    Ok(())
}
