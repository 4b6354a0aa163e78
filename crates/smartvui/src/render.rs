//! Programmatic subtree mounting.
//!
//! `use_render` hands out a [`Render`] that runs setup closures in their own
//! [`Scope`], so overlays and portals mounted outside the normal tree still
//! get composable lifecycles (and therefore correct reference counting in
//! the shared trackers). Everything still mounted stops automatically when
//! the owning scope disposes.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smartvui_core::{Scope, current_scope};
use smartvui_env as env;

use crate::error::Error;

new_key_type! {
    struct MountId;
}

type Mounts = Rc<RefCell<SlotMap<MountId, Scope>>>;

/// Handle for one mounted subtree.
pub struct Mounted {
    id: MountId,
    mounts: Mounts,
}

impl Mounted {
    /// Dispose the subtree's scope and forget it. Safe to call after
    /// `stop_all` already removed it.
    pub fn stop(self) {
        let scope = self.mounts.borrow_mut().remove(self.id);
        if let Some(scope) = scope {
            scope.dispose();
        }
    }
}

/// Programmatic mount point returned by `use_render`.
pub struct Render {
    mounts: Mounts,
}

impl Render {
    /// Run `setup` inside a fresh scope and keep that scope alive until
    /// [`Mounted::stop`], [`Render::stop_all`], or the owning scope's
    /// disposal.
    pub fn render<R>(&self, setup: impl FnOnce() -> R) -> Result<(R, Mounted), Error> {
        if !env::is_interactive() {
            return Err(Error::RenderUnavailable);
        }

        let scope = Scope::new();
        let out = scope.run(setup);
        let id = self.mounts.borrow_mut().insert(scope);
        Ok((
            out,
            Mounted {
                id,
                mounts: Rc::clone(&self.mounts),
            },
        ))
    }

    /// Stop every subtree still mounted through this handle.
    pub fn stop_all(&self) {
        let scopes: Vec<Scope> = self.mounts.borrow_mut().drain().map(|(_, s)| s).collect();
        for scope in scopes {
            scope.dispose();
        }
    }
}

/// A mount point whose subtrees are torn down with the current scope.
pub fn use_render() -> Render {
    let mounts: Mounts = Rc::new(RefCell::new(SlotMap::with_key()));

    if let Some(scope) = current_scope() {
        let mounts = Rc::clone(&mounts);
        scope.add_disposer(move || {
            let scopes: Vec<Scope> = mounts.borrow_mut().drain().map(|(_, s)| s).collect();
            for scope in scopes {
                scope.dispose();
            }
        });
    }

    Render { mounts }
}
