use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub trait Destroy {
    fn destroy(&self);
}

impl<T: Destroy + ?Sized> Destroy for Rc<T> {
    fn destroy(&self) {
        (**self).destroy();
    }
}

impl<T: Destroy + ?Sized> Destroy for Box<T> {
    fn destroy(&self) {
        (**self).destroy();
    }
}

enum LeaseState<R> {
    Pending,
    Held(R),
    Released,
}

/// Renderer ownership shared by a host page and the child window it opened.
///
/// Whichever side tears down first destroys the renderer; every later
/// teardown is a no-op. A renderer attached after teardown is destroyed
/// on the spot.
pub struct RendererLease<R: Destroy> {
    state: RefCell<LeaseState<R>>,
    child_open: Cell<bool>,
}

impl<R: Destroy> RendererLease<R> {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(LeaseState::Pending),
            child_open: Cell::new(true),
        }
    }

    /// Returns `false` when the lease was already released and the renderer
    /// has been destroyed instead of stored.
    pub fn attach(&self, renderer: R) -> bool {
        let pending = matches!(*self.state.borrow(), LeaseState::Pending);
        if pending {
            self.state.replace(LeaseState::Held(renderer));
            true
        } else {
            renderer.destroy();
            false
        }
    }

    /// Destroys the held renderer at most once. Returns whether this call
    /// did the destroying.
    pub fn release(&self) -> bool {
        let previous = self.state.replace(LeaseState::Released);
        match previous {
            LeaseState::Held(renderer) => {
                renderer.destroy();
                true
            }
            LeaseState::Pending | LeaseState::Released => false,
        }
    }

    pub fn child_closed(&self) -> bool {
        self.child_open.set(false);
        self.release()
    }

    /// Returns whether the child window is still open and must be closed.
    pub fn host_unloaded(&self) -> bool {
        self.release();
        self.child_open.get()
    }

    pub fn is_released(&self) -> bool {
        matches!(*self.state.borrow(), LeaseState::Released)
    }
}

impl<R: Destroy> Default for RendererLease<R> {
    fn default() -> Self {
        Self::new()
    }
}
