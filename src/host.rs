//! Host environment seams.
//!
//! The follower talks to the outside world through three collaborators:
//! a paint-cycle scheduler, a pointer-move source and the target element.
//! The browser implementations live in [`crate::web`]; tests drive the
//! follower with in-memory ones.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::error::CursorResult;
use crate::style::StyleDescriptor;

/// "Run once before the next repaint" scheduling.
///
/// The scheduled work is always the follower's paint step; the host calls
/// [`crate::CursorFollower::paint`] when the frame comes due.
pub trait FrameScheduler {
    /// Opaque id of a pending frame.
    type Handle: Copy + std::fmt::Debug;

    /// Ask for a paint callback before the next repaint.
    fn request_frame(&mut self) -> CursorResult<Self::Handle>;

    /// Cancel a pending request. A cancelled frame must never fire.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Global pointer-move notifications.
pub trait PointerSource {
    /// Start delivering moves to the follower.
    fn subscribe(&mut self) -> CursorResult<()>;

    /// Stop delivering moves.
    fn unsubscribe(&mut self);
}

/// The visual element that follows the pointer.
pub trait CursorTarget {
    /// Current rendered (width, height) in pixels.
    fn rendered_size(&self) -> (f64, f64);

    /// Write the position transform.
    fn set_transform(&self, transform: &str);

    /// Set every property of a style descriptor on the element. Properties
    /// not named in `styles` are left alone.
    fn apply_styles(&self, styles: &StyleDescriptor);

    /// Remove one style property (JS style-object naming).
    fn remove_style(&self, name: &str);
}

/// Shared, nullable reference to the target element.
///
/// The caller attaches exactly one element; the follower only reads it
/// when a frame comes due, so attaching and detaching may happen at any time.
#[derive(Debug)]
pub struct CursorRef<T> {
    inner: Rc<RefCell<Option<T>>>,
}

impl<T> CursorRef<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(None)),
        }
    }

    /// Attach an element, replacing any previous one.
    pub fn attach(&self, element: T) {
        *self.inner.borrow_mut() = Some(element);
    }

    /// Detach the element, returning it if one was attached.
    pub fn detach(&self) -> Option<T> {
        self.inner.borrow_mut().take()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Borrow the current element, if any.
    pub fn current(&self) -> Ref<'_, Option<T>> {
        self.inner.borrow()
    }
}

impl<T> Clone for CursorRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for CursorRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_ref_shared_between_clones() {
        let cursor_ref: CursorRef<u32> = CursorRef::new();
        let handle = cursor_ref.clone();
        assert!(!handle.is_attached());

        cursor_ref.attach(7);
        assert!(handle.is_attached());
        assert_eq!(*handle.current(), Some(7));

        assert_eq!(handle.detach(), Some(7));
        assert!(!cursor_ref.is_attached());
        assert_eq!(cursor_ref.detach(), None);
    }
}
