//! Pointer-following effect.
//!
//! Every pointer move overwrites the stored position immediately; painting
//! is deferred to the next paint cycle and coalesced so the element moves at
//! most once per frame no matter how fast moves arrive. The paint step reads
//! the latest position, not the one seen when the frame was requested.
//!
//! Lifecycle is explicit: [`CursorFollower::start`] subscribes to pointer
//! moves and [`CursorFollower::stop`] cancels any pending frame and
//! unsubscribes. Dropping the follower stops it, so no frame can fire
//! against an element whose effect is gone.

use std::rc::Rc;

use crate::config::CursorConfig;
use crate::error::CursorResult;
use crate::host::{CursorRef, CursorTarget, FrameScheduler, PointerSource};
use crate::position::PointerPosition;
use crate::style::{StyleDescriptor, StyleMemo};

/// How a move behaves while a frame is already pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoalescePolicy {
    /// Cancel the pending frame and request a fresh one.
    #[default]
    Reschedule,
    /// Keep the pending frame; it will read the newest position anyway.
    KeepPending,
}

/// Per-attachment state. Exists only between `start` and `stop`.
#[derive(Debug)]
struct Session<H> {
    position: PointerPosition,
    pending: Option<H>,
}

/// Keeps a target element centered on the pointer.
pub struct CursorFollower<S, P, T>
where
    S: FrameScheduler,
    P: PointerSource,
    T: CursorTarget,
{
    config: CursorConfig,
    styles: StyleMemo,
    target: CursorRef<T>,
    scheduler: S,
    pointer: P,
    policy: CoalescePolicy,
    session: Option<Session<S::Handle>>,
    // last descriptor written to the element, to clear dropped properties
    applied: Option<Rc<StyleDescriptor>>,
}

impl<S, P, T> CursorFollower<S, P, T>
where
    S: FrameScheduler,
    P: PointerSource,
    T: CursorTarget,
{
    pub fn new(config: CursorConfig, scheduler: S, pointer: P) -> Self {
        Self {
            config,
            styles: StyleMemo::new(),
            target: CursorRef::new(),
            scheduler,
            pointer,
            policy: CoalescePolicy::default(),
            session: None,
            applied: None,
        }
    }

    pub fn with_policy(mut self, policy: CoalescePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_policy(&mut self, policy: CoalescePolicy) {
        self.policy = policy;
    }

    /// Handle the caller attaches the cursor element to.
    pub fn cursor_ref(&self) -> CursorRef<T> {
        self.target.clone()
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Replace the configuration. Styles are recomputed lazily and only if
    /// something they depend on changed.
    pub fn set_config(&mut self, config: CursorConfig) {
        self.config = config;
    }

    /// Current style descriptor for the cursor element.
    pub fn styles(&mut self) -> Rc<StyleDescriptor> {
        self.styles.styles(&self.config)
    }

    /// Attach the cursor element and style it from scratch.
    pub fn attach(&mut self, element: T) {
        self.applied = None;
        self.target.attach(element);
        self.apply_styles();
    }

    /// Apply the current styles to the attached element, if any.
    ///
    /// Properties written by the previous call that are no longer part of
    /// the styles are removed, so the element's inline style tracks
    /// [`CursorFollower::styles`]. The paint transform is never touched.
    pub fn apply_styles(&mut self) {
        let styles = self.styles();
        let target = self.target.current();
        let Some(element) = target.as_ref() else {
            return;
        };

        if let Some(previous) = &self.applied {
            for (name, _) in previous.iter() {
                if styles.get(name).is_none() {
                    element.remove_style(name);
                }
            }
        }
        element.apply_styles(&styles);
        self.applied = Some(styles);
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a paint frame is outstanding.
    pub fn has_pending_frame(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.pending.is_some())
    }

    /// Last recorded pointer position while running.
    pub fn position(&self) -> Option<PointerPosition> {
        self.session.as_ref().map(|session| session.position)
    }

    /// Subscribe to pointer moves. Starting a running follower is a no-op.
    pub fn start(&mut self) -> CursorResult<()> {
        if self.session.is_some() {
            return Ok(());
        }
        self.pointer.subscribe()?;
        self.session = Some(Session {
            position: PointerPosition::default(),
            pending: None,
        });
        log::debug!("[Cursor] Follower started");
        Ok(())
    }

    /// Cancel any pending frame and unsubscribe. Safe to call repeatedly;
    /// only the first call after `start` does anything.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(handle) = session.pending {
            self.scheduler.cancel_frame(handle);
        }
        self.pointer.unsubscribe();
        log::debug!("[Cursor] Follower stopped");
    }

    /// Record a pointer move and make sure a paint frame is pending.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.position = PointerPosition::new(x, y);

        if let Some(handle) = session.pending {
            match self.policy {
                CoalescePolicy::KeepPending => return,
                CoalescePolicy::Reschedule => {
                    self.scheduler.cancel_frame(handle);
                    session.pending = None;
                }
            }
        }

        match self.scheduler.request_frame() {
            Ok(handle) => session.pending = Some(handle),
            Err(e) => log::warn!("[Cursor] Failed to request frame: {}", e),
        }
    }

    /// Paint step, run by the host when the pending frame comes due.
    ///
    /// Centers the attached element on the latest pointer position. Without
    /// an attached element this does nothing; the next move reschedules.
    pub fn paint(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.pending = None;

        let target = self.target.current();
        let Some(element) = target.as_ref() else {
            log::trace!("[Cursor] No element attached, skipping frame");
            return;
        };
        let (width, height) = element.rendered_size();
        element.set_transform(&session.position.centered_transform(width, height));
    }
}

impl<S, P, T> Drop for CursorFollower<S, P, T>
where
    S: FrameScheduler,
    P: PointerSource,
    T: CursorTarget,
{
    fn drop(&mut self) {
        self.stop();
    }
}
