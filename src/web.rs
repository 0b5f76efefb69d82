//! Browser bindings.
//!
//! Wires the follower to `requestAnimationFrame`, a passive document-level
//! `mousemove` listener and an `HtmlElement`, and exports the result to JS
//! as [`CursorEffect`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, HtmlElement, MouseEvent, Window};

use crate::config::CursorConfig;
use crate::error::{CursorError, CursorResult};
use crate::follower::{CoalescePolicy, CursorFollower};
use crate::host::{CursorTarget, FrameScheduler, PointerSource};
use crate::style::{compute_styles, css_property_name, StyleDescriptor};

const POINTER_MOVE_EVENT: &str = "mousemove";

/// `requestAnimationFrame` / `cancelAnimationFrame` on the window.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window, callback: Closure<dyn FnMut(f64)>) -> Self {
        Self { window, callback }
    }

    fn function(&self) -> &js_sys::Function {
        self.callback.as_ref().unchecked_ref()
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> CursorResult<i32> {
        self.window
            .request_animation_frame(self.function())
            .map_err(|e| CursorError::dom("requestAnimationFrame", e))
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::warn!("[Cursor] {}", CursorError::dom("cancelAnimationFrame", e));
        }
    }
}

/// Passive `mousemove` listener on the document.
pub struct DocumentPointerSource {
    document: Document,
    listener: Closure<dyn FnMut(MouseEvent)>,
}

impl DocumentPointerSource {
    pub fn new(document: Document, listener: Closure<dyn FnMut(MouseEvent)>) -> Self {
        Self { document, listener }
    }

    fn function(&self) -> &js_sys::Function {
        self.listener.as_ref().unchecked_ref()
    }
}

impl PointerSource for DocumentPointerSource {
    fn subscribe(&mut self) -> CursorResult<()> {
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        self.document
            .add_event_listener_with_callback_and_add_event_listener_options(
                POINTER_MOVE_EVENT,
                self.function(),
                &options,
            )
            .map_err(|e| CursorError::dom("addEventListener", e))
    }

    fn unsubscribe(&mut self) {
        if let Err(e) = self
            .document
            .remove_event_listener_with_callback(POINTER_MOVE_EVENT, self.function())
        {
            log::warn!("[Cursor] {}", CursorError::dom("removeEventListener", e));
        }
    }
}

impl CursorTarget for HtmlElement {
    fn rendered_size(&self) -> (f64, f64) {
        (self.offset_width() as f64, self.offset_height() as f64)
    }

    fn set_transform(&self, transform: &str) {
        if let Err(e) = self.style().set_property("transform", transform) {
            log::warn!("[Cursor] {}", CursorError::dom("set transform", e));
        }
    }

    fn apply_styles(&self, styles: &StyleDescriptor) {
        let declaration = self.style();
        for (name, value) in styles.iter() {
            if let Err(e) = declaration.set_property(&css_property_name(name), value) {
                log::warn!("[Cursor] {}", CursorError::dom(name, e));
            }
        }
    }

    fn remove_style(&self, name: &str) {
        if let Err(e) = self.style().remove_property(&css_property_name(name)) {
            log::warn!("[Cursor] {}", CursorError::dom(name, e));
        }
    }
}

type WebFollower = CursorFollower<AnimationFrameScheduler, DocumentPointerSource, HtmlElement>;

/// Run `f` against the follower if it is still alive and not busy.
/// Returns whether `f` ran.
///
/// A dropped paint leaves its frame marked pending, which stalls a
/// `KeepPending` follower until restarted, hence the warning.
fn with_follower<F>(weak: &Weak<RefCell<F>>, f: impl FnOnce(&mut F)) -> bool {
    let Some(follower) = weak.upgrade() else {
        return false;
    };
    let ran = match follower.try_borrow_mut() {
        Ok(mut follower) => {
            f(&mut follower);
            true
        }
        Err(_) => {
            log::warn!("[Cursor] Follower busy, dropping callback");
            false
        }
    };
    ran
}

/// Cursor-following effect exported to JS.
///
/// ```js
/// const cursor = new CursorEffect({ size: 24, shape: "square" });
/// cursor.attach(document.getElementById("cursor"));
/// cursor.start();
/// // ...
/// cursor.free(); // stops and releases everything
/// ```
#[wasm_bindgen]
pub struct CursorEffect {
    follower: Rc<RefCell<WebFollower>>,
}

#[wasm_bindgen]
impl CursorEffect {
    /// Create an effect from a config object (any subset of options).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CursorEffect, JsValue> {
        let config = CursorConfig::from_js(config)?;
        let window = web_sys::window().ok_or(CursorError::NoWindow)?;
        let document = window.document().ok_or(CursorError::NoDocument)?;

        let follower = Rc::new_cyclic(|weak: &Weak<RefCell<WebFollower>>| {
            let on_frame = {
                let weak = weak.clone();
                Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
                    with_follower(&weak, |follower| follower.paint());
                })
            };
            let on_move = {
                let weak = weak.clone();
                Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                    with_follower(&weak, |follower| {
                        follower.pointer_moved(event.client_x() as f64, event.client_y() as f64)
                    });
                })
            };

            RefCell::new(CursorFollower::new(
                config,
                AnimationFrameScheduler::new(window, on_frame),
                DocumentPointerSource::new(document, on_move),
            ))
        });

        log::debug!("[Cursor] Effect created");
        Ok(CursorEffect { follower })
    }

    /// Attach the cursor element and apply the current styles to it.
    pub fn attach(&self, element: HtmlElement) {
        self.follower.borrow_mut().attach(element);
    }

    /// Detach the cursor element. Pending frames become no-ops.
    #[wasm_bindgen(js_name = detachElement)]
    pub fn detach_element(&self) -> Option<HtmlElement> {
        self.follower.borrow().cursor_ref().detach()
    }

    /// Start following the pointer.
    pub fn start(&self) -> Result<(), JsValue> {
        self.follower.borrow_mut().start()?;
        Ok(())
    }

    /// Stop following: cancels any pending frame and removes the listener.
    pub fn stop(&self) {
        self.follower.borrow_mut().stop();
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.follower.borrow().is_running()
    }

    /// Only schedule a new frame when none is pending, instead of
    /// cancelling and rescheduling on every move.
    #[wasm_bindgen(js_name = setKeepPending)]
    pub fn set_keep_pending(&self, keep_pending: bool) {
        let policy = if keep_pending {
            CoalescePolicy::KeepPending
        } else {
            CoalescePolicy::Reschedule
        };
        self.follower.borrow_mut().set_policy(policy);
    }

    /// Replace the configuration and restyle the attached element.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, config: JsValue) -> Result<(), JsValue> {
        let config = CursorConfig::from_js(config)?;
        let mut follower = self.follower.borrow_mut();
        follower.set_config(config);
        follower.apply_styles();
        Ok(())
    }

    /// Current styles as a JS style object (camelCase keys).
    pub fn styles(&self) -> Result<JsValue, JsValue> {
        let styles = self.follower.borrow_mut().styles();
        serde_wasm_bindgen::to_value(&*styles)
            .map_err(|e| CursorError::InvalidConfig(e.to_string()).into())
    }

    /// Current styles as a CSS declaration block.
    #[wasm_bindgen(js_name = cssText)]
    pub fn css_text(&self) -> String {
        self.follower.borrow_mut().styles().to_css_text()
    }
}

/// Styles for a config without creating an effect, for callers that manage
/// the element's style themselves.
#[wasm_bindgen(js_name = cursorStyles)]
pub fn cursor_styles(config: JsValue) -> Result<JsValue, JsValue> {
    let config = CursorConfig::from_js(config)?;
    serde_wasm_bindgen::to_value(&compute_styles(&config))
        .map_err(|e| CursorError::InvalidConfig(e.to_string()).into())
}
