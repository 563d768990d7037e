//! WebXR binding for the AR toggle button
//!
//! web-sys only exposes its WebXR types behind `web_sys_unstable_apis`, so the
//! few calls needed here go through `js_sys::Reflect` on `navigator.xr`.

use std::cell::RefCell;
use std::rc::Rc;

use glbview_core::{toggle_session, SessionError, SessionSlot, ToggleOutcome, XrPlatform};
use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const SESSION_MODE: &str = "immersive-ar";

/// Session slot shared between the toggle button and the bevy app
pub type SharedSlot = Rc<RefCell<SessionSlot<JsValue>>>;

/// `navigator.xr` backed platform
pub struct WebXrPlatform {
    window: web_sys::Window,
}

impl WebXrPlatform {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }

    fn xr(&self) -> Option<JsValue> {
        let xr = Reflect::get(&self.window.navigator(), &JsValue::from_str("xr")).ok()?;
        (!xr.is_undefined() && !xr.is_null()).then_some(xr)
    }
}

impl XrPlatform for WebXrPlatform {
    type Session = JsValue;

    fn is_supported(&self) -> bool {
        self.xr().is_some()
    }

    async fn request_session(&self) -> Result<JsValue, SessionError> {
        let xr = self.xr().ok_or(SessionError::Unsupported)?;
        let args = Array::of1(&JsValue::from_str(SESSION_MODE));

        let promise = call_method(&xr, "requestSession", &args)
            .map_err(|e| SessionError::Request(describe(&e)))?;
        await_promise(promise)
            .await
            .map_err(|e| SessionError::Request(describe(&e)))
    }

    async fn end_session(&self, session: &JsValue) -> Result<(), SessionError> {
        let promise = call_method(session, "end", &Array::new())
            .map_err(|e| SessionError::End(describe(&e)))?;
        await_promise(promise)
            .await
            .map(|_| ())
            .map_err(|e| SessionError::End(describe(&e)))
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::error!("alert failed: {}", describe(&e));
        }
    }
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    method.apply(target, args)
}

async fn await_promise(value: JsValue) -> Result<JsValue, JsValue> {
    let promise: Promise = value.dyn_into()?;
    JsFuture::from(promise).await
}

fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        String::from(err.to_string())
    } else if let Some(text) = value.as_string() {
        text
    } else {
        format!("{:?}", value)
    }
}

/// Clear the slot when the platform ends `session` on its own (system UI, tracking loss)
fn release_on_end(slot: &SharedSlot, session: &JsValue) -> Result<(), JsValue> {
    let target: web_sys::EventTarget = session.clone().dyn_into()?;
    let slot = slot.clone();
    let ended = session.clone();

    let on_end = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if slot.borrow_mut().release(&ended) {
            tracing::info!("AR session ended by the platform");
        }
    }) as Box<dyn FnMut(_)>);

    target.add_event_listener_with_callback("end", on_end.as_ref().unchecked_ref())?;
    on_end.forget();
    Ok(())
}

/// Wire the AR toggle to the button with id `button_id`
///
/// Returns the session slot the toggle writes to, for the renderer to hold.
pub fn install_ar_button(button_id: &str) -> Result<SharedSlot, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let button = document
        .get_element_by_id(button_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{} button", button_id)))?;

    let platform = Rc::new(WebXrPlatform::new(window));
    let slot: SharedSlot = Rc::new(RefCell::new(SessionSlot::new()));

    let click_slot = slot.clone();
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let platform = platform.clone();
        let slot = click_slot.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = toggle_session(platform.as_ref(), &*slot).await;
            if outcome == ToggleOutcome::Started {
                let session = slot.borrow().current().cloned();
                if let Some(session) = session {
                    if let Err(e) = release_on_end(&slot, &session) {
                        tracing::warn!("could not watch AR session end: {}", describe(&e));
                    }
                }
            }
        });
    }) as Box<dyn FnMut(_)>);

    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();

    tracing::info!("AR toggle bound to #{}", button_id);
    Ok(slot)
}
