//! AR session as seen from the render side
//!
//! The page's AR toggle and the bevy app share one [`SessionSlot`]. The app
//! holds it as a non-send [`ArSession`] resource and mirrors its state into
//! [`ArStatus`] once per frame, so systems can react to the session without
//! touching the browser-side handle.
//!
//! The session is tracked but frames are not submitted to an XR layer: while
//! Active the viewer keeps rendering to its canvas with a transparent clear
//! and hides the egui overlay.

use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;
use glbview_core::{SessionSlot, SessionState};

/// Renderer-side handle to the shared session slot
///
/// Non-send: the slot lives on the browser's main thread.
pub struct ArSession {
    state: Box<dyn Fn() -> Option<SessionState>>,
}

impl ArSession {
    pub fn new<S: 'static>(slot: Rc<RefCell<SessionSlot<S>>>) -> Self {
        Self {
            // `None` while the toggle is mid-update
            state: Box::new(move || slot.try_borrow().ok().map(|slot| slot.state())),
        }
    }

    pub fn state(&self) -> Option<SessionState> {
        (self.state)()
    }
}

/// Session state as of the start of this frame
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArStatus(pub SessionState);

impl Default for ArStatus {
    fn default() -> Self {
        Self(SessionState::Inactive)
    }
}

impl ArStatus {
    pub fn is_active(&self) -> bool {
        self.0 == SessionState::Active
    }
}

pub struct ArSessionPlugin;

impl Plugin for ArSessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArStatus>()
            .add_systems(PreUpdate, sync_ar_status);
    }
}

/// Copy the shared slot state into [`ArStatus`]
pub fn sync_ar_status(
    session: Option<NonSend<ArSession>>,
    mut status: ResMut<ArStatus>,
    mut clear_color: ResMut<ClearColor>,
) {
    let Some(state) = session.and_then(|session| session.state()) else {
        return;
    };
    if status.0 == state {
        return;
    }

    status.0 = state;
    match state {
        SessionState::Active => {
            // Passthrough must show behind the model
            clear_color.0 = Color::NONE;
            tracing::info!("Renderer bound to AR session");
        }
        SessionState::Inactive => tracing::info!("Renderer released AR session"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ar_app() -> App {
        let mut app = App::new();
        app.insert_resource(ClearColor(Color::BLACK))
            .add_plugins(ArSessionPlugin);
        app
    }

    #[test]
    fn test_bound_session_visible_in_app() {
        let slot = Rc::new(RefCell::new(SessionSlot::new()));
        let mut app = ar_app();
        app.insert_non_send_resource(ArSession::new(slot.clone()));

        app.update();
        assert!(!app.world().resource::<ArStatus>().is_active());

        slot.borrow_mut().bind(7u32).unwrap();
        app.update();
        assert!(app.world().resource::<ArStatus>().is_active());
        assert_eq!(app.world().resource::<ClearColor>().0, Color::NONE);

        assert!(slot.borrow_mut().release(&7));
        app.update();
        assert_eq!(
            *app.world().resource::<ArStatus>(),
            ArStatus(SessionState::Inactive)
        );
    }

    #[test]
    fn test_busy_slot_keeps_last_status() {
        let slot = Rc::new(RefCell::new(SessionSlot::new()));
        slot.borrow_mut().bind(1u32).unwrap();
        let mut app = ar_app();
        app.insert_non_send_resource(ArSession::new(slot.clone()));
        app.update();

        let _toggle = slot.borrow_mut();
        app.update();
        assert!(app.world().resource::<ArStatus>().is_active());
    }

    #[test]
    fn test_without_session_stays_inactive() {
        let mut app = ar_app();
        app.update();
        assert!(!app.world().resource::<ArStatus>().is_active());
    }
}
