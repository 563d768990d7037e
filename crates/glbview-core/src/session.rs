//! Immersive AR session toggle
//!
//! The renderer owns at most one session through a [`SessionSlot`]. The toggle
//! keeps no state of its own: every click reads the slot to decide whether to
//! request a new session or end the current one, so the button can never
//! disagree with what the renderer is presenting.
//!
//! Everything here runs on the single browser thread. Slot borrows are never
//! held across an `.await`, so a click handler that resumes after a platform
//! promise settles always observes the latest slot contents.

use std::cell::RefCell;

use tracing::{error, info, warn};

use crate::error::SessionError;

/// Observable state of the AR toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Inactive,
    Active,
}

/// Optional session bound to the renderer
#[derive(Debug)]
pub struct SessionSlot<S> {
    session: Option<S>,
    /// An end request for `session` is in flight
    ending: bool,
}

impl<S> Default for SessionSlot<S> {
    fn default() -> Self {
        Self {
            session: None,
            ending: false,
        }
    }
}

impl<S> SessionSlot<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound session, if any
    pub fn current(&self) -> Option<&S> {
        self.session.as_ref()
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Active
        } else {
            SessionState::Inactive
        }
    }

    /// Whether the held session is waiting for the platform to confirm its end
    pub fn is_ending(&self) -> bool {
        self.ending
    }

    /// Bind a session. An occupied slot hands the new session back untouched.
    pub fn bind(&mut self, session: S) -> Result<(), S> {
        if self.session.is_some() {
            return Err(session);
        }
        self.session = Some(session);
        self.ending = false;
        Ok(())
    }

    /// Unbind whatever session is held
    pub fn clear(&mut self) -> Option<S> {
        self.ending = false;
        self.session.take()
    }

    /// Unbind `session` only if it is the one currently held.
    ///
    /// Used by platform end notifications, which may arrive after a newer
    /// session has already been bound.
    pub fn release(&mut self, session: &S) -> bool
    where
        S: PartialEq,
    {
        if self.session.as_ref() == Some(session) {
            self.session = None;
            self.ending = false;
            true
        } else {
            false
        }
    }

    /// Flag or unflag a pending end, only while `session` is still the one held
    fn mark_ending(&mut self, session: &S, ending: bool)
    where
        S: PartialEq,
    {
        if self.session.as_ref() == Some(session) {
            self.ending = ending;
        }
    }
}

/// Platform immersive-session API
///
/// Implemented over `navigator.xr` in the browser and by mocks in tests.
#[allow(async_fn_in_trait)]
pub trait XrPlatform {
    type Session: Clone + PartialEq;

    /// Whether the platform exposes an immersive-reality API at all
    fn is_supported(&self) -> bool;

    /// Request a new immersive AR session
    async fn request_session(&self) -> Result<Self::Session, SessionError>;

    /// End a session; resolves once the platform confirms termination
    async fn end_session(&self, session: &Self::Session) -> Result<(), SessionError>;

    /// Show a blocking message to the user
    fn alert(&self, message: &str);
}

/// Result of one click on the AR toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Inactive -> Active
    Started,
    /// Active -> Inactive
    Ended,
    /// No immersive API; nothing changed
    Unsupported,
    /// The platform refused or failed the request; still Inactive
    RequestFailed(SessionError),
    /// The platform failed to end the session; still Active
    EndFailed(SessionError),
    /// Another session was bound while this request was pending; the new one was ended
    AlreadyActive,
    /// The held session is already being ended; nothing was sent to the platform
    EndPending,
}

/// Handle one click on the AR toggle
pub async fn toggle_session<P: XrPlatform>(
    platform: &P,
    slot: &RefCell<SessionSlot<P::Session>>,
) -> ToggleOutcome {
    if !platform.is_supported() {
        let err = SessionError::Unsupported;
        warn!("{}", err);
        platform.alert(err.alert_message());
        return ToggleOutcome::Unsupported;
    }

    let existing = {
        let slot = slot.borrow();
        let held = slot.current().cloned();
        held.map(|session| (session, slot.is_ending()))
    };

    match existing {
        Some((_, true)) => {
            info!("AR session end already in progress");
            ToggleOutcome::EndPending
        }
        Some((session, false)) => {
            slot.borrow_mut().mark_ending(&session, true);
            let ended = platform.end_session(&session).await;

            // The slot may hold a newer session by now; only this one is unbound
            let mut slot = slot.borrow_mut();
            match ended {
                Ok(()) => {
                    slot.release(&session);
                    info!("AR session ended");
                    ToggleOutcome::Ended
                }
                Err(err) => {
                    slot.mark_ending(&session, false);
                    drop(slot);
                    error!("{}", err);
                    platform.alert(err.alert_message());
                    ToggleOutcome::EndFailed(err)
                }
            }
        }
        None => match platform.request_session().await {
            Ok(session) => {
                let rejected = slot.borrow_mut().bind(session);
                match rejected {
                    Ok(()) => {
                        info!("AR session started");
                        ToggleOutcome::Started
                    }
                    Err(extra) => {
                        warn!("AR session already bound, ending duplicate request");
                        if let Err(err) = platform.end_session(&extra).await {
                            error!("{}", err);
                        }
                        ToggleOutcome::AlreadyActive
                    }
                }
            }
            Err(err) => {
                error!("{}", err);
                platform.alert(err.alert_message());
                ToggleOutcome::RequestFailed(err)
            }
        },
    }
}
