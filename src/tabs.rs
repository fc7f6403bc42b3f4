//! The event/command surface between the controller and the browser.
//!
//! The browser side of the extension forwards tab lifecycle and UI
//! notifications as [Event]s, and applies the [Command]s the controller
//! emits in response. Nothing in this crate touches the browser directly.

use crate::button::ButtonState;

/// Opaque identifier of a browser tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TabId(pub u64);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification from the browser or its preference store.
#[derive(Clone, Debug)]
pub enum Event {
    /// A tab finished loading a document at `url`.
    TabReady { tab: TabId, url: String },

    /// A tab was brought to the foreground.
    ///
    /// Also sent once per already-open tab at startup, so the controller
    /// can synchronize with tabs that predate it.
    TabActivated { tab: TabId, url: String },

    /// A tab was closed.
    TabClosed { tab: TabId },

    /// The toolbar button was clicked. Applies to the foreground tab.
    ButtonClicked,

    /// The poll-interval preference changed, in milliseconds.
    ///
    /// The value is clamped on receipt; see [crate::prefs].
    CheckRateChanged(u64),
}

/// A request for the browser side to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reload the given tab.
    Reload(TabId),

    /// Render the toolbar button for the given tab.
    Button { tab: TabId, state: ButtonState },
}
