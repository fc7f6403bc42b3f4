//! Core logic for an auto-reload browser extension: watches the files
//! behind locally-opened `file://` tabs and requests a tab reload when
//! they change on disk.
//!
//! The crate is browser-agnostic. The embedding glue forwards tab
//! lifecycle, toolbar, and preference notifications as [tabs::Event]s,
//! and applies the [tabs::Command]s the controller emits:
//!
//! ```no_run
//! use tabwatch::prefs::Prefs;
//! use tabwatch::tabs::{Event, TabId};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (event_tx, event_rx) = tokio::sync::mpsc::channel(16);
//! let (command_tx, mut command_rx) = tokio::sync::mpsc::channel(16);
//! tokio::spawn(tabwatch::watch::run(Prefs::default(), event_rx, command_tx));
//!
//! event_tx
//!     .send(Event::TabReady {
//!         tab: TabId(1),
//!         url: "file:///home/dev/preview.html".into(),
//!     })
//!     .await
//!     .unwrap();
//!
//! while let Some(command) = command_rx.recv().await {
//!     // Apply Reload / Button commands to the browser.
//!     let _ = command;
//! }
//! # }
//! ```
//!
//! Each tracked tab polls its file's size and modification time on a
//! recurring timer; either changing triggers a reload. Polling is
//! toggleable per tab from the toolbar button, and the poll interval is
//! a single shared preference.

pub mod button;
pub mod poll;
pub mod prefs;
pub mod tabs;
pub mod target;
pub mod watch;

pub use prefs::Prefs;
pub use tabs::{Command, Event, TabId};
