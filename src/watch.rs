//! The watch controller: an event loop that tracks local-file tabs, runs
//! their poll timers, and emits reload and button commands.
//!
//! All registry and interval mutation happens on the one task running
//! [run]. Poll timers and metadata lookups are spawned tasks that only
//! report back over an internal channel, so there is no shared mutable
//! state and a lookup that resolves after its tab closed is simply
//! discarded.

use std::io;
use std::time::Duration;

use tokio::sync::mpsc;
use url::Url;

use crate::button;
use crate::poll::{self, PollAction, Snapshot};
use crate::prefs::Prefs;
use crate::tabs::{Command, Event, TabId};
use crate::target::{Baseline, Registry, WatchTarget};

/// Messages the controller's spawned tasks send back to it.
#[derive(Debug)]
enum Msg {
    /// A target's poll timer ticked.
    Tick(TabId),

    /// A spawned metadata lookup finished.
    Polled {
        tab: TabId,
        result: io::Result<Snapshot>,
    },
}

/// Runs the controller until the event channel closes.
///
/// Consumes browser and preference [Event]s from `events` and emits
/// [Command]s on `commands`. The embedding glue should send one
/// [Event::TabActivated] per already-open tab right after startup to
/// synchronize with tabs that predate the controller.
pub async fn run(prefs: Prefs, events: mpsc::Receiver<Event>, commands: mpsc::Sender<Command>) {
    let (msg_tx, msg_rx) = mpsc::unbounded_channel();

    let controller = Controller {
        registry: Registry::new(),
        prefs,
        commands,
        msg_tx,
        active_tab: None,
    };

    controller.run(events, msg_rx).await
}

struct Controller {
    registry: Registry,
    prefs: Prefs,
    commands: mpsc::Sender<Command>,
    /// Cloned into each timer and lookup task.
    msg_tx: mpsc::UnboundedSender<Msg>,
    /// The tab currently in the foreground, once one has been activated.
    active_tab: Option<TabId>,
}

impl Controller {
    async fn run(
        mut self,
        mut events: mpsc::Receiver<Event>,
        mut msgs: mpsc::UnboundedReceiver<Msg>,
    ) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
                Some(msg) = msgs.recv() => self.handle_msg(msg).await,
            }
        }
        tracing::debug!("event channel closed, watch controller stopping");
    }

    async fn handle_event(&mut self, event: Event) {
        match event {
            Event::TabReady { tab, url } => self.on_ready(tab, &url).await,
            Event::TabActivated { tab, url } => self.on_activate(tab, &url).await,
            Event::TabClosed { tab } => self.on_close(tab),
            Event::ButtonClicked => self.on_button_click().await,
            Event::CheckRateChanged(rate_ms) => self.on_check_rate(rate_ms),
        }
    }

    async fn handle_msg(&mut self, msg: Msg) {
        match msg {
            Msg::Tick(tab) => self.on_tick(tab),
            Msg::Polled { tab, result } => self.on_polled(tab, result).await,
        }
    }

    /// Handles a tab reaching its ready state.
    ///
    /// Local-file tabs get a target, starting with polling enabled when
    /// the `default_enabled` preference is on. A tracked tab whose URL
    /// no longer denotes a local file loses its target.
    async fn on_ready(&mut self, tab: TabId, url: &str) {
        match local_file_url(url) {
            Some(url) => match self.registry.find_mut(tab) {
                Some(target) => {
                    if target.url != url {
                        // The tab navigated to a different local file; keep
                        // the toggle state but start over on the baseline.
                        tracing::debug!("tab {tab} moved to {url}");
                        target.url = url;
                        target.baseline = Baseline::Unpolled;
                    }
                }
                None => {
                    tracing::debug!("tracking tab {tab}: {url}");
                    let rate = self.prefs.file_check_rate;
                    let default_enabled = self.prefs.default_enabled;
                    let target = self.registry.register(tab, url);
                    if default_enabled {
                        start_polling(target, rate, &self.msg_tx);
                    }
                }
            },
            None => {
                if self.registry.find(tab).is_some() {
                    tracing::debug!("tab {tab} left its local file, dropping");
                    self.registry.remove(tab);
                }
            }
        }
        self.send_button(tab).await;
    }

    /// Handles a tab being brought to the foreground.
    ///
    /// A tab moved between windows fires activate without a fresh ready
    /// event, so an unknown tab is run through the ready path here.
    async fn on_activate(&mut self, tab: TabId, url: &str) {
        self.active_tab = Some(tab);
        if self.registry.find(tab).is_none() {
            self.on_ready(tab, url).await;
        } else {
            self.send_button(tab).await;
        }
    }

    fn on_close(&mut self, tab: TabId) {
        if self.registry.find(tab).is_some() {
            tracing::debug!("tab {tab} closed, dropping");
            self.registry.remove(tab);
        }
        if self.active_tab == Some(tab) {
            self.active_tab = None;
        }
    }

    /// Toggles polling for the foreground tab.
    async fn on_button_click(&mut self) {
        let Some(tab) = self.active_tab else {
            tracing::debug!("button clicked before any tab activated");
            return;
        };
        let rate = self.prefs.file_check_rate;
        let Some(target) = self.registry.find_mut(tab) else {
            // The button is disabled for untracked tabs; a click that
            // still arrives for one is ignored.
            return;
        };

        if target.polling() {
            tracing::info!("polling disabled for tab {tab}");
            stop_polling(target);
        } else {
            tracing::info!("polling enabled for tab {tab}");
            start_polling(target, rate, &self.msg_tx);
        }
        self.send_button(tab).await;
    }

    /// Applies a new poll interval and restarts every running timer at
    /// it. Toggle state and baselines are preserved.
    fn on_check_rate(&mut self, rate_ms: u64) {
        let rate = self.prefs.set_check_rate(rate_ms);
        tracing::info!("poll interval is now {rate}ms");

        for target in self.registry.iter_mut() {
            if target.polling() {
                stop_polling(target);
                start_polling(target, rate, &self.msg_tx);
            }
        }
    }

    /// Starts a metadata lookup for a target's file.
    ///
    /// The lookup runs as its own task so a slow filesystem never stalls
    /// other timers or tab events; its result is applied in [Self::on_polled]
    /// if the target still exists by then.
    fn on_tick(&mut self, tab: TabId) {
        let Some(target) = self.registry.find(tab) else {
            // A tick from a timer that was aborted this same instant.
            return;
        };
        let Some(path) = poll::file_path(&target.url) else {
            tracing::warn!("tab {tab} has no local path: {}", target.url);
            return;
        };

        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = poll::stat(&path).await;
            let _ = msg_tx.send(Msg::Polled { tab, result });
        });
    }

    /// Applies a finished metadata lookup.
    async fn on_polled(&mut self, tab: TabId, result: io::Result<Snapshot>) {
        let Some(target) = self.registry.find_mut(tab) else {
            // The tab closed (or left its file) while the lookup was in
            // flight; the result no longer means anything.
            tracing::debug!("discarding poll result for untracked tab {tab}");
            return;
        };

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Editors that save via rename make the file vanish
                // briefly; keep the target and retry on the next tick.
                tracing::debug!("{}: no such file", target.url);
                return;
            }
            Err(e) => {
                tracing::warn!("poll failed for {}: {e}", target.url);
                return;
            }
        };

        let action = poll::compare(target.baseline, snapshot);
        if action == PollAction::Unchanged {
            return;
        }
        target.baseline = snapshot.into();

        if action == PollAction::Reload {
            tracing::info!("{} changed, reloading tab {tab}", target.url);
            let _ = self.commands.send(Command::Reload(tab)).await;
        }
    }

    /// Emits the current button state for `tab`.
    async fn send_button(&mut self, tab: TabId) {
        let state = button::for_tab(self.registry.find(tab));
        let _ = self.commands.send(Command::Button { tab, state }).await;
    }
}

/// Parses `url`, returning it iff it denotes a local file.
fn local_file_url(url: &str) -> Option<Url> {
    let url = Url::parse(url).ok()?;
    (url.scheme() == "file").then_some(url)
}

/// Starts a recurring poll timer for a target. No-op if one is already
/// running.
fn start_polling(target: &mut WatchTarget, rate_ms: u64, msg_tx: &mpsc::UnboundedSender<Msg>) {
    if target.timer.is_some() {
        return;
    }

    let tab = target.tab;
    let msg_tx = msg_tx.clone();
    let period = Duration::from_millis(rate_ms);

    target.timer = Some(tokio::spawn(async move {
        let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            // The controller dropping its receiver ends this task.
            if msg_tx.send(Msg::Tick(tab)).is_err() {
                break;
            }
        }
    }));
}

/// Stops a target's poll timer, if one is running.
fn stop_polling(target: &mut WatchTarget) {
    if let Some(timer) = target.timer.take() {
        timer.abort();
    }
}
