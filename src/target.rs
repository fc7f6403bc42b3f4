//! Watch targets and the registry that owns them.

use std::time::SystemTime;

use tokio::task::JoinHandle;
use url::Url;

use crate::tabs::TabId;

/// The last recorded metadata for a target's file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    /// No poll has completed yet. The first successful poll records a
    /// baseline without reloading.
    Unpolled,

    /// Metadata recorded by the most recent baseline-updating poll.
    Polled { size: u64, modified: SystemTime },
}

/// One tracked tab: its last-known URL, poll timer, and baseline.
#[derive(Debug)]
pub struct WatchTarget {
    pub tab: TabId,
    pub url: Url,

    /// Handle of the recurring poll timer task, or `None` while polling
    /// is toggled off for this tab.
    pub timer: Option<JoinHandle<()>>,

    pub baseline: Baseline,
}

impl WatchTarget {
    /// Whether a poll timer is currently running for this target.
    pub fn polling(&self) -> bool {
        self.timer.is_some()
    }
}

/// All currently-tracked tabs.
///
/// One entry per open local-file tab. Backed by a plain list with linear
/// lookup: the registry holds a handful of entries at most.
#[derive(Debug, Default)]
pub struct Registry {
    targets: Vec<WatchTarget>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the target tracked for `tab`, if any.
    pub fn find(&self, tab: TabId) -> Option<&WatchTarget> {
        self.targets.iter().find(|t| t.tab == tab)
    }

    pub fn find_mut(&mut self, tab: TabId) -> Option<&mut WatchTarget> {
        self.targets.iter_mut().find(|t| t.tab == tab)
    }

    /// Inserts a fresh target for `tab` with no timer and no baseline.
    ///
    /// If the tab is already tracked, the registry is left unchanged and
    /// the existing entry is returned.
    pub fn register(&mut self, tab: TabId, url: Url) -> &mut WatchTarget {
        if let Some(index) = self.targets.iter().position(|t| t.tab == tab) {
            return &mut self.targets[index];
        }

        let index = self.targets.len();
        self.targets.push(WatchTarget {
            tab,
            url,
            timer: None,
            baseline: Baseline::Unpolled,
        });
        &mut self.targets[index]
    }

    /// Removes the target for `tab`, aborting its poll timer if one is
    /// running. No-op if the tab isn't tracked.
    pub fn remove(&mut self, tab: TabId) {
        if let Some(index) = self.targets.iter().position(|t| t.tab == tab) {
            let target = self.targets.swap_remove(index);
            if let Some(timer) = target.timer {
                timer.abort();
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchTarget> {
        self.targets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WatchTarget> {
        self.targets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
