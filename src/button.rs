//! Toolbar button presentation for the foreground tab.

use crate::target::WatchTarget;

/// Label shown while polling is off for a local-file tab.
pub const ENABLE_LABEL: &str = "Enable auto-(file)update for this tab";

/// Label shown while polling is on for a local-file tab.
pub const DISABLE_LABEL: &str = "Disable auto-(file)update for this tab";

/// Label shown for tabs that aren't local files.
pub const NOT_LOCAL_LABEL: &str = "Only works with local files!";

/// Which icon set the button shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Active,
    Inactive,
}

/// The rendered state of the per-tab toolbar button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonState {
    pub disabled: bool,
    pub label: &'static str,
    pub icon: Icon,
}

/// Computes the button state for a foreground tab.
///
/// `target` is the registry entry for that tab. A tab has an entry iff
/// it is an open local-file tab, so an absent entry renders the button
/// disabled.
pub fn for_tab(target: Option<&WatchTarget>) -> ButtonState {
    match target {
        Some(target) if target.polling() => ButtonState {
            disabled: false,
            label: DISABLE_LABEL,
            icon: Icon::Active,
        },
        Some(_) => ButtonState {
            disabled: false,
            label: ENABLE_LABEL,
            icon: Icon::Inactive,
        },
        None => ButtonState {
            disabled: true,
            label: NOT_LOCAL_LABEL,
            icon: Icon::Inactive,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabId;
    use crate::target::{Baseline, WatchTarget};
    use url::Url;

    fn target() -> WatchTarget {
        WatchTarget {
            tab: TabId(1),
            url: Url::parse("file:///tmp/page.html").unwrap(),
            timer: None,
            baseline: Baseline::Unpolled,
        }
    }

    #[test]
    fn non_local_tab_disables_button() {
        let state = for_tab(None);
        assert!(state.disabled);
        assert_eq!(state.label, NOT_LOCAL_LABEL);
        assert_eq!(state.icon, Icon::Inactive);
    }

    #[test]
    fn inactive_target_offers_enable() {
        let target = target();
        let state = for_tab(Some(&target));
        assert!(!state.disabled);
        assert_eq!(state.label, ENABLE_LABEL);
        assert_eq!(state.icon, Icon::Inactive);
    }

    #[tokio::test]
    async fn active_target_offers_disable() {
        let mut target = target();
        target.timer = Some(tokio::spawn(async {}));

        let state = for_tab(Some(&target));
        assert!(!state.disabled);
        assert_eq!(state.label, DISABLE_LABEL);
        assert_eq!(state.icon, Icon::Active);
    }
}
