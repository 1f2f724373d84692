//! End-to-end bar behavior on tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use skillbars::bars::{
    BarManager, MemoryDisplays, ModeTable, NotificationBroadcaster, Notice, SettingTarget,
    TokioScheduler, VisibilityMode, default_mode, default_mode_table,
};
use skillbars::{Skill, SkillProgress, SubjectId};
use tokio::sync::broadcast;
use tokio::time::{Instant, sleep, sleep_until};

const TICK: Duration = Duration::from_millis(50);
const QUIET: Duration = Duration::from_secs(3);

struct Harness {
    manager: BarManager,
    displays: MemoryDisplays,
    progress: Arc<SkillProgress>,
    notices: broadcast::Receiver<(SubjectId, Notice)>,
}

impl Harness {
    fn new(modes: ModeTable) -> Self {
        let displays = MemoryDisplays::new();
        let progress = Arc::new(SkillProgress::new());
        let broadcaster = NotificationBroadcaster::new(64);
        let notices = broadcaster.subscribe();

        let manager = BarManager::builder("steve", modes)
            .displays(Arc::new(displays.clone()))
            .progress(progress.clone())
            .scheduler(Arc::new(TokioScheduler::current().unwrap()))
            .notifier(Arc::new(broadcaster))
            .quiet_period_ticks(60)
            .tick(TICK)
            .build()
            .unwrap();

        Self {
            manager,
            displays,
            progress,
            notices,
        }
    }

    fn visible(&self, skill: Skill) -> bool {
        self.displays.is_visible(skill)
    }

    fn notices(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok((_, notice)) = self.notices.try_recv() {
            notices.push(notice);
        }
        notices
    }
}

#[tokio::test(start_paused = true)]
async fn test_auto_bar_hides_after_quiet_period() {
    let h = Harness::new(default_mode_table());
    assert_eq!(h.manager.quiet_period(), QUIET);

    h.manager.update_bar(Skill::Excavation, 0.3).unwrap();
    sleep(QUIET - TICK).await;
    assert!(h.visible(Skill::Excavation));

    sleep(TICK * 2).await;
    assert!(!h.visible(Skill::Excavation));
    assert!(!h.manager.has_pending_hide(Skill::Excavation));
}

#[tokio::test(start_paused = true)]
async fn test_debounce_hides_once_from_last_update() {
    let h = Harness::new(default_mode_table());
    let start = Instant::now();

    for second in 0..3u64 {
        sleep_until(start + Duration::from_secs(second)).await;
        h.manager.update_bar(Skill::Woodcutting, 0.1 * second as f64).unwrap();
    }

    // Three seconds after the first update the bar must still be up.
    sleep_until(start + Duration::from_millis(4900)).await;
    assert!(h.visible(Skill::Woodcutting));
    assert_eq!(h.manager.pending_hide_count(), 1);

    sleep_until(start + Duration::from_millis(5100)).await;
    let bar = h.displays.snapshot(Skill::Woodcutting).unwrap();
    assert!(!bar.visible);
    assert_eq!(bar.hides, 1);
    assert_eq!(bar.shows, 3);
}

#[tokio::test(start_paused = true)]
async fn test_force_hidden_suppresses_everything() {
    let mut h = Harness::new(default_mode_table());
    h.manager.update_bar(Skill::Alchemy, 0.5).unwrap();

    h.manager.set_mode(SettingTarget::Hide, Skill::Alchemy).unwrap();
    h.manager.update_bar(Skill::Alchemy, 0.9).unwrap();
    h.manager.refresh_bar(Skill::Alchemy).unwrap();

    let bar = h.displays.snapshot(Skill::Alchemy).unwrap();
    assert!(!bar.visible);
    assert_eq!(bar.progress, 0.5);
    assert!(!h.manager.has_pending_hide(Skill::Alchemy));
    assert_eq!(h.manager.mode(Skill::Alchemy), VisibilityMode::ForceHidden);
    assert_eq!(
        h.notices(),
        vec![Notice::SettingChanged {
            skill: Skill::Alchemy,
            target: SettingTarget::Hide
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_always_on_never_auto_hides() {
    let h = Harness::new(default_mode_table());
    h.manager.set_mode(SettingTarget::Show, Skill::Archery).unwrap();

    for _ in 0..5 {
        h.manager.update_bar(Skill::Archery, 0.2).unwrap();
        sleep(QUIET * 2).await;
        assert!(h.visible(Skill::Archery));
    }
    assert_eq!(h.manager.pending_hide_count(), 0);
    assert_eq!(h.displays.snapshot(Skill::Archery).unwrap().hides, 0);
}

#[tokio::test(start_paused = true)]
async fn test_show_cancels_pending_auto_hide() {
    let h = Harness::new(default_mode_table());
    h.manager.update_bar(Skill::Unarmed, 0.2).unwrap();
    sleep(QUIET / 2).await;

    h.manager.set_mode(SettingTarget::Show, Skill::Unarmed).unwrap();
    sleep(QUIET * 2).await;

    assert!(h.visible(Skill::Unarmed));
    assert_eq!(h.displays.snapshot(Skill::Unarmed).unwrap().hides, 0);
}

#[tokio::test(start_paused = true)]
async fn test_hide_bar_is_idempotent() {
    let h = Harness::new(default_mode_table());

    // Never updated: nothing to hide, nothing created.
    h.manager.hide_bar(Skill::Taming).unwrap();
    h.manager.hide_bar(Skill::Taming).unwrap();
    assert!(!h.manager.has_display(Skill::Taming));

    h.manager.update_bar(Skill::Taming, 0.4).unwrap();
    h.manager.hide_bar(Skill::Taming).unwrap();
    h.manager.hide_bar(Skill::Taming).unwrap();
    assert!(!h.visible(Skill::Taming));

    // hide_bar leaves the timer and mode alone.
    assert!(h.manager.has_pending_hide(Skill::Taming));
    assert_eq!(h.manager.mode(Skill::Taming), VisibilityMode::Auto);
}

#[tokio::test(start_paused = true)]
async fn test_reset_restores_defaults() {
    let mut h = Harness::new(default_mode_table());
    h.manager.set_mode(SettingTarget::Show, Skill::Smelting).unwrap();
    h.manager.set_mode(SettingTarget::Hide, Skill::Fishing).unwrap();
    h.manager.set_mode(SettingTarget::Show, Skill::Axes).unwrap();
    h.manager.disable_all_bars().unwrap();
    h.notices();

    h.manager.set_mode(SettingTarget::Reset, Skill::Axes).unwrap();

    for skill in Skill::ALL {
        let expected = if skill.is_child() {
            VisibilityMode::ForceHidden
        } else {
            VisibilityMode::Auto
        };
        assert_eq!(h.manager.mode(skill), expected, "{skill}");
        assert_eq!(default_mode(skill), expected);
    }
    assert_eq!(h.notices(), vec![Notice::Reset]);
}

#[tokio::test(start_paused = true)]
async fn test_disable_all_bars() {
    let mut h = Harness::new(default_mode_table());
    h.manager.update_bar(Skill::Mining, 0.4).unwrap();
    h.manager.set_mode(SettingTarget::Show, Skill::Repair).unwrap();
    h.notices();

    h.manager.disable_all_bars().unwrap();

    for skill in Skill::ALL {
        assert_eq!(h.manager.mode(skill), VisibilityMode::ForceHidden, "{skill}");
        assert!(!h.visible(skill), "{skill}");
    }
    assert_eq!(h.manager.pending_hide_count(), 0);
    assert_eq!(h.notices(), vec![Notice::AllDisabled]);
}

#[tokio::test(start_paused = true)]
async fn test_mode_table_is_shared_with_owner() {
    let table = default_mode_table();
    let h = Harness::new(table.clone());

    h.manager.set_mode(SettingTarget::Show, Skill::Swords).unwrap();
    assert_eq!(table.get(Skill::Swords), VisibilityMode::AlwaysOn);

    // Changes made by the owner are seen on the next update.
    table.set(Skill::Swords, VisibilityMode::ForceHidden);
    h.manager.update_bar(Skill::Swords, 0.7).unwrap();
    assert_eq!(h.displays.snapshot(Skill::Swords).unwrap().progress, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_manager_leaves_display_alone() {
    let h = Harness::new(default_mode_table());
    let displays = h.displays.clone();
    h.manager.update_bar(Skill::Herbalism, 0.2).unwrap();

    drop(h);
    sleep(QUIET * 2).await;

    assert!(displays.is_visible(Skill::Herbalism));
}

#[tokio::test(start_paused = true)]
async fn test_construction_and_scenario() {
    let modes = ModeTable::from_modes([
        (Skill::Mining, VisibilityMode::Auto),
        (Skill::Repair, VisibilityMode::AlwaysOn),
    ]);
    let mut h = Harness::new(modes);

    // Pinned bars are shown immediately, with zero progress until a real update.
    let repair = h.displays.snapshot(Skill::Repair).unwrap();
    assert!(repair.visible);
    assert_eq!(repair.progress, 0.0);
    assert!(!h.manager.has_display(Skill::Mining));
    assert!(h.notices().is_empty());

    h.manager.update_bar(Skill::Mining, 0.4).unwrap();
    assert!(h.visible(Skill::Mining));
    assert_eq!(h.displays.snapshot(Skill::Mining).unwrap().progress, 0.4);
    assert!(h.manager.has_pending_hide(Skill::Mining));

    sleep(QUIET + TICK).await;
    assert!(!h.visible(Skill::Mining));
    assert!(!h.manager.has_pending_hide(Skill::Mining));
    assert!(h.visible(Skill::Repair));

    h.manager.set_mode(SettingTarget::Hide, Skill::Repair).unwrap();
    assert!(!h.visible(Skill::Repair));
    assert_eq!(h.manager.mode(Skill::Repair), VisibilityMode::ForceHidden);

    h.progress.record(&SubjectId::new("steve"), Skill::Repair, 90, 100);
    h.manager.update_bar(Skill::Repair, 0.9).unwrap();
    assert!(!h.visible(Skill::Repair));
    assert_eq!(h.displays.snapshot(Skill::Repair).unwrap().progress, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_force_hidden_entry_at_construction_is_harmless() {
    let modes = ModeTable::from_modes([(Skill::Fishing, VisibilityMode::ForceHidden)]);
    let h = Harness::new(modes);

    assert!(!h.manager.has_display(Skill::Fishing));
    assert_eq!(h.manager.mode(Skill::Fishing), VisibilityMode::ForceHidden);
}
