//! Per-subject bar manager.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use super::display::{BarDisplay, DisplayFactory};
use super::error::BarError;
use super::mode::{ModeTable, SettingTarget, VisibilityMode};
use super::notifications::{Notice, Notifier};
use super::policy::BarPolicy;
use super::timer::{HideTask, HideTimers, Scheduler};
use crate::config::BarsConfig;
use crate::progress::{ProgressProvider, SkillProgress};
use crate::skill::Skill;
use crate::types::SubjectId;

type SharedDisplay = Arc<Mutex<Box<dyn BarDisplay>>>;

/// Displays and timers for one subject.
///
/// Timer tasks reach this through a `Weak` so a dropped manager turns any
/// late firing into a no-op. No collaborator is ever called with this lock
/// held; a display is driven through its own lock.
#[derive(Default)]
struct BarState {
    displays: HashMap<Skill, SharedDisplay>,
    timers: HideTimers,
}

/// Shows, hides and schedules the progress bars of a single subject.
///
/// All public operations are expected to come from the host's update loop.
/// The only asynchronous actor is the hide timer, which re-checks the timer
/// bookkeeping under the state lock before touching a display.
pub struct BarManager {
    subject: SubjectId,
    modes: ModeTable,
    state: Arc<Mutex<BarState>>,
    displays: Arc<dyn DisplayFactory>,
    progress: Arc<dyn ProgressProvider>,
    policy: Arc<dyn BarPolicy>,
    scheduler: Arc<dyn Scheduler>,
    notifier: Arc<dyn Notifier>,
    quiet_period_ticks: u32,
    quiet_period: Duration,
}

impl BarManager {
    /// Create a builder for configuring the manager.
    pub fn builder(subject: impl Into<SubjectId>, modes: ModeTable) -> BarManagerBuilder {
        BarManagerBuilder::new(subject.into(), modes)
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    /// Handle onto the shared mode table.
    pub fn mode_table(&self) -> &ModeTable {
        &self.modes
    }

    pub fn mode(&self, skill: Skill) -> VisibilityMode {
        self.modes.get(skill)
    }

    pub fn quiet_period_ticks(&self) -> u32 {
        self.quiet_period_ticks
    }

    /// How long an `Auto` bar stays up after its last update.
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn has_display(&self, skill: Skill) -> bool {
        self.state.lock().displays.contains_key(&skill)
    }

    pub fn has_pending_hide(&self, skill: Skill) -> bool {
        self.state.lock().timers.has_pending(skill)
    }

    pub fn pending_hide_count(&self) -> usize {
        self.state.lock().timers.pending_count()
    }

    /// Show `skill`'s bar at `progress` and (re)arm its hide timer.
    ///
    /// Ignored when the skill is force-hidden or bars are disabled by policy.
    /// Any pending hide is invalidated before the bar is shown, so a stale
    /// timer can never hide a bar that was just re-shown. `AlwaysOn` bars get
    /// no new timer.
    pub fn update_bar(&self, skill: Skill, progress: f64) -> Result<(), BarError> {
        let mode = self.modes.get(skill);
        if mode == VisibilityMode::ForceHidden {
            crate::debug_event!("bars", "ignored", "{skill} is force-hidden for {}", self.subject);
            return Ok(());
        }
        if !self.policy.allows(skill) {
            crate::debug_event!("bars", "ignored", "{skill} bars disabled by policy");
            return Ok(());
        }

        let (existing, generation) = {
            let mut state = self.state.lock();
            let generation = match mode {
                VisibilityMode::Auto => Some(state.timers.reserve(skill)),
                _ => {
                    state.timers.cancel(skill);
                    None
                }
            };
            (state.displays.get(&skill).cloned(), generation)
        };

        let shown = match existing {
            Some(display) => Ok(display),
            None => self.create_display(skill),
        }
        .and_then(|display| {
            let mut bar = display.lock();
            bar.set_progress(progress)?;
            bar.show()?;
            Ok(())
        });

        match (shown, generation) {
            (Ok(()), Some(generation)) => self.arm_hide_timer(skill, generation),
            (Ok(()), None) => Ok(()),
            (Err(e), generation) => {
                if let Some(generation) = generation {
                    self.release(skill, generation);
                }
                Err(e)
            }
        }
    }

    /// [`update_bar`](Self::update_bar) using the progress provider's value.
    pub fn refresh_bar(&self, skill: Skill) -> Result<(), BarError> {
        let progress = self.progress.progress_fraction(&self.subject, skill);
        self.update_bar(skill, progress)
    }

    /// Hide `skill`'s bar if it was ever created. Leaves mode and timers alone.
    pub fn hide_bar(&self, skill: Skill) -> Result<(), BarError> {
        let display = self.state.lock().displays.get(&skill).cloned();
        match display {
            Some(display) => display.lock().hide(),
            None => Ok(()),
        }
    }

    /// Drop the timer record for `skill` without cancelling or hiding.
    pub fn clear_timer_record(&self, skill: Skill) {
        self.state.lock().timers.remove(skill);
    }

    /// Apply a setting change and tell the subject about it.
    ///
    /// `skill` is ignored for [`SettingTarget::Reset`].
    pub fn set_mode(&self, target: SettingTarget, skill: Skill) -> Result<(), BarError> {
        match target {
            SettingTarget::Show => self.pin_shown(skill)?,
            SettingTarget::Hide | SettingTarget::Disable => self.pin_hidden(skill)?,
            SettingTarget::Reset => return self.reset_bar_settings(),
        }

        crate::log_event!("bars", "mode", "{} set {skill} to {target}", self.subject);
        self.notifier
            .notify(&self.subject, Notice::SettingChanged { skill, target });
        Ok(())
    }

    /// Put every skill back to its default mode.
    ///
    /// Existing displays and timers are left as they are; the new modes apply
    /// from the next update on.
    pub fn reset_bar_settings(&self) -> Result<(), BarError> {
        self.modes.reset_to_defaults();
        crate::log_event!("bars", "reset", "{}", self.subject);
        self.notifier.notify(&self.subject, Notice::Reset);
        Ok(())
    }

    /// Force-hide every skill's bar, with a single notice at the end.
    pub fn disable_all_bars(&self) -> Result<(), BarError> {
        for skill in Skill::ALL {
            self.pin_hidden(skill)?;
        }

        crate::log_event!("bars", "disabled all", "{}", self.subject);
        self.notifier.notify(&self.subject, Notice::AllDisabled);
        Ok(())
    }

    fn pin_shown(&self, skill: Skill) -> Result<(), BarError> {
        self.modes.set(skill, VisibilityMode::AlwaysOn);
        self.state.lock().timers.cancel(skill);
        self.refresh_bar(skill)
    }

    fn pin_hidden(&self, skill: Skill) -> Result<(), BarError> {
        self.modes.set(skill, VisibilityMode::ForceHidden);
        self.state.lock().timers.cancel(skill);
        self.hide_bar(skill)
    }

    /// Bring displays in line with modes loaded before this manager existed.
    fn sync_modes(&self) -> Result<(), BarError> {
        for (skill, mode) in self.modes.entries() {
            match mode {
                VisibilityMode::Auto => {}
                VisibilityMode::AlwaysOn => self.pin_shown(skill)?,
                VisibilityMode::ForceHidden => self.pin_hidden(skill)?,
            }
        }
        Ok(())
    }

    fn create_display(&self, skill: Skill) -> Result<SharedDisplay, BarError> {
        let created = self.displays.create(&self.subject, skill)?;
        crate::debug_event!("bars", "created", "{skill} display for {}", self.subject);
        let mut state = self.state.lock();
        let display = state
            .displays
            .entry(skill)
            .or_insert_with(|| Arc::new(Mutex::new(created)));
        Ok(display.clone())
    }

    /// Schedule the hide for a generation reserved by `update_bar`.
    ///
    /// The scheduler runs without the state lock, so it may fire the task
    /// inline. A handle that comes back for a generation which already fired
    /// or was superseded is cancelled instead of recorded.
    fn arm_hide_timer(&self, skill: Skill, generation: u64) -> Result<(), BarError> {
        let target = Arc::downgrade(&self.state);
        let subject = self.subject.clone();
        let task: HideTask = Box::new(move || expire(target, &subject, skill, generation));

        let handle = match self.scheduler.schedule_once(self.quiet_period, task) {
            Ok(handle) => handle,
            Err(e) => {
                self.release(skill, generation);
                return Err(e);
            }
        };

        if self.state.lock().timers.attach(skill, generation, handle.clone()) {
            crate::debug_event!(
                "timer",
                "armed",
                "{skill} hides in {}ms",
                self.quiet_period.as_millis()
            );
        } else {
            handle.cancel();
        }
        Ok(())
    }

    /// Drop a reservation that never got a timer.
    fn release(&self, skill: Skill, generation: u64) {
        let mut state = self.state.lock();
        if state.timers.is_current(skill, generation) {
            state.timers.remove(skill);
        }
    }
}

/// Body of a hide timer.
///
/// The display lock is taken before the state lock is released, so an update
/// racing with this hide shows the bar after it rather than before.
fn expire(target: Weak<Mutex<BarState>>, subject: &SubjectId, skill: Skill, generation: u64) {
    let Some(shared) = target.upgrade() else {
        return;
    };
    let mut state = shared.lock();
    if !state.timers.is_current(skill, generation) {
        crate::debug_event!("timer", "stale", "{skill} generation {generation}");
        return;
    }
    state.timers.remove(skill);

    let Some(display) = state.displays.get(&skill).cloned() else {
        return;
    };
    let mut bar = display.lock();
    drop(state);

    if let Err(e) = bar.hide() {
        tracing::warn!("[timer] failed to hide {skill} bar for {subject}: {e}");
    }
    crate::debug_event!("timer", "fired", "{skill} hidden for {subject}");
}

impl Drop for BarManager {
    fn drop(&mut self) {
        self.state.lock().timers.cancel_all();
    }
}

/// Builder for [`BarManager`].
///
/// A display factory, scheduler and notifier are required. Progress defaults
/// to an empty [`SkillProgress`], policy and timing to [`BarsConfig::default`].
pub struct BarManagerBuilder {
    subject: SubjectId,
    modes: ModeTable,
    displays: Option<Arc<dyn DisplayFactory>>,
    progress: Option<Arc<dyn ProgressProvider>>,
    policy: Option<Arc<dyn BarPolicy>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    notifier: Option<Arc<dyn Notifier>>,
    quiet_period_ticks: u32,
    tick: Duration,
}

impl BarManagerBuilder {
    fn new(subject: SubjectId, modes: ModeTable) -> Self {
        let defaults = BarsConfig::default();
        Self {
            subject,
            modes,
            displays: None,
            progress: None,
            policy: None,
            scheduler: None,
            notifier: None,
            quiet_period_ticks: defaults.quiet_period_ticks,
            tick: defaults.tick(),
        }
    }

    pub fn displays(mut self, displays: Arc<dyn DisplayFactory>) -> Self {
        self.displays = Some(displays);
        self
    }

    pub fn progress(mut self, progress: Arc<dyn ProgressProvider>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn policy(mut self, policy: Arc<dyn BarPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn quiet_period_ticks(mut self, ticks: u32) -> Self {
        self.quiet_period_ticks = ticks;
        self
    }

    pub fn tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Take timing and policy from a `[bars]` config section.
    pub fn config(self, config: &BarsConfig) -> Self {
        let tick = config.tick();
        self.quiet_period_ticks(config.quiet_period_ticks)
            .tick(tick)
            .policy(Arc::new(config.clone()))
    }

    /// Build the manager and apply any pinned modes already in the table.
    pub fn build(self) -> Result<BarManager, BarError> {
        let displays = self.displays.ok_or_else(|| missing("display factory"))?;
        let scheduler = self.scheduler.ok_or_else(|| missing("scheduler"))?;
        let notifier = self.notifier.ok_or_else(|| missing("notifier"))?;
        let quiet_period = self
            .tick
            .checked_mul(self.quiet_period_ticks)
            .ok_or_else(|| BarError::Config {
                reason: format!(
                    "quiet period of {} ticks at {:?} is out of range",
                    self.quiet_period_ticks, self.tick
                ),
            })?;

        let manager = BarManager {
            subject: self.subject,
            modes: self.modes,
            state: Arc::new(Mutex::new(BarState::default())),
            displays,
            progress: self
                .progress
                .unwrap_or_else(|| Arc::new(SkillProgress::new())),
            policy: self
                .policy
                .unwrap_or_else(|| Arc::new(BarsConfig::default())),
            scheduler,
            notifier,
            quiet_period_ticks: self.quiet_period_ticks,
            quiet_period,
        };
        manager.sync_modes()?;

        crate::debug_event!("bars", "ready", "{}", manager.subject);
        Ok(manager)
    }
}

fn missing(what: &str) -> BarError {
    BarError::Config {
        reason: format!("missing {what}"),
    }
}
