//! Scripted walkthrough of bar behavior.

use std::time::Duration;

use skillbars::bars::{ModeTable, SettingTarget, VisibilityMode};
use skillbars::config::Settings;
use skillbars::{Skill, SubjectId};

use super::Session;

/// Run the demo: Repair starts pinned, Mining auto-hides, then Repair is
/// hidden and further Repair progress is ignored.
pub async fn run_demo(settings: &Settings, subject: String, ticks: Option<u32>) -> anyhow::Result<()> {
    let mut settings = settings.clone();
    if let Some(ticks) = ticks {
        settings.bars.quiet_period_ticks = ticks;
    }

    let modes = ModeTable::from_modes([
        (Skill::Mining, VisibilityMode::Auto),
        (Skill::Repair, VisibilityMode::AlwaysOn),
    ]);
    let subject = SubjectId::new(subject);

    println!("Starting session for {subject} (Repair pinned open)");
    let session = Session::start(&settings, subject.clone(), modes)?;
    let manager = &session.manager;
    let quiet = manager.quiet_period();

    println!("Mining progress: 40%");
    session.progress.record(&subject, Skill::Mining, 400, 1000);
    manager.refresh_bar(Skill::Mining)?;

    println!("Another Mining gain before the quiet period ends");
    tokio::time::sleep(quiet / 2).await;
    session.progress.record(&subject, Skill::Mining, 550, 1000);
    manager.refresh_bar(Skill::Mining)?;

    println!("Waiting {}ms for Mining to hide", quiet.as_millis());
    tokio::time::sleep(quiet + Duration::from_millis(100)).await;

    manager.set_mode(SettingTarget::Hide, Skill::Repair)?;
    println!("Repair progress after hiding: ignored");
    session.progress.record(&subject, Skill::Repair, 900, 1000);
    manager.refresh_bar(Skill::Repair)?;

    // Let the notice printer drain
    tokio::task::yield_now().await;
    Ok(())
}
