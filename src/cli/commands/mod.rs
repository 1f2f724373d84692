//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module; [`Session`] wires one
//! subject's bar manager to the terminal.

pub mod demo;
pub mod init;
pub mod run;

use std::sync::Arc;

use skillbars::bars::{BarManager, ModeTable, NotificationBroadcaster, TokioScheduler};
use skillbars::config::Settings;
use skillbars::io::TerminalDisplays;
use skillbars::{BarError, SkillProgress, SubjectId};

/// One subject's bars, rendered on stderr, with notices printed to stdout.
pub struct Session {
    pub manager: BarManager,
    pub progress: Arc<SkillProgress>,
    listener: tokio::task::JoinHandle<()>,
}

impl Session {
    pub fn start(settings: &Settings, subject: SubjectId, modes: ModeTable) -> Result<Self, BarError> {
        let broadcaster = NotificationBroadcaster::new(32);
        let listener = spawn_notice_printer(&broadcaster);
        let progress = Arc::new(SkillProgress::new());

        let manager = BarManager::builder(subject, modes)
            .displays(Arc::new(TerminalDisplays::stderr()))
            .progress(progress.clone())
            .scheduler(Arc::new(TokioScheduler::current()?))
            .notifier(Arc::new(broadcaster))
            .config(&settings.bars)
            .build()?;

        Ok(Self {
            manager,
            progress,
            listener,
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

fn spawn_notice_printer(broadcaster: &NotificationBroadcaster) -> tokio::task::JoinHandle<()> {
    let mut receiver = broadcaster.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok((subject, notice)) => println!("» {subject}: {notice}"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("[notify] lagged by {n} messages");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
