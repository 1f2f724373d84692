//! Line-driven session reading bar events from stdin.

use std::time::Duration;

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, BufReader};

use skillbars::bars::{ModeTable, default_mode_table};
use skillbars::config::Settings;
use skillbars::{BarCommand, Skill, SubjectId};

use super::Session;

/// One parsed input line.
#[derive(Debug, PartialEq)]
enum Input {
    Gain { skill: Skill, xp: u64, xp_to_next: u64 },
    XpBar(BarCommand),
    Wait(Duration),
    Modes,
    Quit,
}

fn parse_line(line: &str) -> anyhow::Result<Option<Input>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((first, rest)) = words.split_first() else {
        return Ok(None);
    };

    let input = match first.to_ascii_lowercase().as_str() {
        "gain" => {
            let [skill, xp, xp_to_next] = rest else {
                bail!("usage: gain <skill> <xp> <xp-to-next>");
            };
            Input::Gain {
                skill: skill.parse()?,
                xp: xp.parse().context("xp must be a whole number")?,
                xp_to_next: xp_to_next
                    .parse()
                    .context("xp-to-next must be a whole number")?,
            }
        }
        "xpbar" => Input::XpBar(BarCommand::parse(rest.iter())?),
        "wait" => {
            let [ms] = rest else {
                bail!("usage: wait <ms>");
            };
            Input::Wait(Duration::from_millis(
                ms.parse().context("wait takes milliseconds")?,
            ))
        }
        "modes" => Input::Modes,
        "quit" | "exit" => Input::Quit,
        other => bail!("unknown input '{other}'"),
    };
    Ok(Some(input))
}

/// Run the stdin-driven session until `quit` or end of input.
pub async fn run_session(settings: &Settings, subject: String, modes: Option<String>) -> anyhow::Result<()> {
    let modes = match modes {
        Some(json) => {
            serde_json::from_str::<ModeTable>(&json).context("--modes must be a JSON object")?
        }
        None => default_mode_table(),
    };
    let subject = SubjectId::new(subject);
    let session = Session::start(settings, subject.clone(), modes)?;
    let manager = &session.manager;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        };

        let result = match input {
            Input::Gain {
                skill,
                xp,
                xp_to_next,
            } => {
                session.progress.record(&subject, skill, xp, xp_to_next);
                manager.refresh_bar(skill)
            }
            Input::XpBar(command) => command.execute(manager),
            Input::Wait(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Input::Modes => {
                println!("{}", serde_json::to_string_pretty(manager.mode_table())?);
                Ok(())
            }
            Input::Quit => break,
        };

        if let Err(e) = result {
            eprintln!("Error: {e}");
        }
    }

    Ok(())
}
