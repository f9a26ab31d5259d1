use super::parse_id;
use crate::context::{self, Options};
use anyhow::Result;
use colored::Colorize;
use quill_core::clock::SystemClock;
use quill_core::render::CharacterReveal;
use std::io::Write;

pub async fn run(options: &Options, id: i64, instant: bool) -> Result<()> {
    let id = parse_id(id)?;
    let app = context::build(options, false, instant)?;

    let session = app.controller.select(id).await?;
    eprintln!(
        "{}",
        format!("#{id} {} - {}", session.kind(), session.input_text()).dimmed()
    );
    if instant {
        return Ok(());
    }

    let display = &app.config.display;
    let mut reveal = CharacterReveal::new(session.accumulated_text())
        .with_placeholder(display.reveal_placeholder.clone());
    let mut shown = 0;
    reveal
        .play(&SystemClock, display.reveal_interval(), |frame| {
            let mut stdout = std::io::stdout().lock();
            let _ = write!(stdout, "{}", &frame[shown..]);
            let _ = stdout.flush();
            shown = frame.len();
        })
        .await;
    println!();
    Ok(())
}
