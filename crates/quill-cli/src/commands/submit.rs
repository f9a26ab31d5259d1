use crate::context::{self, Options};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use quill_core::session::{SessionState, TransformKind};
use std::io::Read;

pub async fn run(options: &Options, kind: TransformKind, text: String) -> Result<()> {
    let text = if text == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read text from stdin")?;
        buffer
    } else {
        text
    };

    let app = context::build(options, true, true)?;
    eprintln!("{}", format!("{}...", kind.label()).dimmed());

    let session = app.controller.submit(text, kind).await?;

    match session.state() {
        SessionState::Completed => {
            if let Some(id) = session.id() {
                eprintln!("{}", format!("Saved as #{id}").green());
            }
            Ok(())
        }
        _ => bail!(
            "{}",
            session.error_detail().unwrap_or("generation did not complete")
        ),
    }
}
