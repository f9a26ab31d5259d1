use super::print_history;
use crate::context::{self, Options};
use anyhow::Result;
use quill_core::session::TransformKind;

pub async fn run(options: &Options, kind: Option<TransformKind>) -> Result<()> {
    let app = context::build(options, false, false)?;
    let history = app.controller.history();
    history.set_kind_filter(kind).await;

    let entries = history.mount().await?;
    print_history(&entries);
    Ok(())
}
