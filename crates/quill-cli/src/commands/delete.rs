use super::{parse_id, print_history};
use crate::context::{self, Options};
use anyhow::Result;
use colored::Colorize;

pub async fn run(options: &Options, id: i64) -> Result<()> {
    let id = parse_id(id)?;
    let app = context::build(options, false, false)?;

    let entries = app.controller.history().remove(id).await?;
    println!("{}", format!("Deleted #{id}").green());
    print_history(&entries);
    Ok(())
}
