//! `sysward status`: one-shot session/host status view.

use anyhow::Result;
use sysward_config::AppConfig;

use crate::session::Session;

pub async fn run(config: AppConfig) -> Result<()> {
    let session = Session::build(config)?;
    println!("{}", session.status_text());
    Ok(())
}
