//! `sysward collect`: collect and index one telemetry snapshot.

use anyhow::Result;
use sysward_config::AppConfig;

use crate::session::Session;

pub async fn run(config: AppConfig) -> Result<()> {
    let session = Session::build(config)?;
    session.collect_once().await?;
    println!("Data collection completed.");
    Ok(())
}
