//! Single-shot mode: one question, one answer, exit code by outcome.

use anyhow::Result;
use sysward_config::AppConfig;
use sysward_core::PatternId;

use crate::session::Session;

pub async fn run(config: AppConfig, question: &str, pattern: Option<String>) -> Result<()> {
    let mut config = config;
    if let Some(name) = pattern {
        config.agent.default_pattern = name.parse::<PatternId>()?;
    }

    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("question must not be empty");
    }

    let session = Session::build(config)?;
    let result = session.ask(question).await;
    println!("{}", result.output);
    if result.error {
        std::process::exit(1);
    }
    Ok(())
}
