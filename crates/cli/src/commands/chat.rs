//! The interactive REPL.

use anyhow::Result;
use std::io::Write;
use sysward_config::AppConfig;
use sysward_core::PatternId;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::questions;
use crate::session::Session;
use crate::suggest;

const WELCOME: &str = "\
sysward — AI system administration assistant

Ask anything about this machine, or:
  questions        list the quick questions (answer with a number 1-20)
  patterns         list agent patterns; 'pattern <name>' switches
  status           session and host status
  memory           conversation memory summary
  collect          collect and index a telemetry snapshot now
  cache clear      clear expired cache entries ('cache clear all' for everything)
  quit / exit      leave
";

pub async fn run(config: AppConfig) -> Result<()> {
    let mut session = Session::build(config)?;
    session.spawn_background_collection();

    println!("{WELCOME}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n[{}] > ", session.agent.pattern());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" => {
                println!("Goodbye!");
                break;
            }
            "questions" | "q" | "help" => {
                println!("{}", questions::render());
                continue;
            }
            "patterns" | "pattern" | "p" => {
                print_patterns(session.agent.pattern());
                continue;
            }
            "status" => {
                println!("{}", session.status_text());
                continue;
            }
            "memory" | "m" => {
                let summary = session
                    .agent
                    .collaborators()
                    .memory
                    .lock()
                    .map(|m| m.session_summary())
                    .unwrap_or_else(|_| "unavailable".to_string());
                println!("{summary}");
                continue;
            }
            "collect" => {
                match session.collect_once().await {
                    Ok(()) => println!("Data collection completed."),
                    Err(e) => eprintln!("Collection failed: {e}"),
                }
                continue;
            }
            "cache clear" => {
                report_cache(session.agent.collaborators().cache.clear_expired(), "expired");
                continue;
            }
            "cache clear all" => {
                report_cache(session.agent.collaborators().cache.clear_all(), "all");
                continue;
            }
            _ => {}
        }

        if let Some(rest) = input.strip_prefix("pattern ") {
            match rest.parse::<PatternId>() {
                Ok(pattern) => {
                    session.switch_pattern(pattern);
                    println!("Switched to {pattern}: {}", pattern.description());
                }
                Err(e) => eprintln!("{e}"),
            }
            continue;
        }

        // Bare numbers expand to catalogue questions.
        let question = match questions::lookup(input) {
            Some(q) => {
                println!("Processing: {q}");
                q.to_string()
            }
            None => input.to_string(),
        };

        let related = session.related_count(&question);
        let result = session.ask(&question).await;
        println!("\n{}", result.output);
        if result.stopped_early() {
            println!("(stopped early: iteration budget exhausted)");
        }

        for line in suggest::suggestions(&question, session.agent.pattern(), related) {
            println!("  {line}");
        }
    }

    Ok(())
}

fn print_patterns(current: PatternId) {
    println!("Agent patterns (current: {current}):");
    for pattern in PatternId::ALL {
        let marker = if pattern == current { "*" } else { " " };
        println!("  {marker} {:<15} {}", pattern.as_str(), pattern.description());
    }
    println!("Switch with: pattern <name>");
}

fn report_cache(outcome: Result<usize, sysward_core::error::CacheError>, what: &str) {
    match outcome {
        Ok(removed) => println!("Cleared {removed} {what} cache entries."),
        Err(e) => eprintln!("Cache operation failed: {e}"),
    }
}
