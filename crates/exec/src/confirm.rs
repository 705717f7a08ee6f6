//! Interactive confirmation for state-changing actions.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Asks the operator to approve an action before it runs.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Returns true when the action may proceed.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Reads a yes/no answer from stdin.
#[derive(Debug, Default)]
pub struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        let mut stdout = tokio::io::stdout();
        let line = format!("{prompt} [y/N] ");
        if stdout.write_all(line.as_bytes()).await.is_err() {
            return false;
        }
        if stdout.flush().await.is_err() {
            return false;
        }

        let mut answer = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        if reader.read_line(&mut answer).await.is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Approves or denies everything. For non-interactive runs and tests.
#[derive(Debug)]
pub struct FixedConfirmer(pub bool);

#[async_trait]
impl Confirmer for FixedConfirmer {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_confirmer_returns_its_answer() {
        assert!(FixedConfirmer(true).confirm("ok?").await);
        assert!(!FixedConfirmer(false).confirm("ok?").await);
    }
}
