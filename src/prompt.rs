//! Interactive prompt used for second-factor codes

use crate::{Error, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Asks a human for a line of input
#[async_trait::async_trait]
pub trait Prompt: Send + Sync {
    async fn ask(&self, message: &str) -> Result<String>;
}

/// Prompt on the controlling terminal: message on stderr, answer on stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

#[async_trait::async_trait]
impl Prompt for TerminalPrompt {
    async fn ask(&self, message: &str) -> Result<String> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(format!("? {}: ", message).as_bytes()).await?;
        stderr.flush().await?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;
        if read == 0 {
            return Err(Error::prompt("stdin closed before an answer was entered"));
        }

        Ok(line.trim().to_string())
    }
}
