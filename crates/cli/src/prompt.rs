//! Console authorization-code provider

use async_trait::async_trait;
use crewconnect_common::auth::REDIRECT_URI;
use crewconnect_common::{AuthorizationCodeProvider, OAuthClientError};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;

/// Shows the authorization URL and reads the redirect URL pasted back
pub struct ConsolePrompt<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl ConsolePrompt<BufReader<Stdin>, Stdout> {
    /// Prompt on the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input: Mutex::new(input), output: Mutex::new(output) }
    }
}

fn interaction(err: std::io::Error) -> OAuthClientError {
    OAuthClientError::Interaction(err.to_string())
}

#[async_trait]
impl<R, W> AuthorizationCodeProvider for ConsolePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn authorize(&self, authorization_url: &str) -> Result<String, OAuthClientError> {
        let message = format!(
            "Open this URL in a browser and sign in:\n\n    {authorization_url}\n\n\
             Then paste the URL you are redirected to (it starts with {REDIRECT_URI}):\n> "
        );
        {
            let mut output = self.output.lock().await;
            output.write_all(message.as_bytes()).await.map_err(interaction)?;
            output.flush().await.map_err(interaction)?;
        }

        let mut line = String::new();
        self.input.lock().await.read_line(&mut line).await.map_err(interaction)?;

        let redirect = line.trim();
        if redirect.is_empty() {
            return Err(OAuthClientError::Interaction("no redirect URL entered".into()));
        }
        Ok(redirect.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prints_url_and_returns_trimmed_redirect() {
        let input = BufReader::new(&b"  com.apm.crewconnect:/callback?code=abc&state=xyz \n"[..]);
        let prompt = ConsolePrompt::new(input, Vec::new());

        let redirect = prompt.authorize("https://idp.example/authorize?x=1").await.unwrap();

        assert_eq!(redirect, "com.apm.crewconnect:/callback?code=abc&state=xyz");
        let shown = String::from_utf8(prompt.output.into_inner()).unwrap();
        assert!(shown.contains("https://idp.example/authorize?x=1"));
    }

    #[tokio::test]
    async fn empty_input_aborts() {
        let prompt = ConsolePrompt::new(BufReader::new(&b""[..]), Vec::new());

        let err = prompt.authorize("https://idp.example/authorize").await.unwrap_err();
        assert!(matches!(err, OAuthClientError::Interaction(_)));
    }
}
