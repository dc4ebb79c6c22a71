use std::io::{self, BufRead, Write};

use url::Url;

use crate::{Error, Result};

/// What the operator copies back from the OAuth redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    /// The authorisation code to exchange for tokens
    pub code: String,

    /// The anti-forgery token echoed back by the redirect
    pub state: String,
}

/// A source of operator input for the interactive OAuth flow
pub trait CredentialPrompt {
    /// Show the authorisation URL and wait for the operator to paste back the
    /// code and state from the redirect.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator's input can't be read.
    fn authorize(&mut self, url: &Url) -> Result<AuthorizationResponse>;
}

/// Prompts on stdout and reads the response from stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl CredentialPrompt for ConsolePrompt {
    fn authorize(&mut self, url: &Url) -> Result<AuthorizationResponse> {
        println!(
            "OAuth activation required. Please follow the link below and paste the outputs from the URL."
        );
        println!("{url}");

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let code = read_field(&mut input, "Auth Token: ")?;
        let state = read_field(&mut input, "State Token: ")?;

        Ok(AuthorizationResponse { code, state })
    }
}

fn read_field(input: &mut impl BufRead, label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().map_err(Error::Prompt)?;

    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(Error::Prompt)?;
    if read == 0 {
        return Err(Error::Prompt(io::ErrorKind::UnexpectedEof.into()));
    }

    Ok(line.trim().to_string())
}
