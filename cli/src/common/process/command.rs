//! # Command Stages (`common::process::command`)
//!
//! File: cli/src/common/process/command.rs
//!
//! A `CommandSpec` is one external program invocation: the program name
//! (resolved through `PATH`) followed by literal arguments. Tokens are handed
//! to the operating system as an argument vector. No shell is involved, so
//! metacharacters in arguments are never interpreted.
//!
use crate::core::error::ConstructionError;
use std::borrow::Cow;
use std::process::Command;

/// An ordered, non-empty list of tokens describing one process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    tokens: Vec<String>,
}

impl CommandSpec {
    /// Builds a command from its tokens.
    ///
    /// # Errors
    ///
    /// - `ConstructionError::EmptyCommand` when no tokens are given.
    /// - `ConstructionError::EmptyProgram` when the first token is empty.
    pub fn new<I, S>(tokens: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        match tokens.first() {
            None => Err(ConstructionError::EmptyCommand),
            Some(program) if program.is_empty() => Err(ConstructionError::EmptyProgram),
            Some(_) => Ok(Self { tokens }),
        }
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    #[cfg(test)]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// A `std::process::Command` for this stage with no stdio configured yet.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args());
        command
    }

    /// Shell-quoted rendering of the tokens, joined by single spaces.
    pub fn render(&self) -> String {
        self.tokens
            .iter()
            .map(|token| quote(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quotes one token so a POSIX shell would read it back as the same single word.
pub(crate) fn quote(token: &str) -> Cow<'_, str> {
    // Only a NUL byte makes quoting fail, and such a token could never be exec'd anyway.
    shlex::try_quote(token).unwrap_or_else(|_| Cow::Owned(format!("{:?}", token)))
}
