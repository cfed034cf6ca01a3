//! # Process Pipelines (`common::process::pipeline`)
//!
//! File: cli/src/common/process/pipeline.rs
//!
//! ## Overview
//!
//! A `Pipeline` is a linear chain of external processes connected by OS pipes,
//! optionally reading its input from a file and writing its output to a file:
//!
//! ```text
//! [Redirect] stage_0 | stage_1 | ... | stage_n [Redirect]
//! ```
//!
//! It is built fresh for each archive operation, previewed and/or run once,
//! then dropped. Building it has no side effects; files named by redirects are
//! only opened inside `run`.
//!
//! ## Execution model
//!
//! - Stages are spawned in declaration order. Each stage's stdout is a new
//!   pipe that becomes the next stage's stdin. The first stage reads the input
//!   redirect (or inherits stdin), the last writes the output redirect (or
//!   inherits stdout). Stderr is always inherited so tools report directly.
//! - The parent's copy of every pipe end is released as soon as the stage
//!   that uses it has been spawned. Nothing is held open across a `wait`, so
//!   each reader sees end-of-stream once its writer exits.
//! - Every spawned stage is waited on, in any order. The run succeeds only if
//!   every stage exits with status zero.
//! - If a stage cannot be spawned, no further stages are started, the stages
//!   already running are reaped, and the spawn error is returned.
//!
use super::command::{quote, CommandSpec};
use crate::core::error::{ConstructionError, ExecError};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Stdio};
use tracing::{debug, trace, warn};

/// A file standing in for the pipe endpoint at either end of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    path: PathBuf,
}

impl Redirect {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_read(&self) -> Result<File, ExecError> {
        File::open(&self.path).map_err(|source| ExecError::RedirectOpen {
            path: self.path.clone(),
            source,
        })
    }

    /// Creates or truncates the target.
    fn open_write(&self) -> Result<File, ExecError> {
        File::create(&self.path).map_err(|source| ExecError::RedirectOpen {
            path: self.path.clone(),
            source,
        })
    }
}

/// One positional element of a pipeline description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Redirect(Redirect),
    Stage(CommandSpec),
}

impl From<Redirect> for Element {
    fn from(redirect: Redirect) -> Self {
        Element::Redirect(redirect)
    }
}

impl From<CommandSpec> for Element {
    fn from(stage: CommandSpec) -> Self {
        Element::Stage(stage)
    }
}

/// Outcome of `Pipeline::run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every stage exited with status zero.
    Succeeded,
    /// At least one stage exited non-zero or was killed by a signal.
    Failed,
    /// The pipeline is in dry mode; nothing was executed.
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    input: Option<Redirect>,
    stages: Vec<CommandSpec>,
    output: Option<Redirect>,
    dry: bool,
}

impl Pipeline {
    /// Validates the element layout and builds the pipeline.
    ///
    /// A redirect is only accepted as the first element (input) or the last
    /// element (output); at least one command stage is required.
    pub fn new<I>(elements: I, dry: bool) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = Element>,
    {
        let elements: Vec<Element> = elements.into_iter().collect();
        if elements.is_empty() {
            return Err(ConstructionError::EmptyPipeline);
        }

        let last = elements.len() - 1;
        let mut input = None;
        let mut output = None;
        let mut stages = Vec::with_capacity(elements.len());

        for (position, element) in elements.into_iter().enumerate() {
            match element {
                Element::Redirect(redirect) if position == 0 => input = Some(redirect),
                Element::Redirect(redirect) if position == last => output = Some(redirect),
                Element::Redirect(_) => {
                    return Err(ConstructionError::MisplacedRedirect { position })
                }
                Element::Stage(stage) => stages.push(stage),
            }
        }

        if stages.is_empty() {
            return Err(ConstructionError::NoStages);
        }

        Ok(Self {
            input,
            stages,
            output,
            dry,
        })
    }

    /// A pipeline made of a single stage with no redirects.
    pub fn single(stage: CommandSpec, dry: bool) -> Self {
        Self {
            input: None,
            stages: vec![stage],
            output: None,
            dry,
        }
    }

    pub fn is_dry(&self) -> bool {
        self.dry
    }

    #[cfg(test)]
    pub fn stages(&self) -> &[CommandSpec] {
        &self.stages
    }

    #[cfg(test)]
    pub fn input(&self) -> Option<&Redirect> {
        self.input.as_ref()
    }

    #[cfg(test)]
    pub fn output(&self) -> Option<&Redirect> {
        self.output.as_ref()
    }

    /// The one-line, shell-pasteable preview (same text as `Display`).
    pub fn preview(&self) -> String {
        self.to_string()
    }

    /// Writes the preview line to stderr.
    pub fn print_preview(&self) {
        eprintln!("{}", self);
    }

    /// Executes the pipeline and aggregates the exit status of every stage.
    ///
    /// In dry mode nothing is opened or spawned and `RunStatus::DryRun` is
    /// returned. Partial output left by a failed run is not cleaned up.
    ///
    /// # Errors
    ///
    /// - `ExecError::RedirectOpen` if an input or output file cannot be opened.
    /// - `ExecError::Spawn` if a stage cannot be launched. Stages already
    ///   running are waited on before returning.
    /// - `ExecError::Wait` if waiting on a stage fails.
    pub fn run(&self) -> Result<RunStatus, ExecError> {
        if self.dry {
            debug!("Dry run, not executing: {}", self);
            return Ok(RunStatus::DryRun);
        }

        let mut input = self
            .input
            .as_ref()
            .map(Redirect::open_read)
            .transpose()?
            .map(Stdio::from);
        let mut output = self
            .output
            .as_ref()
            .map(Redirect::open_write)
            .transpose()?
            .map(Stdio::from);

        let last = self.stages.len() - 1;
        let mut running: Vec<(usize, &CommandSpec, Child)> = Vec::with_capacity(self.stages.len());
        let mut upstream: Option<ChildStdout> = None;

        for (index, stage) in self.stages.iter().enumerate() {
            let stdin = match upstream.take() {
                Some(pipe) => Stdio::from(pipe),
                None => input.take().unwrap_or_else(Stdio::inherit),
            };
            let stdout = if index == last {
                output.take().unwrap_or_else(Stdio::inherit)
            } else {
                Stdio::piped()
            };

            let mut command = stage.to_command();
            command.stdin(stdin).stdout(stdout);
            let spawned = command.spawn();
            // Releases the parent's copies of the stdio handed to this stage.
            drop(command);

            match spawned {
                Ok(mut child) => {
                    debug!(
                        "Spawned stage {} ('{}') as pid {}",
                        index,
                        stage.program(),
                        child.id()
                    );
                    if index != last {
                        upstream = child.stdout.take();
                    }
                    running.push((index, stage, child));
                }
                Err(source) => {
                    warn!("Failed to spawn stage {} ('{}'): {}", index, stage.program(), source);
                    // The failed command took the upstream read end with it, so the
                    // previous stage gets EPIPE rather than blocking while reaped.
                    reap(running);
                    return Err(ExecError::Spawn {
                        stage: index,
                        program: stage.program().to_string(),
                        source,
                    });
                }
            }
        }

        let mut succeeded = true;
        let mut wait_error = None;
        for (index, stage, mut child) in running {
            match child.wait() {
                Ok(status) if status.success() => {
                    trace!("Stage {} ('{}') exited successfully", index, stage.program());
                }
                Ok(status) => {
                    warn!("Stage {} ('{}') exited with {}", index, stage.program(), status);
                    succeeded = false;
                }
                Err(source) => {
                    succeeded = false;
                    wait_error.get_or_insert(ExecError::Wait {
                        stage: index,
                        program: stage.program().to_string(),
                        source,
                    });
                }
            }
        }

        match wait_error {
            Some(err) => Err(err),
            None if succeeded => Ok(RunStatus::Succeeded),
            None => Ok(RunStatus::Failed),
        }
    }
}

/// Waits on already-spawned stages so none are left as zombies.
fn reap(running: Vec<(usize, &CommandSpec, Child)>) {
    for (index, stage, mut child) in running {
        if let Err(e) = child.wait() {
            warn!("Failed to reap stage {} ('{}'): {}", index, stage.program(), e);
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry {
            write!(f, "[dry] ")?;
        }
        write!(f, "$")?;
        if let Some(input) = &self.input {
            write!(f, " cat {} |", quote(&input.path().to_string_lossy()))?;
        }
        for (index, stage) in self.stages.iter().enumerate() {
            if index > 0 {
                write!(f, " |")?;
            }
            write!(f, " {}", stage.render())?;
        }
        if let Some(output) = &self.output {
            write!(f, " > {}", quote(&output.path().to_string_lossy()))?;
        }
        Ok(())
    }
}
