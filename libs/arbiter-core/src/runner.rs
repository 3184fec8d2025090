//! Language runner - per-language compile step and launch command.
//!
//! Knows HOW to start a submission for each supported language; knows
//! nothing about timeouts, scoring, or progress. Compilation artifacts are
//! left on disk next to the source.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use tokio::process::Command;
use tracing::{error, info};

use crate::types::Language;

#[derive(Debug)]
pub enum RunnerError {
    /// Compiler exited nonzero, or claimed success without producing the
    /// expected artifact. Carries captured compiler stderr.
    CompilationFailed { stderr: String },
    /// The compiler itself could not be started.
    CompilerLaunch(std::io::Error),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::CompilationFailed { stderr } => {
                write!(f, "Compilation failed: {}", stderr)
            }
            RunnerError::CompilerLaunch(e) => write!(f, "Failed to start compiler: {}", e),
        }
    }
}

impl std::error::Error for RunnerError {}

/// A ready-to-execute command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Launch command plus the compile-time cost paid to obtain it.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub command: LaunchCommand,
    /// Zero for interpreted languages.
    pub compile_time_secs: f64,
}

/// Compile the artifact if the language needs it and produce the launch
/// command. Invoked once per test case; there is no compile cache.
pub async fn prepare(language: Language, source: &Path) -> Result<PreparedRun, RunnerError> {
    match language {
        Language::Python => {
            let command =
                LaunchCommand::new("python3", vec![source.to_string_lossy().into_owned()]);
            info!(language = %language, command = %command, "Prepared interpreted run");
            Ok(PreparedRun {
                command,
                compile_time_secs: 0.0,
            })
        }
        Language::Cpp => {
            let binary = source.with_extension("");
            let compile_time_secs = compile(
                language,
                "g++",
                &[
                    source.to_string_lossy().as_ref(),
                    "-o",
                    binary.to_string_lossy().as_ref(),
                ],
            )
            .await?;

            // Compiler success does not guarantee the artifact exists.
            if !binary.exists() {
                error!(binary = %binary.display(), "Compiled binary missing after successful compile");
                return Err(RunnerError::CompilationFailed {
                    stderr: format!("Compiled binary not found: {}", binary.display()),
                });
            }

            let command = LaunchCommand::new(binary.to_string_lossy().into_owned(), vec![]);
            info!(language = %language, command = %command, "Prepared compiled run");
            Ok(PreparedRun {
                command,
                compile_time_secs,
            })
        }
        Language::Java => {
            let compile_time_secs =
                compile(language, "javac", &[source.to_string_lossy().as_ref()]).await?;

            // The runnable unit is the source base name without its suffix.
            let class_name = source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let class_dir = source
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| ".".to_string());

            let command =
                LaunchCommand::new("java", vec!["-cp".to_string(), class_dir, class_name]);
            info!(language = %language, command = %command, "Prepared VM run");
            Ok(PreparedRun {
                command,
                compile_time_secs,
            })
        }
    }
}

/// Run one compiler invocation, returning the elapsed compile time.
async fn compile(language: Language, compiler: &str, args: &[&str]) -> Result<f64, RunnerError> {
    info!(language = %language, compiler, ?args, "Compiling");
    let start = Instant::now();

    let output = Command::new(compiler)
        .args(args)
        .output()
        .await
        .map_err(|e| {
            error!(language = %language, compiler, error = %e, "Compiler failed to start");
            RunnerError::CompilerLaunch(e)
        })?;

    let compile_time_secs = start.elapsed().as_secs_f64();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        error!(language = %language, compiler, stderr = %stderr, "Compilation failed");
        return Err(RunnerError::CompilationFailed { stderr });
    }

    info!(language = %language, compiler, compile_time_secs, "Compilation succeeded");
    Ok(compile_time_secs)
}
