//! Many-threads patch runner.

use std::path::PathBuf;

use async_trait::async_trait;
use fragcheck_core::ports::{PatchError, PatchRunnerPort, PatchTarget};
use tokio::process::Command;

/// Interpreter used to run the patch script.
pub const DEFAULT_PYTHON: &str = "python";

/// Runs the gridpack update script once per target.
///
/// `--prepid <p>` for a request's gridpack, `--gridpack <path>` for one
/// gridpack of a scan.
#[derive(Debug, Clone)]
pub struct ScriptPatchRunner {
    interpreter: String,
    script: PathBuf,
}

impl ScriptPatchRunner {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: DEFAULT_PYTHON.to_string(),
            script: script.into(),
        }
    }

    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    fn command(&self, target: &PatchTarget) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&self.script);
        match target {
            PatchTarget::Prepid(prepid) => cmd.arg("--prepid").arg(prepid),
            PatchTarget::Gridpack(path) => cmd.arg("--gridpack").arg(path),
        };
        cmd
    }
}

#[async_trait]
impl PatchRunnerPort for ScriptPatchRunner {
    async fn apply(&self, target: &PatchTarget) -> Result<(), PatchError> {
        tracing::info!(
            script = %self.script.display(),
            %target,
            "Running many-threads patch"
        );

        let status = self.command(target).status().await.map_err(|e| {
            PatchError::Spawn(format!("{} {}: {e}", self.interpreter, self.script.display()))
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(PatchError::Failed {
                target: target.to_string(),
                code: status.code(),
            })
        }
    }
}
