//! Simulator process launcher
//!
//! Starts the external Digital simulator and owns its lifetime. The child is
//! killed when the handle is dropped so it never outlives this process.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::error::{LifeError, Result};

/// A running simulator process
#[derive(Debug)]
pub struct Simulator {
    child: Child,
    program: PathBuf,
    reaped: bool,
}

impl Simulator {
    /// Launch `executable`, passing `circuit` as its only argument if given
    ///
    /// `.jar` files are run through `java -jar`.
    pub fn launch(executable: &Path, circuit: Option<&Path>) -> Result<Self> {
        let child = command_for(executable, circuit)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LifeError::Launch {
                program: executable.to_path_buf(),
                source,
            })?;

        tracing::info!("Started Digital (PID: {})", child.id());

        Ok(Self {
            child,
            program: executable.to_path_buf(),
            reaped: false,
        })
    }

    /// OS process id
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the process has not exited yet
    pub fn is_running(&mut self) -> Result<bool> {
        if self.reaped {
            return Ok(false);
        }
        match self.child.try_wait()? {
            Some(status) => {
                tracing::debug!("Digital exited with {}", status);
                self.reaped = true;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    /// Forcibly terminate the process and reap it
    ///
    /// Killing an already exited process is not an error.
    pub fn kill(&mut self) -> Result<()> {
        if !self.is_running()? {
            return Ok(());
        }

        tracing::info!("Shutting down Digital...");
        if let Err(e) = self.child.kill() {
            // Exited between the check and the kill
            if e.kind() != std::io::ErrorKind::InvalidInput {
                return Err(e.into());
            }
        }
        self.child.wait()?;
        self.reaped = true;
        Ok(())
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if let Err(e) = self.kill() {
            tracing::warn!("Failed to stop Digital (PID: {}): {}", self.child.id(), e);
        }
    }
}

/// Build the process command used to launch `executable`
pub fn command_for(executable: &Path, circuit: Option<&Path>) -> Command {
    let mut cmd = if is_jar(executable) {
        let mut java = Command::new("java");
        java.arg("-jar").arg(executable);
        java
    } else {
        Command::new(executable)
    };

    if let Some(circuit) = circuit {
        cmd.arg(circuit);
    }
    cmd
}

fn is_jar(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("jar"))
}
