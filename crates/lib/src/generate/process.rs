//! Generator subprocess execution.
//!
//! Both output pipes are drained by their own task while the process runs.
//! A generator that fills one pipe while we block on the other would
//! otherwise never exit.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::debug;

use super::types::GenerateError;

/// Captured result of one generator run.
#[derive(Debug)]
pub struct ProcessOutput {
  pub status: ExitStatus,
  pub stdout: String,
  pub stderr: String,
}

/// Runs `program` with `args` in `cwd` and waits for it to exit.
pub async fn run(program: &Path, args: &[String], cwd: &Path) -> Result<ProcessOutput, GenerateError> {
  debug!(program = %program.display(), args = ?args, cwd = %cwd.display(), "spawning generator");

  let launch_err = |source| GenerateError::Launch {
    program: program.to_path_buf(),
    source,
  };

  let mut child = Command::new(program)
    .args(args)
    .current_dir(cwd)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
    .map_err(launch_err)?;

  let stdout = drain(child.stdout.take());
  let stderr = drain(child.stderr.take());

  let status = child.wait().await.map_err(launch_err)?;

  let stdout = join(stdout, program).await?;
  let stderr = join(stderr, program).await?;

  debug!(program = %program.display(), status = %status, "generator exited");

  Ok(ProcessOutput {
    status,
    stdout: String::from_utf8_lossy(&stdout).into_owned(),
    stderr: String::from_utf8_lossy(&stderr).into_owned(),
  })
}

fn drain<R>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>>
where
  R: AsyncRead + Unpin + Send + 'static,
{
  tokio::spawn(async move {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
      pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
  })
}

async fn join(handle: JoinHandle<std::io::Result<Vec<u8>>>, program: &Path) -> Result<Vec<u8>, GenerateError> {
  match handle.await {
    Ok(result) => result.map_err(|e| GenerateError::io(program, e)),
    Err(e) => Err(GenerateError::io(program, std::io::Error::other(e))),
  }
}
