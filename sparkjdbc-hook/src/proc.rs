use std::{
    io::{self, BufRead},
    process::{self, Command, ExitStatus, Stdio},
    thread,
    time::Duration,
};

use nix::{
    sys::signal::{kill, Signal},
    unistd::Pid,
};
use sparkjdbc_core::err::{bail, Context, Result};
use sparkjdbc_logging::{debug, error, info, warn, MaskedArgs};

/// A running spark-submit child process
///
/// Output is streamed into the logs. If dropped while still running the
/// process is sent SIGINT and then killed after the termination timeout.
#[derive(Debug)]
pub struct SparkSubmitProcess {
    /// The command line, as shown in the logs
    masked_cmd: String,
    /// Duration to wait for the process to gracefully shutdown
    term_timeout: Duration,
    proc: process::Child,
}

impl SparkSubmitProcess {
    /// Spawns the supplied command line, the first element being the binary
    pub fn spawn(cmd: &[String], term_timeout: Duration) -> Result<Self> {
        let (program, args) = match cmd.split_first() {
            Some(s) => s,
            None => bail!("Cannot execute an empty command"),
        };

        let masked_cmd = MaskedArgs::new(cmd).to_string();
        info!("Spark-Submit cmd: {}", masked_cmd);

        let proc = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", program))?;

        Ok(Self {
            masked_cmd,
            term_timeout,
            proc,
        })
    }

    /// Waits for the process to exit, streaming any stdout/stderr to the logs
    pub fn wait(&mut self) -> Result<ExitStatus> {
        let stdout = self.proc.stdout.take().context("Failed to take stdout")?;
        let stderr = self.proc.stderr.take().context("Failed to take stderr")?;

        let out = thread::spawn(move || {
            for line in io::BufReader::new(stdout).lines() {
                let line = line.unwrap_or_else(|e| format!("failed to read: {}", e));
                info!("[spark-submit] {}", line)
            }
        });

        let err = thread::spawn(move || {
            for line in io::BufReader::new(stderr).lines() {
                let line = line.unwrap_or_else(|e| format!("failed to read: {}", e));
                warn!("[spark-submit] {}", line)
            }
        });

        let status = self
            .proc
            .wait()
            .context("Error while waiting for spark-submit")?;

        let _ = out.join();
        let _ = err.join();

        Ok(status)
    }

    /// Waits for the process to exit, failing if it exits unsuccessfully
    pub fn wait_success(&mut self) -> Result<()> {
        let status = self.wait()?;

        if !status.success() {
            bail!(
                "Cannot execute: {}. Error code is: {}.",
                self.masked_cmd,
                status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".into())
            );
        }

        Ok(())
    }

    pub fn pid(&self) -> u32 {
        self.proc.id()
    }
}

impl Drop for SparkSubmitProcess {
    fn drop(&mut self) {
        if let Ok(Some(status)) = self.proc.try_wait() {
            debug!("spark-submit exited with {}", status);
            return;
        }

        debug!("Sending SIGINT to spark-submit...");
        if let Err(err) = kill(Pid::from_raw(self.proc.id() as _), Signal::SIGINT) {
            error!("Failed to send SIGINT to spark-submit: {}", err);
            return;
        }

        let timeout_ms = self.term_timeout.as_millis();
        let mut waited_ms = 0;

        let status = loop {
            match self.proc.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(Duration::from_millis(10)),
                Err(err) => {
                    error!("Failed to wait for spark-submit: {}", err);
                    return;
                }
            }

            waited_ms += 10;
            if waited_ms > timeout_ms {
                warn!(
                    "spark-submit did not terminate after {}ms, killing...",
                    timeout_ms
                );

                if let Err(err) = self.proc.kill() {
                    error!("Failed to kill spark-submit: {}", err);
                    return;
                }

                match self.proc.wait() {
                    Ok(status) => break status,
                    Err(err) => {
                        error!("Failed to wait for spark-submit: {}", err);
                        return;
                    }
                }
            }
        };

        info!("spark-submit exited with {}", status);
    }
}
