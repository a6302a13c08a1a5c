#[cfg(test)]
#[path = "command_test.rs"]
mod tests;

use std::process::Stdio;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::anyhow;
#[cfg(not(unix))]
use anyhow::bail;
use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::process::Child;
use tokio::process::Command;

use crate::domain::models::Capture;
use crate::domain::models::Speaker;

fn is_running(child: &mut Option<Child>) -> bool {
    if let Some(process) = child {
        if let Ok(None) = process.try_wait() {
            return true;
        }
    }

    return false;
}

fn kill(child: &mut Option<Child>) -> Result<()> {
    if let Some(mut process) = child.take() {
        if let Ok(None) = process.try_wait() {
            process.start_kill()?;
        }
    }

    return Ok(());
}

#[cfg(unix)]
fn signal_pid(pid: u32, sig: &str) -> Result<()> {
    let output = std::process::Command::new("kill")
        .arg(format!("-{sig}"))
        .arg(pid.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut detail = stderr.trim().to_string();
    if detail.is_empty() {
        detail = output.status.to_string();
    }

    return Err(anyhow!(
        "Failed to send SIG{sig} to speech process {pid}: {detail}"
    ));
}

#[cfg(unix)]
fn signal(child: &Option<Child>, sig: &str) -> Result<()> {
    match child.as_ref().and_then(|process| return process.id()) {
        Some(pid) => return signal_pid(pid, sig),
        None => return Ok(()),
    }
}

#[cfg(not(unix))]
fn signal(_child: &Option<Child>, _sig: &str) -> Result<()> {
    bail!("Pausing speech isn't supported on this platform");
}

/// Speaks through an external text to speech program, the text being passed
/// as its last argument. One utterance runs at a time.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(program: String, args: Vec<String>) -> CommandSpeaker {
        return CommandSpeaker {
            program,
            args,
            child: None,
        };
    }
}

impl Speaker for CommandSpeaker {
    fn is_supported(&self) -> bool {
        return true;
    }

    fn is_speaking(&mut self) -> bool {
        return is_running(&mut self.child);
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        kill(&mut self.child)?;

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        tracing::debug!(program = %self.program, pid = ?child.id(), "speaking");
        self.child = Some(child);

        return Ok(());
    }

    fn stop(&mut self) -> Result<()> {
        return kill(&mut self.child);
    }

    fn pause(&mut self) -> Result<()> {
        return signal(&self.child, "STOP");
    }

    fn resume(&mut self) -> Result<()> {
        return signal(&self.child, "CONT");
    }
}

#[derive(Default)]
struct Transcript {
    // Bumped on every start and reset. Readers of older captures stop writing.
    generation: u64,
    text: String,
}

/// Listens through an external speech to text program. Every line the
/// program prints is the latest recognition result and replaces the previous
/// one.
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    transcript: Arc<Mutex<Transcript>>,
}

impl CommandCapture {
    pub fn new(program: String, args: Vec<String>) -> CommandCapture {
        return CommandCapture {
            program,
            args,
            child: None,
            transcript: Arc::new(Mutex::new(Transcript::default())),
        };
    }

    fn next_generation(&self) -> u64 {
        match self.transcript.lock() {
            Ok(mut current) => {
                current.generation += 1;
                current.text.clear();
                return current.generation;
            }
            Err(_) => return 0,
        }
    }
}

impl Capture for CommandCapture {
    fn is_supported(&self) -> bool {
        return true;
    }

    fn is_listening(&mut self) -> bool {
        return is_running(&mut self.child);
    }

    fn transcript(&self) -> String {
        match self.transcript.lock() {
            Ok(transcript) => return transcript.text.to_string(),
            Err(_) => return "".to_string(),
        }
    }

    fn start(&mut self) -> Result<()> {
        kill(&mut self.child)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| return anyhow!("Capture command has no stdout"))?;

        let generation = self.next_generation();
        let transcript = self.transcript.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let result = line.trim();
                if result.is_empty() {
                    continue;
                }
                match transcript.lock() {
                    Ok(mut current) if current.generation == generation => {
                        current.text = result.to_string();
                    }
                    _ => {
                        tracing::debug!(generation, "dropping output of a stale capture");
                        return;
                    }
                }
            }
        });

        tracing::debug!(program = %self.program, pid = ?child.id(), "listening");
        self.child = Some(child);

        return Ok(());
    }

    fn stop(&mut self) -> Result<()> {
        return kill(&mut self.child);
    }

    fn reset(&mut self) {
        self.next_generation();
    }
}
