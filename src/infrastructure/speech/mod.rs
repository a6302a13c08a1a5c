pub mod command;
pub mod unsupported;

use std::env;
use std::path;

use crate::domain::models::CaptureBox;
use crate::domain::models::SpeakerBox;

/// Splits a configured command line into the program and its arguments.
fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let mut parts = command
        .split_whitespace()
        .map(|e| return e.to_string())
        .collect::<Vec<String>>();
    if parts.is_empty() {
        return None;
    }

    let program = parts.remove(0);
    return Some((program, parts));
}

/// Whether `program` can be started, either as a path or through `PATH`.
fn program_exists(program: &str) -> bool {
    if program.contains(path::MAIN_SEPARATOR) {
        return path::Path::new(program).is_file();
    }

    if let Some(paths) = env::var_os("PATH") {
        return env::split_paths(&paths).any(|dir| {
            let candidate = dir.join(program);
            if candidate.is_file() {
                return true;
            }

            return cfg!(windows) && candidate.with_extension("exe").is_file();
        });
    }

    return false;
}

pub struct SpeechManager {}

impl SpeechManager {
    pub fn speaker(command: &str) -> SpeakerBox {
        if let Some((program, args)) = split_command(command) {
            if program_exists(&program) {
                return Box::new(command::CommandSpeaker::new(program, args));
            }
            tracing::warn!(program = %program, "speech command not found, speech output disabled");
        }

        return Box::<unsupported::UnsupportedSpeaker>::default();
    }

    pub fn capture(command: &str) -> CaptureBox {
        if let Some((program, args)) = split_command(command) {
            if program_exists(&program) {
                return Box::new(command::CommandCapture::new(program, args));
            }
            tracing::warn!(program = %program, "capture command not found, speech capture disabled");
        }

        return Box::<unsupported::UnsupportedCapture>::default();
    }
}
