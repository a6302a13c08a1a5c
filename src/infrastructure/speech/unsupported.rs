use anyhow::bail;
use anyhow::Result;

use crate::domain::models::Capture;
use crate::domain::models::Speaker;

const SPEECH_UNAVAILABLE: &str = "Speech output isn't available. Set `speech-command` to a text to speech program to enable it.";

#[derive(Default)]
pub struct UnsupportedSpeaker {}

impl Speaker for UnsupportedSpeaker {
    fn is_supported(&self) -> bool {
        return false;
    }

    fn is_speaking(&mut self) -> bool {
        return false;
    }

    fn speak(&mut self, _text: &str) -> Result<()> {
        bail!(SPEECH_UNAVAILABLE);
    }

    fn stop(&mut self) -> Result<()> {
        return Ok(());
    }

    fn pause(&mut self) -> Result<()> {
        bail!(SPEECH_UNAVAILABLE);
    }

    fn resume(&mut self) -> Result<()> {
        bail!(SPEECH_UNAVAILABLE);
    }
}

#[derive(Default)]
pub struct UnsupportedCapture {}

impl Capture for UnsupportedCapture {
    fn is_supported(&self) -> bool {
        return false;
    }

    fn is_listening(&mut self) -> bool {
        return false;
    }

    fn transcript(&self) -> String {
        return "".to_string();
    }

    fn start(&mut self) -> Result<()> {
        bail!("Speech capture isn't available. Set `capture-command` to a speech to text program to enable it.");
    }

    fn stop(&mut self) -> Result<()> {
        return Ok(());
    }

    fn reset(&mut self) {}
}
