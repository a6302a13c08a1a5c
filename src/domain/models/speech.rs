use anyhow::Result;

/// Text to speech output. Every `speak` cancels whatever was being spoken
/// before starting the new utterance.
pub trait Speaker {
    /// False when the device can't produce speech at all. Features that depend
    /// on it are hidden rather than failing when used.
    fn is_supported(&self) -> bool;

    fn is_speaking(&mut self) -> bool;

    fn speak(&mut self, text: &str) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn resume(&mut self) -> Result<()>;
}

/// Speech to text capture. `transcript` is the latest recognition result,
/// each new result replaces the previous one.
pub trait Capture {
    fn is_supported(&self) -> bool;

    fn is_listening(&mut self) -> bool;

    fn transcript(&self) -> String;

    fn start(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn reset(&mut self);
}

pub type SpeakerBox = Box<dyn Speaker + Send>;
pub type CaptureBox = Box<dyn Capture + Send>;
