use std::sync::mpsc::{self, Receiver, Sender};

/// Messages a console surface applies on its UI tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleMsg {
    Line(String),
    Show,
    Hide,
}

/// Clonable write capability for a console surface.
///
/// Senders may live on any thread (observers, host adapters); delivery is a
/// channel the UI drains once per tick. Sends never block, and a send after
/// the surface is gone is silently dropped.
#[derive(Clone, Debug)]
pub struct ConsoleHandle {
    tx: Sender<ConsoleMsg>,
}

impl ConsoleHandle {
    /// Create a handle plus the receiving end the surface drains.
    pub fn channel() -> (Self, Receiver<ConsoleMsg>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Append a line to the transcript.
    pub fn write(&self, line: impl Into<String>) {
        let _ = self.tx.send(ConsoleMsg::Line(line.into()));
    }

    /// Append an error line; forwards to [`write`](Self::write) with an
    /// `ERROR: ` prefix.
    pub fn write_error(&self, line: impl AsRef<str>) {
        self.write(format!("ERROR: {}", line.as_ref()));
    }

    /// Make the console surface visible and accepting input.
    pub fn show(&self) {
        let _ = self.tx.send(ConsoleMsg::Show);
    }

    /// Hide the console surface.
    pub fn hide(&self) {
        let _ = self.tx.send(ConsoleMsg::Hide);
    }
}
