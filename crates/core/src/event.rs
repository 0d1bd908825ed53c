use serde::{Deserialize, Serialize};

/// One host-runtime event: a numeric id and an opaque payload. The payload
/// encoding is owned by the host; consoles render it as UTF-8, lossily.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u16,
    pub payload: Vec<u8>,
}

impl Event {
    pub fn new(id: u16, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// Event carrying a UTF-8 text payload.
    pub fn text(id: u16, text: &str) -> Self {
        Self::new(id, text.as_bytes().to_vec())
    }

    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_payload_round_trips() {
        let ev = Event::text(7, "inquiry");
        assert_eq!(ev.id, 7);
        assert_eq!(ev.payload_text(), "inquiry");
    }

    #[test]
    fn non_utf8_payload_renders_lossily() {
        let ev = Event::new(1, vec![0x66, 0xff, 0x6f]);
        assert_eq!(ev.payload_text(), "f\u{fffd}o");
    }
}
