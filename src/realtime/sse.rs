//! Incremental server-sent events parser.
//!
//! The database's streaming endpoint sends `event:`/`data:` blocks separated
//! by blank lines. Network chunks may end anywhere, including in the middle
//! of a line or a UTF-8 sequence, so bytes are buffered until a full line
//! is available.

/// One dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Line-oriented SSE parser fed with raw byte chunks.
#[derive(Debug, Default)]
pub struct EventParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // id and retry carry nothing the database uses
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.event.is_none() && self.data.is_empty() {
            return None;
        }
        let event = SseEvent {
            event: self.event.take().unwrap_or_else(|| "message".to_string()),
            data: self.data.join("\n"),
        };
        self.data.clear();
        Some(event)
    }
}
