//! Server-Sent Events (SSE) utilities
//!
//! The server side turns [`LineupEvent`]s into axum SSE events; the client side
//! ([`SseDecoder`]) reassembles frames from a streamed `text/event-stream`
//! body. Keeping both here pins the wire format in one place.

use axum::response::sse::Event;

use crate::events::LineupEvent;

/// Encode a lineup event as an SSE event (`event:` name + JSON `data:`)
pub fn to_sse_event(event: &LineupEvent) -> Result<Event, serde_json::Error> {
    let json = serde_json::to_string(event)?;
    Ok(Event::default().event(event.channel_event_name()).data(json))
}

/// One dispatched SSE frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

impl SseFrame {
    /// Parse the frame's data as a lineup event
    pub fn lineup_event(&self) -> Result<LineupEvent, serde_json::Error> {
        serde_json::from_str(&self.data)
    }
}

/// Incremental `text/event-stream` decoder
///
/// Bytes may arrive split anywhere (including inside a UTF-8 sequence); only
/// complete lines are interpreted.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every frame it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(&['\n', '\r'][..]);

            if line.is_empty() {
                if let Some(frame) = self.take_frame() {
                    frames.push(frame);
                }
                continue;
            }

            // Comment (keep-alive)
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };

            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                _ => {}
            }
        }

        frames
    }

    fn take_frame(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame { event, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_event() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"event: breed-notification\ndata: {\"a\":1}\n\n");
        assert_eq!(
            frames,
            vec![SseFrame {
                event: Some("breed-notification".to_string()),
                data: "{\"a\":1}".to_string(),
            }]
        );
    }

    #[test]
    fn frames_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"event: lineup-sa").is_empty());
        assert!(decoder.push(b"ved\r\ndata: x").is_empty());
        let frames = decoder.push(b"\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event.as_deref(), Some("lineup-saved"));
        assert_eq!(frames[0].data, "x");
    }

    #[test]
    fn comments_and_empty_frames_are_skipped() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b":heartbeat\n\nevent: only-name\n\ndata: a\ndata: b\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, None);
        assert_eq!(frames[0].data, "a\nb");
    }

    #[test]
    fn multibyte_character_split_between_chunks() {
        let mut decoder = SseDecoder::new();
        let text = "data: Crème\n\n".as_bytes();
        let split = text.iter().position(|b| *b == 0xC3).unwrap() + 1;
        assert!(decoder.push(&text[..split]).is_empty());
        let frames = decoder.push(&text[split..]);
        assert_eq!(frames[0].data, "Crème");
    }
}
