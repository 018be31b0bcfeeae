use futures::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::{Transport, TransportError};
use crate::error::Result;
use crate::protocol::OutboundEvent;

pub type EventStream = UnboundedReceiverStream<OutboundEvent>;

/// Hands events to an unbounded queue so `emit` never waits on the socket.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<OutboundEvent>,
}

impl ChannelTransport {
    pub fn new() -> (Self, EventStream) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, UnboundedReceiverStream::new(receiver))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Transport for ChannelTransport {
    fn emit(&self, event: OutboundEvent) -> std::result::Result<(), TransportError> {
        let name = event.name();
        self.sender
            .send(event)
            .map_err(|_| TransportError::Closed(name))
    }
}

/// Drains `events` onto `writer`, one newline-terminated frame per event.
/// Returns the number of frames written once every sender is gone.
pub async fn write_frames<W>(mut events: EventStream, mut writer: W) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(event) = events.next().await {
        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Failed to encode {} frame: {}", event.name(), e);
                continue;
            }
        };
        if let Err(e) = writer.write_all(frame.as_bytes()).await {
            log::warn!("Socket write failed for {}: {}", event.name(), e);
            break;
        }
        if let Err(e) = writer.write_all(b"\n").await {
            log::warn!("Socket write failed for {}: {}", event.name(), e);
            break;
        }
        log::debug!("Sent {}", event.name());
        written += 1;
    }
    if let Err(e) = writer.flush().await {
        log::warn!("Socket flush failed: {}", e);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GalleryCategory;

    #[tokio::test]
    async fn frames_are_written_in_emission_order() {
        let (transport, events) = ChannelTransport::new();
        transport.emit(OutboundEvent::Cancel).unwrap();
        transport
            .emit(OutboundEvent::RequestLatestImages {
                category: GalleryCategory::Result,
                latest_mtime: Some(1700),
            })
            .unwrap();
        drop(transport);

        let mut sink: Vec<u8> = Vec::new();
        let written = write_frames(events, &mut sink).await.unwrap();

        assert_eq!(written, 2);
        let text = String::from_utf8(sink).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"42["cancel"]"#);
        assert_eq!(lines[1], r#"42["requestLatestImages","result",1700]"#);
    }

    #[tokio::test]
    async fn emit_after_receiver_dropped_reports_closed() {
        let (transport, events) = ChannelTransport::new();
        drop(events);
        assert!(transport.is_closed());
        assert_eq!(
            transport.emit(OutboundEvent::RequestSystemConfig),
            Err(TransportError::Closed("requestSystemConfig"))
        );
    }
}
