//! Newline-delimited JSON adapter.
//!
//! Inbound: one [`ControllerEvent`] per line. Outbound: one
//! [`OutboundRecord`] per line, either a message for a switch or a
//! topology query. Malformed input lines are logged and skipped.

use super::event::ControllerEvent;
use crate::error::Result;
use rswitch_openflow::{Message, MessageSender, RequestId, SendError, TopologyService};
use rswitch_types::SwitchId;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A record written to the outbound stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboundRecord {
    Message { switch: SwitchId, message: Message },
    QueryLinks { request_id: RequestId },
}

/// Outbound side of the bridge.
///
/// Cloning is cheap; every clone feeds the same stream. Sends fail only
/// once the writer has gone away.
#[derive(Debug, Clone)]
pub struct JsonLineBridge {
    outbound: mpsc::UnboundedSender<OutboundRecord>,
}

impl JsonLineBridge {
    /// Creates a bridge and the receiver to pass to
    /// [`write_records`](Self::write_records).
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundRecord>) {
        let (outbound, records) = mpsc::unbounded_channel();
        (Self { outbound }, records)
    }

    /// Reads events from `reader` until end of input or until `events` is
    /// closed. Returns the number of events forwarded.
    pub async fn read_events<R>(
        reader: R,
        events: mpsc::UnboundedSender<ControllerEvent>,
    ) -> Result<u64>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut line_no: u64 = 0;
        let mut forwarded: u64 = 0;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<ControllerEvent>(line) {
                Ok(event) => {
                    if events.send(event).is_err() {
                        debug!("Event channel closed, stopping reader");
                        break;
                    }
                    forwarded += 1;
                }
                Err(e) => warn!(line_no, error = %e, "Skipping malformed event"),
            }
        }

        Ok(forwarded)
    }

    /// Writes records to `writer` until every bridge handle is dropped.
    /// Returns the number of records written.
    pub async fn write_records<W>(
        mut writer: W,
        mut records: mpsc::UnboundedReceiver<OutboundRecord>,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written: u64 = 0;
        while let Some(record) = records.recv().await {
            let mut line = serde_json::to_vec(&record)?;
            line.push(b'\n');
            writer.write_all(&line).await?;
            writer.flush().await?;
            written += 1;
        }
        Ok(written)
    }

    fn push(&self, record: OutboundRecord) -> std::result::Result<(), SendError> {
        self.outbound.send(record).map_err(|_| SendError::Closed)
    }
}

impl MessageSender for JsonLineBridge {
    fn send_message(
        &self,
        switch: SwitchId,
        message: Message,
    ) -> std::result::Result<(), SendError> {
        self.push(OutboundRecord::Message { switch, message })
    }
}

impl TopologyService for JsonLineBridge {
    fn query_links(&self, request: RequestId) -> std::result::Result<(), SendError> {
        self.push(OutboundRecord::QueryLinks {
            request_id: request,
        })
    }
}
