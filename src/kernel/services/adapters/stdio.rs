//! Newline-delimited JSON transport to the extension host.
//!
//! Requests come in one per line and are answered out of order as they
//! complete. Responses and notifications share one outbound line channel so
//! writes never interleave.

use std::rc::Rc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::kernel::mirror::protocol::{self, Notification};
use crate::kernel::mirror::{ChangeSet, MainThreadEditors, PropertiesChange};
use crate::kernel::services::ports::ExtHostEditors;

#[derive(Clone)]
pub struct JsonLineProxy {
    tx: UnboundedSender<String>,
}

impl JsonLineProxy {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// A proxy plus the receiving end of its line channel.
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn sender(&self) -> UnboundedSender<String> {
        self.tx.clone()
    }

    fn notify(&self, notification: &Notification) {
        send_json(&self.tx, notification);
    }
}

impl ExtHostEditors for JsonLineProxy {
    fn accept_change(&self, change: ChangeSet) {
        self.notify(&Notification::AcceptChange(change));
    }

    fn accept_properties_change(&self, change: PropertiesChange) {
        self.notify(&Notification::AcceptPropertiesChange(change));
    }
}

fn send_json<T: Serialize>(tx: &UnboundedSender<String>, value: &T) {
    let line = match serde_json::to_string(value) {
        Ok(line) => line,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode outbound message");
            return;
        }
    };
    if tx.send(line).is_err() {
        tracing::warn!("outbound channel closed");
    }
}

/// Writes every queued line to `writer` until all senders are gone.
pub async fn write_lines<W: AsyncWrite + Unpin>(
    mut rx: UnboundedReceiver<String>,
    mut writer: W,
) -> std::io::Result<()> {
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Reads requests from `reader` until EOF. Each request runs as its own
/// local task; must be called inside a `LocalSet`.
pub async fn serve<R: AsyncBufRead + Unpin>(
    mirror: Rc<MainThreadEditors>,
    reader: R,
    tx: UnboundedSender<String>,
) -> std::io::Result<()> {
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let mirror = Rc::clone(&mirror);
        let tx = tx.clone();
        tokio::task::spawn_local(async move {
            let response = protocol::handle_line(&mirror, &line).await;
            send_json(&tx, &response);
        });
    }
    tracing::info!("request stream closed");
    Ok(())
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/stdio.rs"]
mod tests;
