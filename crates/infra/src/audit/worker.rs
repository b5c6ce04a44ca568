use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender, TrySendError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use procura_events::{AuditRecord, AuditSink};

use super::log::AuditLog;

/// Non-blocking sink feeding an [`AuditWorker`] over a bounded channel.
///
/// When the queue is full or the worker is gone the record is dropped with a
/// warning; the caller never waits and never sees an error.
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    tx: SyncSender<AuditRecord>,
}

impl AuditSink for ChannelAuditSink {
    fn record(&self, record: AuditRecord) {
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(rec)) => {
                warn!(action = %rec.action, entity_id = %rec.entity_id, "audit queue full, dropping record");
            }
            Err(TrySendError::Disconnected(rec)) => {
                warn!(action = %rec.action, entity_id = %rec.entity_id, "audit worker stopped, dropping record");
            }
        }
    }
}

/// Handle to control and join the audit worker.
#[derive(Debug)]
pub struct AuditWorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl AuditWorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    ///
    /// Records already queued are written before the worker exits.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Background writer for audit records.
#[derive(Debug)]
pub struct AuditWorker;

impl AuditWorker {
    /// Spawn the worker thread and return the sink that feeds it.
    pub fn spawn<L>(
        name: impl Into<String>,
        capacity: usize,
        log: L,
    ) -> io::Result<(ChannelAuditSink, AuditWorkerHandle)>
    where
        L: AuditLog + 'static,
    {
        let name = name.into();
        let (tx, rx) = mpsc::sync_channel::<AuditRecord>(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let worker_name = name.clone();
        let join = thread::Builder::new()
            .name(name)
            .spawn(move || worker_loop(&worker_name, rx, shutdown_rx, &log))?;

        Ok((
            ChannelAuditSink { tx },
            AuditWorkerHandle {
                shutdown: shutdown_tx,
                join: Some(join),
            },
        ))
    }
}

fn worker_loop<L: AuditLog>(
    name: &str,
    rx: mpsc::Receiver<AuditRecord>,
    shutdown_rx: mpsc::Receiver<()>,
    log: &L,
) {
    let tick = Duration::from_millis(250);

    loop {
        if shutdown_rx.try_recv().is_ok() {
            let mut drained = 0usize;
            while let Ok(record) = rx.try_recv() {
                log.append(record);
                drained += 1;
            }
            debug!(worker = name, drained, "audit worker stopping");
            break;
        }

        match rx.recv_timeout(tick) {
            Ok(record) => log.append(record),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
