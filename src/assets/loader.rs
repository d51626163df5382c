use std::collections::HashMap;
use std::sync::{Arc, mpsc};

use crate::assets::logo::{LogoImage, load_logo};
use crate::foundation::error::{QrError, QrResult};

/// Current state of one logo source.
#[derive(Clone, Debug)]
pub enum LogoStatus {
    /// Decoded and ready to draw.
    Ready(Arc<LogoImage>),
    /// A worker is still loading it.
    Pending,
    /// Loading failed; the message is user-facing.
    Failed(String),
}

/// Completion report produced by [`LogoStore::poll`].
#[derive(Clone, Debug)]
pub struct LogoEvent {
    /// Source string as requested.
    pub source: String,
    /// `Err` holds the failure message.
    pub outcome: Result<(), String>,
}

type LoadResult = (String, QrResult<LogoImage>);
type LoadFn = fn(&str, &Arc<usvg::fontdb::Database>) -> QrResult<LogoImage>;

/// Asynchronous logo loader.
///
/// Each new source is decoded on a short-lived worker thread that reports back over a channel.
/// Results (including failures) are kept until [`LogoStore::clear`], so a broken source is not
/// retried on every frame.
pub struct LogoStore {
    slots: HashMap<String, LogoStatus>,
    tx: mpsc::Sender<LoadResult>,
    rx: mpsc::Receiver<LoadResult>,
    fontdb: Arc<usvg::fontdb::Database>,
    load: LoadFn,
}

impl LogoStore {
    /// Build a store whose SVG logos resolve text against `fontdb`.
    pub fn new(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self::with_loader(fontdb, load_logo)
    }

    fn with_loader(fontdb: Arc<usvg::fontdb::Database>, load: LoadFn) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            slots: HashMap::new(),
            tx,
            rx,
            fontdb,
            load,
        }
    }

    /// Status for `source`, starting a background load the first time it is seen.
    pub fn request(&mut self, source: &str) -> LogoStatus {
        if let Some(s) = self.slots.get(source) {
            return s.clone();
        }

        let src = source.to_string();
        let tx = self.tx.clone();
        let db = self.fontdb.clone();
        let load = self.load;
        let spawned = std::thread::Builder::new()
            .name("qrdecor-logo".to_string())
            .spawn(move || {
                // The store keeps a sender alive, so every worker must report back.
                let res = load_guarded(load, &src, &db);
                let _ = tx.send((src, res));
            });

        let status = match spawned {
            Ok(_) => {
                tracing::debug!(source, "logo load started");
                LogoStatus::Pending
            }
            Err(e) => LogoStatus::Failed(format!("failed to spawn logo loader: {e}")),
        };
        self.slots.insert(source.to_string(), status.clone());
        status
    }

    /// Drain finished loads without blocking.
    pub fn poll(&mut self) -> Vec<LogoEvent> {
        let mut out = Vec::new();
        while let Ok((source, res)) = self.rx.try_recv() {
            out.push(self.record(source, res));
        }
        out
    }

    /// Load `source` on the calling thread, waiting for an in-flight worker if there is one.
    pub fn load_blocking(&mut self, source: &str) -> QrResult<Arc<LogoImage>> {
        loop {
            match self.slots.get(source) {
                Some(LogoStatus::Ready(img)) => return Ok(img.clone()),
                Some(LogoStatus::Failed(msg)) => return Err(QrError::asset_load(msg.clone())),
                Some(LogoStatus::Pending) => {
                    let (src, res) = self
                        .rx
                        .recv()
                        .map_err(|_| QrError::asset_load("logo loader channel closed"))?;
                    self.record(src, res);
                }
                None => {
                    let res = load_guarded(self.load, source, &self.fontdb);
                    self.record(source.to_string(), res);
                }
            }
        }
    }

    /// True while any worker has not reported back.
    pub fn has_pending(&self) -> bool {
        self.slots.values().any(|s| matches!(s, LogoStatus::Pending))
    }

    /// Forget all results. In-flight workers still report, and their results are kept.
    pub fn clear(&mut self) {
        self.slots.retain(|_, s| matches!(s, LogoStatus::Pending));
    }

    fn record(&mut self, source: String, res: QrResult<LogoImage>) -> LogoEvent {
        let (status, outcome) = match res {
            Ok(img) => {
                tracing::debug!(source = %source, w = img.width, h = img.height, "logo loaded");
                (LogoStatus::Ready(Arc::new(img)), Ok(()))
            }
            Err(e) => {
                let msg = e.to_string();
                tracing::warn!(source = %source, error = %msg, "logo load failed");
                (LogoStatus::Failed(msg.clone()), Err(msg))
            }
        };
        self.slots.insert(source.clone(), status);
        LogoEvent { source, outcome }
    }
}

/// Run `load`, turning a decoder panic on hostile bytes into a load failure.
fn load_guarded(
    load: LoadFn,
    source: &str,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> QrResult<LogoImage> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| load(source, fontdb)))
        .unwrap_or_else(|payload| {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(QrError::asset_load(format!("logo decoder panicked: {msg}")))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
