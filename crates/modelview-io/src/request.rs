use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use modelview_core::loader::{AssetSource, LoadError, LoadStatus};
use modelview_core::node::SceneNode;

use crate::asset::{decode_model, AssetError};

/// Bytes read between two progress reports.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// One asset fetch running on a background thread.
///
/// Progress, then exactly one of `Loaded` / `Failed`, arrive over a channel
/// and are handed out by [`AssetSource::poll`]. Nothing is attached anywhere
/// until the caller applies a `Loaded` status.
pub struct AssetRequest {
    name: String,
    receiver: Receiver<LoadStatus>,
    finished: bool,
}

impl AssetRequest {
    /// Read and decode the file at `path`. Buffers referenced by a `.gltf`
    /// are resolved next to it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let name = asset_name(&path);
        let job_name = name.clone();
        Self::spawn(name, move |tx| {
            let file = File::open(&path)?;
            let total = file.metadata().map(|m| m.len()).unwrap_or(0);
            let bytes = read_with_progress(file, total, tx)?;
            decode_model(&bytes, path.parent(), &job_name)
        })
    }

    fn spawn<F>(name: String, job: F) -> Self
    where
        F: FnOnce(&Sender<LoadStatus>) -> Result<SceneNode, AssetError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let job_tx = tx.clone();
        let spawned = thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                let status = match job(&job_tx) {
                    Ok(model) => LoadStatus::Loaded(model),
                    Err(err) => LoadStatus::Failed(err.into()),
                };
                // The receiver may be gone if the viewer shut down first.
                let _ = job_tx.send(status);
            });
        if let Err(err) = spawned {
            let _ = tx.send(LoadStatus::Failed(LoadError::Fetch(err.to_string())));
        }
        log::info!("Requested asset '{}'", name);
        Self {
            name,
            receiver: rx,
            finished: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn observe(&mut self, status: LoadStatus) -> LoadStatus {
        if status.is_terminal() {
            self.finished = true;
        }
        status
    }

    fn disconnected(&mut self) -> LoadStatus {
        self.finished = true;
        log::warn!("Asset loader for '{}' exited without a result", self.name);
        LoadStatus::Failed(LoadError::Disconnected)
    }
}

impl AssetSource for AssetRequest {
    fn poll(&mut self) -> Option<LoadStatus> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(status) => Some(self.observe(status)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.disconnected()),
        }
    }
}

/// Read `reader` to the end in [`CHUNK_SIZE`] pieces, reporting progress after
/// each one.
fn read_with_progress<R: Read>(
    mut reader: R,
    total: u64,
    tx: &Sender<LoadStatus>,
) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(total.min(256 * 1024 * 1024) as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        bytes.extend_from_slice(&chunk[..n]);
        let _ = tx.send(LoadStatus::Progress {
            loaded: bytes.len() as u64,
            total,
        });
    }
    log::debug!("Read {} bytes", bytes.len());
    Ok(bytes)
}

fn asset_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
