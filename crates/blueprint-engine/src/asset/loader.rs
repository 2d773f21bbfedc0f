use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use super::{read_obj, AssetError, ObjModel};

/// One background model load.
///
/// The worker thread owns nothing but the path; the result comes back over a
/// channel and [`try_take`](Self::try_take) hands it out exactly once.
#[derive(Debug)]
pub struct ModelLoad {
    path: PathBuf,
    rx: Option<Receiver<Result<ObjModel, AssetError>>>,
}

impl ModelLoad {
    /// Starts reading `path` on a worker thread.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();

        log::info!("loading model {}", path.display());
        let spawned = thread::Builder::new()
            .name("model-load".into())
            .spawn(move || {
                let started = Instant::now();
                let result = read_obj(&worker_path);
                if result.is_ok() {
                    // item, loaded, total
                    log::info!("{} 1 1 ({:?})", worker_path.display(), started.elapsed());
                }
                // The receiver may be gone if the window closed mid-load.
                let _ = tx.send(result);
            });

        if let Err(source) = spawned {
            return Self::ready(path.clone(), Err(AssetError::Io { path, source }));
        }

        Self { path, rx: Some(rx) }
    }

    /// Wraps an already-known result; resolves on the first poll.
    pub fn ready(path: impl Into<PathBuf>, result: Result<ObjModel, AssetError>) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(result);
        Self {
            path: path.into(),
            rx: Some(rx),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the result has not been taken yet.
    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }

    /// Returns the result once it is available; `None` before that and
    /// forever after it has been taken.
    pub fn try_take(&mut self) -> Option<Result<ObjModel, AssetError>> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(AssetError::Io {
                path: self.path.clone(),
                source: io::Error::other("model loader exited without a result"),
            }),
        };
        self.rx = None;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn wait(load: &mut ModelLoad) -> Result<ObjModel, AssetError> {
        for _ in 0..500 {
            if let Some(result) = load.try_take() {
                return result;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("load did not complete");
    }

    fn temp_obj(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("blueprint-{}-{name}.obj", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn resolves_once_with_model() {
        let path = temp_obj("tri", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mut load = ModelLoad::spawn(&path);
        let model = wait(&mut load).unwrap();
        assert_eq!(model.triangle_count(), 1);
        assert!(!load.is_pending());
        assert!(load.try_take().is_none());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_resolves_to_io_error() {
        let mut load = ModelLoad::spawn("no/such/model.obj");
        assert!(matches!(wait(&mut load), Err(AssetError::Io { .. })));
        assert!(load.try_take().is_none());
    }

    #[test]
    fn ready_resolves_on_first_poll() {
        let mut load = ModelLoad::ready("mem", Err(AssetError::Empty));
        assert!(load.is_pending());
        assert!(matches!(load.try_take(), Some(Err(AssetError::Empty))));
        assert!(!load.is_pending());
    }
}
