//! Async Operations
//!
//! Non-blocking file reads on background threads. The frame loop polls each
//! pending operation once per frame until it completes.

use super::{LocalStorage, StorageError};
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc::{channel, Receiver, TryRecvError};
#[cfg(not(target_arch = "wasm32"))]
use std::thread;

/// Result type for async operations
pub type AsyncResult<T> = Result<T, StorageError>;

/// A handle to a pending async operation that can be polled
pub struct AsyncOp<T> {
    #[cfg(not(target_arch = "wasm32"))]
    receiver: Option<Receiver<AsyncResult<T>>>,
    result: Option<AsyncResult<T>>,
}

impl<T> AsyncOp<T> {
    /// An operation that has already finished
    pub fn ready(result: AsyncResult<T>) -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            receiver: None,
            result: Some(result),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_receiver(receiver: Receiver<AsyncResult<T>>) -> Self {
        Self {
            receiver: Some(receiver),
            result: None,
        }
    }

    /// Check if the operation has completed (polls the channel)
    pub fn is_complete(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(receiver) = &self.receiver {
                match receiver.try_recv() {
                    Ok(result) => {
                        self.result = Some(result);
                        return true;
                    }
                    Err(TryRecvError::Empty) => return false,
                    Err(TryRecvError::Disconnected) => {
                        // Worker panicked or dropped its sender
                        self.result = Some(Err(StorageError::Other("operation failed".into())));
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Take the result if complete, otherwise hand the op back
    pub fn take(mut self) -> Result<AsyncResult<T>, Self> {
        if self.is_complete() {
            if let Some(result) = self.result.take() {
                return Ok(result);
            }
        }
        Err(self)
    }
}

/// Pending file read
pub struct PendingLoad {
    pub op: AsyncOp<Vec<u8>>,
    pub path: PathBuf,
}

/// Start reading a file in the background
#[cfg(not(target_arch = "wasm32"))]
pub fn load_async(storage: &LocalStorage, path: PathBuf) -> PendingLoad {
    let (sender, receiver) = channel();
    let storage = storage.clone();
    let worker_path = path.clone();

    thread::spawn(move || {
        let result = storage.read(&worker_path);
        let _ = sender.send(result);
    });

    PendingLoad {
        op: AsyncOp::from_receiver(receiver),
        path,
    }
}

/// On WASM reads resolve immediately (the loader works from the bundled manifest)
#[cfg(target_arch = "wasm32")]
pub fn load_async(storage: &LocalStorage, path: PathBuf) -> PendingLoad {
    let result = storage.read(&path);
    PendingLoad {
        op: AsyncOp::ready(result),
        path,
    }
}
