use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::error::{CmsError, Result};
use crate::services::capability::Confirm;
use crate::services::editor::{CatalogEditor, LoadOutcome, SaveReport};

/// An editor shared between threads.
///
/// Loads and saves started while another operation holds the editor are
/// rejected with [`CmsError::Busy`] instead of being queued.
///
/// Library-only: the line protocol in `main.rs` owns a single editor and
/// handles one request at a time, so it does not go through this type.
#[derive(Clone)]
pub struct SharedEditor {
    inner: Arc<Mutex<CatalogEditor>>,
}

impl SharedEditor {
    pub fn new(editor: CatalogEditor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(editor)),
        }
    }

    fn try_acquire(&self) -> Result<MutexGuard<'_, CatalogEditor>> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(CmsError::Busy),
            // a panicked operation leaves the catalog as it was at the panic
            Err(TryLockError::Poisoned(p)) => Ok(p.into_inner()),
        }
    }

    pub fn try_load(&self) -> Result<LoadOutcome> {
        Ok(self.try_acquire()?.load())
    }

    pub fn try_save(&self, confirm: &mut dyn Confirm) -> Result<SaveReport> {
        Ok(self.try_acquire()?.save(confirm))
    }

    /// Runs `f` with exclusive access, waiting for any in-flight operation.
    pub fn with<R>(&self, f: impl FnOnce(&mut CatalogEditor) -> R) -> R {
        let mut guard = match self.inner.lock() {
            Ok(g) => g,
            Err(p) => p.into_inner(),
        };
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::capability::Answer;
    use std::sync::mpsc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn save_while_busy_is_rejected() {
        let dir = TempDir::new().unwrap();
        let shared = SharedEditor::new(CatalogEditor::new(dir.path().join("downloads")));

        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let holder = shared.clone();
        let t = thread::spawn(move || {
            holder.with(|_| {
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            });
        });

        locked_rx.recv().unwrap();
        assert!(matches!(
            shared.try_save(&mut Answer(true)),
            Err(CmsError::Busy)
        ));
        assert!(matches!(shared.try_load(), Err(CmsError::Busy)));

        release_tx.send(()).unwrap();
        t.join().unwrap();

        assert!(shared.try_save(&mut Answer(true)).is_ok());
    }
}
