//! Background writer for layout mutations.
//!
//! The interaction thread must never wait on storage. [`LayoutWriter`] owns a
//! worker thread that applies queued mutations to a shared
//! [`LayoutRepository`] in submission order. Each submission returns a
//! receipt the caller may keep to learn the outcome, or simply drop.

use anyhow::{anyhow, Result};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

use crate::models::{KeyPosition, Language, LayoutId};
use crate::services::layouts::LayoutRepository;

/// Outcome of a queued mutation, delivered once the worker has applied it.
pub type Receipt<T> = Receiver<Result<T>>;

enum WriteCommand {
    Save {
        name: String,
        rows: Vec<Vec<KeyPosition>>,
        language: Language,
        reply: Sender<Result<LayoutId>>,
    },
    Rename {
        id: LayoutId,
        name: String,
        reply: Sender<Result<bool>>,
    },
    Delete {
        id: LayoutId,
        reply: Sender<Result<bool>>,
    },
    SetDefault {
        id: LayoutId,
        language: Language,
        reply: Sender<Result<bool>>,
    },
}

impl WriteCommand {
    fn apply(self, repository: &LayoutRepository) {
        match self {
            Self::Save {
                name,
                rows,
                language,
                reply,
            } => deliver(&reply, "save", repository.save_layout(&name, &rows, language)),
            Self::Rename { id, name, reply } => {
                deliver(&reply, "rename", repository.rename_layout(id, &name));
            }
            Self::Delete { id, reply } => deliver(&reply, "delete", repository.delete_layout(id)),
            Self::SetDefault {
                id,
                language,
                reply,
            } => deliver(
                &reply,
                "set default",
                repository.set_default_layout(id, language),
            ),
        }
    }

    fn reject(self) {
        match self {
            Self::Save { reply, .. } => refuse(&reply),
            Self::Rename { reply, .. }
            | Self::Delete { reply, .. }
            | Self::SetDefault { reply, .. } => refuse(&reply),
        }
    }
}

fn refuse<T>(reply: &Sender<Result<T>>) {
    let _ = reply.send(Err(anyhow!("Layout writer has stopped")));
}

fn deliver<T>(reply: &Sender<Result<T>>, operation: &str, result: Result<T>) {
    if let Err(e) = &result {
        error!("Layout {} failed: {:#}", operation, e);
    }
    let _ = reply.send(result);
}

/// Fire-and-forget front end for layout mutations.
///
/// Dropping the writer closes the queue and waits for already submitted
/// commands to finish. Submissions are not deduplicated.
#[derive(Debug)]
pub struct LayoutWriter {
    sender: Option<Sender<WriteCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl LayoutWriter {
    /// Starts the worker thread.
    pub fn spawn(repository: Arc<LayoutRepository>) -> Result<Self> {
        let (sender, receiver) = channel::<WriteCommand>();

        let worker = thread::Builder::new()
            .name("layout-writer".to_string())
            .spawn(move || {
                for command in receiver {
                    command.apply(&repository);
                }
                debug!("Layout writer queue closed");
            })
            .map_err(|e| anyhow!("Failed to start layout writer: {e}"))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    fn submit(&self, command: WriteCommand) {
        let Some(sender) = &self.sender else {
            command.reject();
            return;
        };
        if let Err(failed) = sender.send(command) {
            failed.0.reject();
        }
    }

    /// Queues saving rows as a new layout.
    pub fn save(
        &self,
        name: impl Into<String>,
        rows: Vec<Vec<KeyPosition>>,
        language: Language,
    ) -> Receipt<LayoutId> {
        let (reply, receipt) = channel();
        self.submit(WriteCommand::Save {
            name: name.into(),
            rows,
            language,
            reply,
        });
        receipt
    }

    /// Queues a rename.
    pub fn rename(&self, id: LayoutId, name: impl Into<String>) -> Receipt<bool> {
        let (reply, receipt) = channel();
        self.submit(WriteCommand::Rename {
            id,
            name: name.into(),
            reply,
        });
        receipt
    }

    /// Queues a delete.
    pub fn delete(&self, id: LayoutId) -> Receipt<bool> {
        let (reply, receipt) = channel();
        self.submit(WriteCommand::Delete { id, reply });
        receipt
    }

    /// Queues a default change.
    pub fn set_default(&self, id: LayoutId, language: Language) -> Receipt<bool> {
        let (reply, receipt) = channel();
        self.submit(WriteCommand::SetDefault {
            id,
            language,
            reply,
        });
        receipt
    }

    /// Closes the queue and waits for pending commands.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.sender = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Layout writer thread panicked");
            }
        }
    }
}

impl Drop for LayoutWriter {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::LayoutCatalog;

    fn rows() -> Vec<Vec<KeyPosition>> {
        LayoutCatalog::new().default_layout(Language::En).to_positions()
    }

    #[test]
    fn test_receipts_report_outcomes() {
        let repository = Arc::new(LayoutRepository::in_memory());
        let writer = LayoutWriter::spawn(Arc::clone(&repository)).unwrap();

        let id = writer.save("Queued", rows(), Language::En).recv().unwrap().unwrap();
        assert!(writer.set_default(id, Language::En).recv().unwrap().unwrap());
        assert!(writer.rename(id, "Renamed").recv().unwrap().unwrap());
        assert!(!writer.delete(LayoutId(99)).recv().unwrap().unwrap());

        let record = repository.default_record(Language::En).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.name, "Renamed");
    }

    #[test]
    fn test_errors_arrive_on_receipt() {
        let repository = Arc::new(LayoutRepository::in_memory());
        let writer = LayoutWriter::spawn(repository).unwrap();
        assert!(writer.save("", rows(), Language::En).recv().unwrap().is_err());
    }

    #[test]
    fn test_drop_finishes_queued_commands() {
        let repository = Arc::new(LayoutRepository::in_memory());
        let writer = LayoutWriter::spawn(Arc::clone(&repository)).unwrap();

        for i in 0..10 {
            // Receipts deliberately dropped.
            let _ = writer.save(format!("Layout {i}"), rows(), Language::En);
        }
        drop(writer);

        assert_eq!(repository.layouts_by_language(Language::En).unwrap().len(), 10);
    }

    #[test]
    fn test_duplicate_submissions_are_kept() {
        let repository = Arc::new(LayoutRepository::in_memory());
        let writer = LayoutWriter::spawn(Arc::clone(&repository)).unwrap();

        let first = writer.save("Twice", rows(), Language::Ar);
        let second = writer.save("Twice", rows(), Language::Ar);
        writer.shutdown();

        assert_ne!(first.recv().unwrap().unwrap(), second.recv().unwrap().unwrap());
        assert_eq!(repository.layouts_by_language(Language::Ar).unwrap().len(), 2);
    }
}
