use crate::error::Result;
use crate::phone::bridge::{DeviceBridge, RemoveOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub removed: Vec<String>,
    /// Stale references: already gone from the phone.
    pub missing: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl DeleteReport {
    pub fn failed_paths(&self) -> Vec<String> {
        self.failed.iter().map(|(path, _)| path.clone()).collect()
    }
}

/// Trait for removing files from the phone.
pub trait Deleter {
    /// Remove each path independently; one failure never stops the rest.
    async fn delete(&self, paths: &[String]) -> Result<DeleteReport>;
}

pub struct BridgeDeleter<'a, B> {
    bridge: &'a B,
}

impl<'a, B: DeviceBridge> BridgeDeleter<'a, B> {
    pub fn new(bridge: &'a B) -> Self {
        Self { bridge }
    }
}

impl<B: DeviceBridge> Deleter for BridgeDeleter<'_, B> {
    async fn delete(&self, paths: &[String]) -> Result<DeleteReport> {
        let mut report = DeleteReport::default();
        for path in paths {
            match self.bridge.remove(path).await {
                Ok(RemoveOutcome::Removed) => {
                    println!("Deleted: {path}");
                    report.removed.push(path.clone());
                }
                Ok(RemoveOutcome::Missing) => {
                    log::warn!("stale reference, not on phone: {path}");
                    println!("Already gone: {path}");
                    report.missing.push(path.clone());
                }
                Ok(RemoveOutcome::Failed(reason)) => {
                    eprintln!("Failed to delete {path}: {reason}");
                    report.failed.push((path.clone(), reason));
                }
                Err(err) => {
                    eprintln!("Failed to delete {path}: {err}");
                    report.failed.push((path.clone(), err.to_string()));
                }
            }
        }
        Ok(report)
    }
}
