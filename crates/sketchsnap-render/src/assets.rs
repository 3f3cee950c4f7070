//! Icon image loading.
//!
//! Loading is load-then-notify: a source is asked for an icon and reports
//! completion by posting an [`AssetEvent`]. Nothing becomes visible until
//! the store drains those events in [`AssetStore::pump`], so a frame never
//! waits on a load. It draws what is ready and defers the rest.

use image::RgbaImage;
use sketchsnap_core::icons::IconRef;
use sketchsnap_core::paint::DrawInstruction;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

/// Asset loading errors.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Completion notice for a requested icon.
#[derive(Debug)]
pub enum AssetEvent {
    /// Raw encoded bytes are available.
    Loaded { icon: IconRef, bytes: Vec<u8> },
    /// The source could not produce the bytes.
    Failed { icon: IconRef, error: String },
}

/// Handle a source uses to report a finished load.
#[derive(Debug, Clone)]
pub struct AssetNotifier {
    sender: Sender<AssetEvent>,
}

impl AssetNotifier {
    pub fn loaded(&self, icon: IconRef, bytes: Vec<u8>) {
        self.post(AssetEvent::Loaded { icon, bytes });
    }

    pub fn failed(&self, icon: IconRef, error: impl ToString) {
        self.post(AssetEvent::Failed {
            icon,
            error: error.to_string(),
        });
    }

    fn post(&self, event: AssetEvent) {
        if self.sender.send(event).is_err() {
            log::debug!("asset store dropped before load finished");
        }
    }
}

/// Something that can fetch icon bytes.
pub trait AssetSource {
    /// Begin loading `icon`. The outcome is reported through `notifier`,
    /// never returned directly.
    fn load(&self, icon: &IconRef, notifier: AssetNotifier);
}

/// Loads icons from files below a root directory.
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, icon: &IconRef) -> Result<Vec<u8>, AssetError> {
        Ok(std::fs::read(self.root.join(icon.as_str()))?)
    }
}

impl AssetSource for FileAssetSource {
    fn load(&self, icon: &IconRef, notifier: AssetNotifier) {
        match self.read(icon) {
            Ok(bytes) => notifier.loaded(icon.clone(), bytes),
            Err(e) => notifier.failed(icon.clone(), e),
        }
    }
}

/// Load state of one icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    /// Never requested.
    Unknown,
    Pending,
    Ready,
    Failed,
}

#[derive(Debug)]
enum AssetEntry {
    Pending,
    Ready(RgbaImage),
    Failed(String),
}

/// Decoded icon images, keyed by reference.
#[derive(Debug)]
pub struct AssetStore {
    entries: HashMap<IconRef, AssetEntry>,
    sender: Sender<AssetEvent>,
    receiver: Receiver<AssetEvent>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            sender,
            receiver,
        }
    }

    pub fn notifier(&self) -> AssetNotifier {
        AssetNotifier {
            sender: self.sender.clone(),
        }
    }

    /// Ask `source` for `icon` unless it was requested before.
    pub fn request(&mut self, icon: &IconRef, source: &dyn AssetSource) -> AssetStatus {
        if !self.entries.contains_key(icon) {
            self.entries.insert(icon.clone(), AssetEntry::Pending);
            source.load(icon, self.notifier());
        }
        self.status(icon)
    }

    /// Request every image a paint list refers to.
    pub fn request_all(&mut self, instructions: &[DrawInstruction], source: &dyn AssetSource) {
        for instruction in instructions {
            if let DrawInstruction::Image(image) = instruction {
                self.request(&image.asset, source);
            }
        }
    }

    /// Apply completion events posted since the last call and return the
    /// icons that became ready.
    pub fn pump(&mut self) -> Vec<IconRef> {
        let mut ready = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            match event {
                AssetEvent::Loaded { icon, bytes } => match decode(&bytes) {
                    Ok(image) => {
                        log::debug!("decoded {icon} ({}x{})", image.width(), image.height());
                        self.entries.insert(icon.clone(), AssetEntry::Ready(image));
                        ready.push(icon);
                    }
                    Err(e) => {
                        log::warn!("failed to decode {icon}: {e}");
                        self.entries.insert(icon, AssetEntry::Failed(e.to_string()));
                    }
                },
                AssetEvent::Failed { icon, error } => {
                    log::warn!("failed to load {icon}: {error}");
                    self.entries.insert(icon, AssetEntry::Failed(error));
                }
            }
        }
        ready
    }

    pub fn status(&self, icon: &IconRef) -> AssetStatus {
        match self.entries.get(icon) {
            None => AssetStatus::Unknown,
            Some(AssetEntry::Pending) => AssetStatus::Pending,
            Some(AssetEntry::Ready(_)) => AssetStatus::Ready,
            Some(AssetEntry::Failed(_)) => AssetStatus::Failed,
        }
    }

    /// Decoded pixels, once ready.
    pub fn image(&self, icon: &IconRef) -> Option<&RgbaImage> {
        match self.entries.get(icon) {
            Some(AssetEntry::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Why a load failed, if it did.
    pub fn failure(&self, icon: &IconRef) -> Option<&str> {
        match self.entries.get(icon) {
            Some(AssetEntry::Failed(reason)) => Some(reason),
            _ => None,
        }
    }

    /// True while any requested icon is still loading.
    pub fn has_pending(&self) -> bool {
        self.entries.values().any(|e| matches!(e, AssetEntry::Pending))
    }
}

fn decode(bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::encode_png;

    fn red_png() -> Vec<u8> {
        encode_png(&[255, 0, 0, 255].repeat(4), 2, 2).unwrap()
    }

    /// Records requests without answering them.
    struct Silent;

    impl AssetSource for Silent {
        fn load(&self, _icon: &IconRef, _notifier: AssetNotifier) {}
    }

    #[test]
    fn test_pending_until_pumped() {
        let mut store = AssetStore::new();
        let icon = IconRef::new("red.png");
        assert_eq!(store.request(&icon, &Silent), AssetStatus::Pending);
        assert!(store.has_pending());

        store.notifier().loaded(icon.clone(), red_png());
        assert_eq!(store.status(&icon), AssetStatus::Pending);

        assert_eq!(store.pump(), vec![icon.clone()]);
        assert_eq!(store.status(&icon), AssetStatus::Ready);
        assert_eq!(store.image(&icon).unwrap().dimensions(), (2, 2));
        assert!(!store.has_pending());
    }

    #[test]
    fn test_bad_bytes_fail() {
        let mut store = AssetStore::new();
        let icon = IconRef::new("junk.png");
        store.request(&icon, &Silent);
        store.notifier().loaded(icon.clone(), vec![1, 2, 3]);

        assert!(store.pump().is_empty());
        assert_eq!(store.status(&icon), AssetStatus::Failed);
        assert!(store.failure(&icon).is_some());
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("icons")).unwrap();
        std::fs::write(dir.path().join("icons/red.png"), red_png()).unwrap();

        let source = FileAssetSource::new(dir.path());
        let mut store = AssetStore::new();
        let found = IconRef::new("icons/red.png");
        let missing = IconRef::new("icons/missing.png");
        store.request(&found, &source);
        store.request(&missing, &source);

        assert_eq!(store.pump(), vec![found.clone()]);
        assert_eq!(store.status(&found), AssetStatus::Ready);
        assert_eq!(store.status(&missing), AssetStatus::Failed);
    }

    #[test]
    fn test_request_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("red.png"), red_png()).unwrap();
        let source = FileAssetSource::new(dir.path());
        let mut store = AssetStore::new();
        let icon = IconRef::new("red.png");

        store.request(&icon, &source);
        store.request(&icon, &source);
        assert_eq!(store.pump().len(), 1);
        assert_eq!(store.request(&icon, &source), AssetStatus::Ready);
    }
}
