//! Capabilities supplied by the caller.
//!
//! The engine never loads a vision model or talks to storage on its own.
//! Callers hand it a [`VisualDescriber`] to annotate pages and a
//! [`SectionSink`] to receive finished sections; heavyweight implementations
//! live behind a [`ManagedResource`] with an explicit lifecycle.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Page, Section};

/// Produces a free-text description of a page (charts, photos, scans).
///
/// Descriptions are stored as annotations and never change segmentation.
pub trait VisualDescriber: Send + Sync {
    /// Describe `page`. An empty description is discarded.
    fn describe(&self, page: &Page) -> Result<String>;
}

/// Receives the sections of a document once segmentation is done.
///
/// Implementations own their idempotency: delivering the same document
/// twice must not duplicate it downstream.
pub trait SectionSink: Send + Sync {
    /// Accept the ordered sections of `document_id`.
    fn accept(&self, document_id: &str, sections: &[Section]) -> Result<()>;
}

/// Page descriptions keyed by page number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageAnnotations {
    pages: BTreeMap<u32, String>,
}

impl PageAnnotations {
    /// Create an empty set of annotations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the description of `page`, replacing any previous one.
    pub fn insert(&mut self, page: u32, description: impl Into<String>) {
        self.pages.insert(page, description.into());
    }

    /// Description of `page`, if any.
    pub fn get(&self, page: u32) -> Option<&str> {
        self.pages.get(&page).map(String::as_str)
    }

    /// Whether `page` has a description.
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    /// Number of annotated pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page is annotated.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Annotations in page order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.pages.iter().map(|(page, text)| (*page, text.as_str()))
    }
}

/// A process-wide resource with explicit construction and release.
///
/// `init` builds the value once; later calls return the same instance.
/// `shutdown` drops the shared handle so the value is released once the
/// last in-flight user finishes with it.
pub struct ManagedResource<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> ManagedResource<T> {
    /// Create an uninitialized resource.
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Construct the resource with `build` unless it already exists.
    pub fn init<F>(&self, build: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            return Ok(Arc::clone(existing));
        }

        let resource = Arc::new(build()?);
        *slot = Some(Arc::clone(&resource));
        log::debug!("managed resource initialized");
        Ok(resource)
    }

    /// The resource, if it has been initialized and not shut down.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
    }

    /// Whether the resource is currently available.
    pub fn is_initialized(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Release the resource. Returns whether anything was released.
    pub fn shutdown(&self) -> bool {
        let released = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if released {
            log::debug!("managed resource released");
        }
        released
    }
}

impl<T> Default for ManagedResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ManagedResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedResource")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl<D: VisualDescriber> VisualDescriber for ManagedResource<D> {
    fn describe(&self, page: &Page) -> Result<String> {
        let describer = self
            .get()
            .ok_or_else(|| Error::Collaborator("visual describer is not initialized".into()))?;
        describer.describe(page)
    }
}

/// An in-memory [`SectionSink`] keyed by document id.
///
/// Delivering a document again replaces its previous sections.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<BTreeMap<String, Vec<Section>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sections delivered for `document_id`.
    pub fn sections(&self, document_id: &str) -> Option<Vec<Section>> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(document_id)
            .cloned()
    }

    /// Number of distinct documents delivered.
    pub fn document_count(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl SectionSink for MemorySink {
    fn accept(&self, document_id: &str, sections: &[Section]) -> Result<()> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document_id.to_string(), sections.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PageNumberDescriber;

    impl VisualDescriber for PageNumberDescriber {
        fn describe(&self, page: &Page) -> Result<String> {
            Ok(format!("page {}", page.number))
        }
    }

    #[test]
    fn test_managed_resource_lifecycle() {
        let resource: ManagedResource<PageNumberDescriber> = ManagedResource::new();
        assert!(!resource.is_initialized());
        assert!(resource.get().is_none());

        let builds = AtomicUsize::new(0);
        let first = resource
            .init(|| {
                builds.fetch_add(1, Ordering::SeqCst);
                Ok(PageNumberDescriber)
            })
            .unwrap();
        let second = resource
            .init(|| {
                builds.fetch_add(1, Ordering::SeqCst);
                Ok(PageNumberDescriber)
            })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);

        assert_eq!(resource.describe(&Page::letter(7)).unwrap(), "page 7");

        assert!(resource.shutdown());
        assert!(!resource.shutdown());
        assert!(resource.get().is_none());
        assert!(matches!(
            resource.describe(&Page::letter(1)),
            Err(Error::Collaborator(_))
        ));
    }

    #[test]
    fn test_failed_init_leaves_resource_empty() {
        let resource: ManagedResource<PageNumberDescriber> = ManagedResource::new();
        let result = resource.init(|| Err(Error::Collaborator("no weights".into())));
        assert!(result.is_err());
        assert!(!resource.is_initialized());
    }

    #[test]
    fn test_page_annotations() {
        let mut annotations = PageAnnotations::new();
        annotations.insert(3, "bar chart");
        annotations.insert(1, "cover photo");
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations.get(3), Some("bar chart"));
        let pages: Vec<u32> = annotations.iter().map(|(p, _)| p).collect();
        assert_eq!(pages, vec![1, 3]);

        let json = serde_json::to_string(&annotations).unwrap();
        assert_eq!(json, r#"{"1":"cover photo","3":"bar chart"}"#);
    }

    #[test]
    fn test_memory_sink_is_idempotent_per_document() {
        let sink = MemorySink::new();
        let sections = vec![Section::new("1. OBJETO", Category::Tecnico, "obra")];
        sink.accept("doc-1", &sections).unwrap();
        sink.accept("doc-1", &sections).unwrap();
        assert_eq!(sink.document_count(), 1);
        assert_eq!(sink.sections("doc-1").map(|s| s.len()), Some(1));
    }
}
