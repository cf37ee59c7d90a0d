//! Editor session: one document, its interaction controller, and storage.
//!
//! DESIGN
//! ======
//! `EditorSession` is the object a host creates once and hands to every
//! screen. It owns the [`DocStore`] and [`InteractionController`] and routes
//! pointer events between them, so hosts never juggle the two borrows
//! themselves. Storage goes through a shared [`BlobStore`]: the
//! [`DesignGateway`] for design blobs and [`RecentDesigns`] for the catalog.
//!
//! Saves capture the document synchronously before the first `.await`, so
//! edits made while a save is in flight are not part of that save.
//!
//! ERROR HANDLING
//! ==============
//! A stored design that does not parse resets the document to an empty one
//! and returns `Err(PersistenceError::Corrupt)`. Storage failures leave the
//! document untouched.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::doc::DocStore;
use crate::element::{Element, ElementBody, ElementId, ElementPatch};
use crate::engine::{Action, InteractionController};
use crate::geometry::{Point, clamp_position};
use crate::input::Modifiers;
use crate::services::persistence::{BlobStore, DesignGateway, FileBlobStore, MemoryBlobStore, PersistenceError};
use crate::services::recent::{RecentDesign, RecentDesignPatch, RecentDesigns};

pub struct EditorSession<B> {
    config: EngineConfig,
    doc: DocStore,
    controller: InteractionController,
    gateway: DesignGateway<B>,
    recent: RecentDesigns<B>,
}

impl EditorSession<MemoryBlobStore> {
    /// A session whose designs live only in process memory.
    #[must_use]
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryBlobStore::new()))
    }
}

impl EditorSession<FileBlobStore> {
    /// A session saving to the directory named by `config.store_dir`, or
    /// `None` when no directory is configured.
    #[must_use]
    pub fn on_disk(config: EngineConfig) -> Option<Self> {
        let store = FileBlobStore::from_config(&config)?;
        Some(Self::with_store(config, Arc::new(store)))
    }
}

impl<B: BlobStore> EditorSession<B> {
    #[must_use]
    pub fn with_store(config: EngineConfig, store: Arc<B>) -> Self {
        Self {
            doc: DocStore::with_config(&config),
            controller: InteractionController::new(&config),
            gateway: DesignGateway::new(Arc::clone(&store)),
            recent: RecentDesigns::new(store),
            config,
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn doc(&self) -> &DocStore {
        &self.doc
    }

    /// Direct access for toolbar commands (undo, reorder, delete, colors).
    pub fn doc_mut(&mut self) -> &mut DocStore {
        &mut self.doc
    }

    #[must_use]
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    #[must_use]
    pub fn gateway(&self) -> &DesignGateway<B> {
        &self.gateway
    }

    #[must_use]
    pub fn recent(&self) -> &RecentDesigns<B> {
        &self.recent
    }

    pub fn recent_mut(&mut self) -> &mut RecentDesigns<B> {
        &mut self.recent
    }

    // --- Renderer interface ---

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.doc.elements()
    }

    /// Geometry of the element under an active drag or resize.
    #[must_use]
    pub fn preview(&self) -> Option<(ElementId, crate::geometry::Rect)> {
        self.controller.preview()
    }

    /// Elements in paint order with the in-flight gesture geometry applied.
    #[must_use]
    pub fn render_list(&self) -> Vec<Element> {
        let preview = self.controller.preview();
        self.doc
            .elements()
            .iter()
            .map(|el| {
                let mut el = el.clone();
                if let Some((id, bounds)) = preview {
                    if id == el.id {
                        el.set_bounds(bounds);
                    }
                }
                el
            })
            .collect()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.doc.subscribe()
    }

    // --- Pointer events ---

    pub fn pointer_down(&mut self, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.controller.on_pointer_down(&mut self.doc, pt, modifiers)
    }

    pub fn pointer_move(&mut self, pt: Point) -> Vec<Action> {
        self.controller.on_pointer_move(&self.doc, pt)
    }

    pub fn pointer_up(&mut self, pt: Point) -> Vec<Action> {
        self.controller.on_pointer_up(&mut self.doc, pt)
    }

    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        self.controller.cancel()
    }

    // --- Content helpers ---

    /// Add an image element at the default insertion spot and select it.
    pub fn insert_image(&mut self, uri: impl Into<String>) -> ElementId {
        let mut element = Element::default_image(uri);
        element.set_bounds(clamp_position(element.bounds(), self.config.canvas));
        self.doc.add_element(element)
    }

    /// Cover the first selected shape with an image of the same geometry.
    ///
    /// Returns `None` when nothing is selected or the first selected element
    /// is not a shape that can hold an image.
    pub fn insert_image_over_selection(&mut self, uri: impl Into<String>) -> Option<ElementId> {
        let target = self.doc.selected_elements().first().copied()?;
        if !target.shape_kind().is_some_and(|kind| kind.accepts_image()) {
            return None;
        }
        let bounds = target.bounds();
        Some(self.doc.add_element(Element::image(bounds, uri)))
    }

    /// Paint `uri` inside the shape with `id`. Returns `false` for unknown
    /// ids and for elements that cannot hold an image.
    pub fn set_shape_background_image(&mut self, id: &ElementId, uri: impl Into<String>) -> bool {
        let accepts = self.doc.element(id).and_then(Element::shape_kind).is_some_and(|kind| kind.accepts_image());
        if !accepts {
            return false;
        }
        let patch = ElementPatch { background_image: Some(uri.into()), ..ElementPatch::default() };
        self.doc.update_element(id, &patch)
    }

    /// Replace the content of the text element with `id`.
    pub fn set_text(&mut self, id: &ElementId, content: impl Into<String>) -> bool {
        if !self.doc.element(id).is_some_and(Element::is_text) {
            return false;
        }
        let patch = ElementPatch { content: Some(content.into()), ..ElementPatch::default() };
        self.doc.update_element(id, &patch)
    }

    /// Abandon any gesture and start an empty design.
    pub fn new_design(&mut self) {
        self.controller.cancel();
        self.doc.clear();
        self.doc.clear_design_name();
    }

    // --- Persistence ---

    /// Save the document under `design_id` (the anonymous slot when `None`)
    /// and, for named designs, record it in the recent catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if encoding or either store write fails.
    pub async fn save(&mut self, design_id: Option<&str>) -> Result<String, PersistenceError> {
        let design = self.doc.to_saved();
        let label = self.doc.design_name().to_owned();
        let thumbnail = first_image(self.doc.elements());

        let key = self.gateway.save(design_id, &design).await?;

        if let Some(id) = design_id.filter(|id| !id.is_empty()) {
            if self.recent.get(id).is_some() {
                let patch = RecentDesignPatch { label: Some(label), image: thumbnail, ..RecentDesignPatch::default() };
                self.recent.update(id, patch).await?;
            } else {
                let mut entry = RecentDesign::new(id, label);
                entry.image = thumbnail.unwrap_or_default();
                self.recent.add(entry).await?;
            }
        }
        Ok(key)
    }

    /// Replace the document with the design stored under `design_id`.
    ///
    /// Returns `Ok(false)` and leaves the document alone when nothing is
    /// stored. The design name is taken from the recent catalog when the
    /// design is listed there.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] after resetting the document
    /// when the stored design does not parse, and [`PersistenceError::Io`]
    /// when the store read fails.
    pub async fn load(&mut self, design_id: Option<&str>) -> Result<bool, PersistenceError> {
        let loaded = match self.gateway.load(design_id).await {
            Ok(loaded) => loaded,
            Err(e @ PersistenceError::Corrupt(_)) => {
                warn!(error = %e, "resetting document after corrupt load");
                self.new_design();
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        let Some(design) = loaded else {
            return Ok(false);
        };

        self.controller.cancel();
        self.doc.load_design(design);
        match design_id.and_then(|id| self.recent.get(id)) {
            Some(entry) => self.doc.set_design_name(entry.label.clone()),
            None => self.doc.clear_design_name(),
        }
        info!(design_id = design_id.unwrap_or_default(), elements = self.doc.len(), "session loaded design");
        Ok(true)
    }

    /// Remove the design stored under `design_id` and its catalog entry.
    /// Returns whether a stored design existed.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if either store fails.
    pub async fn delete(&mut self, design_id: &str) -> Result<bool, PersistenceError> {
        let removed = self.gateway.delete(design_id).await?;
        self.recent.delete(design_id).await?;
        Ok(removed)
    }
}

/// URI of the first image element, used as the catalog preview.
fn first_image(elements: &[Element]) -> Option<String> {
    elements.iter().find_map(|el| match &el.body {
        ElementBody::Image(image) => Some(image.source_ref.clone()),
        _ => None,
    })
}
