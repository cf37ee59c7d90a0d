//! Design-document engine for a mobile design editor.
//!
//! This crate owns everything about a design that is not drawing: the ordered
//! element list, the selection, bounded undo/redo history, the pointer
//! drag/resize state machine, and saving/loading designs through a key-value
//! blob store. The host UI is responsible only for wiring touch events into
//! the [`engine::InteractionController`] and painting what
//! [`doc::DocStore::elements`] returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | One editing session: store, controller, and persistence wired together |
//! | [`doc`] | In-memory document store and its mutation operations |
//! | [`element`] | Element types (shapes, text, images) and sparse patches |
//! | [`selection`] | Ordered set of selected element ids |
//! | [`history`] | Bounded undo/redo snapshot stacks |
//! | [`engine`] | Pointer gesture controller and the [`engine::Action`]s it emits |
//! | [`input`] | Tools, pointer modifiers, and gesture states |
//! | [`hit`] | Hit-testing against element bodies and resize handles |
//! | [`geometry`] | Points, rectangles, clamping, and resize-handle math |
//! | [`services`] | Blob stores, design gateway, recent-designs catalog |
//! | [`config`] | Engine tuning loaded from the environment |
//! | [`consts`] | Shared defaults (minimum size, history limit, colors) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod element;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod history;
pub mod input;
pub mod selection;
pub mod services;
pub mod session;

pub use config::EngineConfig;
pub use doc::DocStore;
pub use element::{Element, ElementBody, ElementId, ElementPatch, ShapeKind};
pub use engine::{Action, InteractionController};
pub use geometry::{CanvasBounds, Point, Rect, ResizeHandle};
pub use input::Tool;
pub use services::persistence::{
    BlobStore, DesignGateway, FileBlobStore, MemoryBlobStore, PersistenceError, SavedDesign,
};
pub use services::recent::{RecentDesign, RecentDesigns};
pub use session::EditorSession;
