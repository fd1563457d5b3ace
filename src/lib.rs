//! Layer visibility and styling orchestration for scroll-driven story maps.
//!
//! As the reader scrolls between narrative chapters, each chapter declares
//! which map layers it wants visible and at what opacity. This crate owns the
//! declarative layer catalog, materializes layers lazily on a render surface,
//! diffs the active set on every chapter transition (fading out layers no
//! longer wanted before fading in the newly wanted ones), and recolors the
//! basin fill layer from externally loaded precondition data.
//!
//! The mapping engine itself sits behind the narrow [`RenderSurface`] trait;
//! this crate only decides *which* properties are requested and in what
//! order. [`MemorySurface`] implements the trait headlessly for tests and
//! tooling.

pub mod catalog;
pub mod chapter;
pub mod manager;
pub mod precondition;
pub mod surface;

pub use catalog::{LayerCatalog, LayerDefinition, LayerKind, PaintSpec, SourceSpec};
pub use chapter::{ChapterConfig, ChapterLayer};
pub use manager::LayerManager;
pub use precondition::{
    FetchResult, PreconditionMode, PreconditionSnapshot, SnapshotCell, SnapshotFetcher,
};
pub use surface::{MemorySurface, PaintCall, RenderSurface, SurfaceLayer, FADE_DURATION_MS};
