//! Layer lifecycle and chapter visibility orchestration.
//!
//! [`LayerManager`] owns which layers are defined (catalog), which are
//! materialized on the render surface (registration set), and which the
//! current narrative chapter wants visible (active set). One manager is
//! constructed per map instance; nothing here is global.
//!
//! Every failure path degrades to "nothing visibly changes" plus a log line.
//! Unknown layer ids never panic and never touch the surface.

use std::collections::BTreeSet;

use geojson::FeatureCollection;
use serde_json::{json, Value};

use crate::catalog::{LayerCatalog, LayerDefinition, LayerKind, BASINS_FILL, CONSEQUENCE_MARKERS};
use crate::chapter::ChapterConfig;
use crate::precondition::{
    bucket_color, PreconditionMode, SnapshotCell, SnapshotFetcher, BASELINE_COLOR,
};
use crate::surface::{RenderSurface, SurfaceLayer};

/// Id of the surface source a layer materializes for itself.
fn own_source_id(layer_id: &str) -> String {
    format!("source-{}", layer_id)
}

/// Per-map orchestrator for layer registration, visibility, and styling.
pub struct LayerManager {
    catalog: LayerCatalog,
    /// Layers materialized on the surface (stubs included). Monotonic except
    /// for explicit removal.
    registered: BTreeSet<String>,
    /// Layers targeted by a nonzero-opacity request for the current chapter.
    active: BTreeSet<String>,
    snapshot: SnapshotCell,
}

impl LayerManager {
    pub fn new(catalog: LayerCatalog) -> Self {
        Self {
            catalog,
            registered: BTreeSet::new(),
            active: BTreeSet::new(),
            snapshot: SnapshotCell::new(),
        }
    }

    /// Manager preloaded with the built-in flood narrative table.
    pub fn flood_story() -> Self {
        Self::new(LayerCatalog::flood_story())
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    pub fn is_registered(&self, layer_id: &str) -> bool {
        self.registered.contains(layer_id)
    }

    pub fn is_active(&self, layer_id: &str) -> bool {
        self.active.contains(layer_id)
    }

    pub fn active_layers(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Registers a layer on the surface if it hasn't been added yet.
    ///
    /// Idempotent; call sites invoke it speculatively before every visibility
    /// change. Unknown ids log a warning and leave all state untouched. Stub
    /// definitions register without touching the surface. Aliased definitions
    /// ensure their referenced layer first and reuse its source.
    pub fn ensure<S: RenderSurface>(&mut self, surface: &mut S, layer_id: &str) {
        let mut visited = BTreeSet::new();
        self.ensure_inner(surface, layer_id, &mut visited);
    }

    fn ensure_inner<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        layer_id: &str,
        visited: &mut BTreeSet<String>,
    ) -> bool {
        if self.registered.contains(layer_id) {
            return true;
        }
        if !visited.insert(layer_id.to_string()) {
            log::error!("Source-ref cycle through layer '{}', aborting", layer_id);
            return false;
        }

        let Some(def) = self.catalog.lookup(layer_id) else {
            log::warn!("Unknown layer: {}", layer_id);
            return false;
        };
        let def = def.clone();

        match def {
            LayerDefinition::Stub => {
                log::debug!("Stub: {} (data not yet available)", layer_id);
                self.registered.insert(layer_id.to_string());
            }
            LayerDefinition::Static {
                kind,
                source,
                source_layer,
                paint,
                filter,
            } => {
                let source_id = own_source_id(layer_id);
                if !surface.has_source(&source_id) {
                    surface.add_source(&source_id, &source);
                }
                if !surface.has_layer(layer_id) {
                    surface.add_layer(SurfaceLayer {
                        id: layer_id.to_string(),
                        kind,
                        source_id,
                        source_layer,
                        // The paint map is cloned per layer; opacity updates
                        // mutate it independently of the catalog entry.
                        paint,
                        filter,
                    });
                }
                self.registered.insert(layer_id.to_string());
            }
            LayerDefinition::Aliased {
                kind,
                source_ref,
                source_layer,
                paint,
                filter,
            } => {
                if !self.ensure_inner(surface, &source_ref, visited) {
                    log::warn!(
                        "Skipping layer '{}': source ref '{}' unavailable",
                        layer_id,
                        source_ref
                    );
                    return false;
                }
                let source_id = own_source_id(&source_ref);
                if !surface.has_source(&source_id) {
                    log::warn!(
                        "Skipping layer '{}': source ref '{}' has no materialized source",
                        layer_id,
                        source_ref
                    );
                    return false;
                }
                if !surface.has_layer(layer_id) {
                    surface.add_layer(SurfaceLayer {
                        id: layer_id.to_string(),
                        kind,
                        source_id,
                        source_layer,
                        paint,
                        filter,
                    });
                }
                self.registered.insert(layer_id.to_string());
            }
        }
        true
    }

    /// Removes a layer and its own source from the surface.
    ///
    /// A source the layer only referenced through an alias is left in place
    /// for sibling layers. Safe to call on unregistered ids.
    pub fn remove<S: RenderSurface>(&mut self, surface: &mut S, layer_id: &str) {
        if surface.has_layer(layer_id) {
            surface.remove_layer(layer_id);
        }
        let source_id = own_source_id(layer_id);
        if surface.has_source(&source_id) {
            surface.remove_source(&source_id);
        }
        self.registered.remove(layer_id);
        self.active.remove(layer_id);
    }

    /// Replaces the geometry payload of a dynamic layer's source.
    ///
    /// No-op if the source hasn't been materialized yet; data for such layers
    /// arrives asynchronously after an initial empty-geometry registration.
    pub fn update_source_data<S: RenderSurface>(
        &self,
        surface: &mut S,
        layer_id: &str,
        data: &FeatureCollection,
    ) {
        let source_id = own_source_id(layer_id);
        if surface.has_source(&source_id) {
            surface.set_source_data(&source_id, data);
        }
    }

    /// Upserts a catalog entry and registers it, for layers computed entirely
    /// at runtime.
    pub fn add_dynamic_layer<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        layer_id: &str,
        def: LayerDefinition,
    ) {
        self.catalog.upsert(layer_id, def);
        self.ensure(surface, layer_id);
    }

    /// Requests a layer's opacity; the surface tweens to the target value.
    ///
    /// No-op for unknown ids, stubs, and layers not on the surface. Circle
    /// layers also set `circle-stroke-opacity` so fill and stroke fade in
    /// lockstep.
    pub fn set_opacity<S: RenderSurface>(&self, surface: &mut S, layer_id: &str, opacity: f64) {
        let Some(def) = self.catalog.lookup(layer_id) else {
            return;
        };
        let Some(kind) = def.kind() else {
            return;
        };
        if !surface.has_layer(layer_id) {
            return;
        }

        surface.set_paint_property(layer_id, kind.opacity_property(), json!(opacity));
        if kind == LayerKind::Circle {
            surface.set_paint_property(layer_id, "circle-stroke-opacity", json!(opacity));
        }
    }

    /// Shows a chapter's layers, fading out everything else.
    ///
    /// Fade-outs are issued before fade-ins, so a layer present in both the
    /// outgoing and incoming sets receives exactly one opacity request (its
    /// new target) and never flickers.
    pub fn show_chapter_layers<S: RenderSurface>(&mut self, surface: &mut S, config: &ChapterConfig) {
        let target_ids: BTreeSet<&str> = config.layer_ids().collect();

        let outgoing: Vec<String> = self
            .active
            .iter()
            .filter(|id| !target_ids.contains(id.as_str()))
            .cloned()
            .collect();
        for layer_id in outgoing {
            self.set_opacity(surface, &layer_id, 0.0);
            self.active.remove(&layer_id);
        }

        for layer in &config.layers {
            self.ensure(surface, &layer.id);
            self.set_opacity(surface, &layer.id, layer.opacity);
            self.active.insert(layer.id.clone());
        }
    }

    /// Fades out every active layer and clears the active set. Used on
    /// narrative reset and scroll-out.
    pub fn hide_all_layers<S: RenderSurface>(&mut self, surface: &mut S) {
        let active: Vec<String> = self.active.iter().cloned().collect();
        for layer_id in active {
            self.set_opacity(surface, &layer_id, 0.0);
        }
        self.active.clear();
    }

    /// Filters consequence markers to one chapter's events, or shows all.
    ///
    /// Replaces any prior filter wholesale.
    pub fn filter_consequences_by_chapter<S: RenderSurface>(
        &self,
        surface: &mut S,
        chapter: Option<i64>,
    ) {
        if !surface.has_layer(CONSEQUENCE_MARKERS) {
            return;
        }
        match chapter {
            None => surface.set_filter(CONSEQUENCE_MARKERS, None),
            Some(number) => surface.set_filter(
                CONSEQUENCE_MARKERS,
                Some(json!(["==", ["get", "chapter"], number])),
            ),
        }
    }

    /// Recolors the basin fill layer from the precondition snapshot.
    ///
    /// `None` resets to the flat baseline color without any data dependency.
    /// Otherwise the snapshot is resolved through the single-flight cache and
    /// a categorical `match` expression over the basin name is applied in one
    /// surface call. Fetch failures log and leave the current paint unchanged;
    /// a mode absent from the snapshot is a silent no-op.
    pub async fn color_basins_by_precondition<S: RenderSurface>(
        &self,
        surface: &mut S,
        fetcher: &dyn SnapshotFetcher,
        mode: Option<PreconditionMode>,
    ) {
        if !surface.has_layer(BASINS_FILL) {
            return;
        }

        let Some(mode) = mode else {
            surface.set_paint_property(BASINS_FILL, "fill-color", json!(BASELINE_COLOR));
            return;
        };

        let snapshot = match self.snapshot.get_or_fetch(fetcher).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Failed to load precondition basins: {}", e);
                return;
            }
        };

        let Some(mode_snapshot) = snapshot.mode(mode) else {
            return;
        };

        let mut expr = vec![json!("match"), json!(["get", "river"])];
        for (basin, value) in &mode_snapshot.basins {
            expr.push(json!(basin));
            expr.push(json!(bucket_color(*value)));
        }
        expr.push(json!(BASELINE_COLOR));

        surface.set_paint_property(BASINS_FILL, "fill-color", Value::Array(expr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceSpec;
    use crate::chapter::ChapterLayer;
    use crate::precondition::{FetchResult, PreconditionSnapshot};
    use crate::surface::MemorySurface;
    use futures_util::future::LocalBoxFuture;
    use futures_util::FutureExt;
    use pollster::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct StubFetcher {
        calls: Rc<Cell<usize>>,
        results: RefCell<Vec<FetchResult>>,
    }

    impl StubFetcher {
        fn new(results: Vec<FetchResult>) -> Self {
            Self {
                calls: Rc::new(Cell::new(0)),
                results: RefCell::new(results),
            }
        }

        fn with_snapshot() -> Self {
            Self::new(vec![Ok(sample_snapshot()), Ok(sample_snapshot())])
        }
    }

    impl SnapshotFetcher for StubFetcher {
        fn fetch(&self) -> LocalBoxFuture<'static, FetchResult> {
            self.calls.set(self.calls.get() + 1);
            let result = self.results.borrow_mut().remove(0);
            async move { result }.boxed_local()
        }
    }

    fn sample_snapshot() -> PreconditionSnapshot {
        PreconditionSnapshot::from_json(
            r#"{"peak": {"basins": {"Tejo": 0.15, "Douro": 0.45, "Mondego": 0.95}}}"#,
        )
        .unwrap()
    }

    fn chapter(layers: &[(&str, f64)]) -> ChapterConfig {
        ChapterConfig::new(
            layers
                .iter()
                .map(|(id, opacity)| ChapterLayer::new(*id, *opacity))
                .collect(),
        )
    }

    fn opacity_requests(surface: &MemorySurface, layer_id: &str) -> Vec<Value> {
        surface
            .paint_log()
            .iter()
            .filter(|call| call.layer_id == layer_id && call.property.ends_with("-opacity"))
            .map(|call| call.value.clone())
            .collect()
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.ensure(&mut surface, BASINS_FILL);
        manager.ensure(&mut surface, BASINS_FILL);

        assert_eq!(surface.source_adds(), 1);
        assert_eq!(surface.layer_adds(), 1);
        assert!(manager.is_registered(BASINS_FILL));
    }

    #[test]
    fn test_ensure_unknown_layer_is_noop() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.ensure(&mut surface, "no-such-layer");

        assert_eq!(surface.source_adds(), 0);
        assert_eq!(surface.layer_adds(), 0);
        assert!(!manager.is_registered("no-such-layer"));
    }

    #[test]
    fn test_stub_registers_without_surface_calls() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.ensure(&mut surface, "sst-anomaly");
        assert!(manager.is_registered("sst-anomaly"));
        assert_eq!(surface.source_adds(), 0);
        assert_eq!(surface.layer_adds(), 0);

        // Opacity on a stub is a no-op too.
        manager.set_opacity(&mut surface, "sst-anomaly", 0.8);
        assert!(surface.paint_log().is_empty());
    }

    #[test]
    fn test_source_ref_aliasing() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.ensure(&mut surface, "flood-extent-polygons");

        // The referenced layer is registered first and its source is shared.
        assert!(manager.is_registered("sentinel1-flood-extent"));
        assert_eq!(surface.source_adds(), 1);
        assert_eq!(surface.layer_adds(), 2);
        assert_eq!(
            surface.layer("flood-extent-polygons").unwrap().source_id,
            "source-sentinel1-flood-extent"
        );

        // Removing the aliasing layer must not pull the shared source out
        // from under its sibling.
        manager.remove(&mut surface, "flood-extent-polygons");
        assert!(surface.layer("flood-extent-polygons").is_none());
        assert!(surface.has_source("source-sentinel1-flood-extent"));
        assert!(surface.layer("sentinel1-flood-extent").is_some());
    }

    #[test]
    fn test_source_ref_cycle_aborts() {
        let mut catalog = LayerCatalog::new();
        catalog.upsert(
            "a",
            LayerDefinition::Aliased {
                kind: LayerKind::Fill,
                source_ref: "b".to_string(),
                source_layer: None,
                paint: Default::default(),
                filter: None,
            },
        );
        catalog.upsert(
            "b",
            LayerDefinition::Aliased {
                kind: LayerKind::Fill,
                source_ref: "a".to_string(),
                source_layer: None,
                paint: Default::default(),
                filter: None,
            },
        );

        let mut manager = LayerManager::new(catalog);
        let mut surface = MemorySurface::new();
        manager.ensure(&mut surface, "a");

        assert!(!manager.is_registered("a"));
        assert!(!manager.is_registered("b"));
        assert_eq!(surface.layer_adds(), 0);
    }

    #[test]
    fn test_alias_to_stub_is_skipped() {
        let mut catalog = LayerCatalog::new();
        catalog.upsert("ghost", LayerDefinition::Stub);
        catalog.upsert(
            "haunted",
            LayerDefinition::Aliased {
                kind: LayerKind::Fill,
                source_ref: "ghost".to_string(),
                source_layer: None,
                paint: Default::default(),
                filter: None,
            },
        );

        let mut manager = LayerManager::new(catalog);
        let mut surface = MemorySurface::new();
        manager.ensure(&mut surface, "haunted");

        // The stub target registers, but the alias has no source to draw from.
        assert!(manager.is_registered("ghost"));
        assert!(!manager.is_registered("haunted"));
        assert_eq!(surface.layer_adds(), 0);
    }

    #[test]
    fn test_chapter_diff() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.show_chapter_layers(
            &mut surface,
            &chapter(&[("portugal-outline", 0.9), ("basins-outline", 0.5)]),
        );
        surface.clear_paint_log();

        manager.show_chapter_layers(
            &mut surface,
            &chapter(&[("basins-outline", 0.8), (BASINS_FILL, 0.7)]),
        );

        // Outgoing layer: exactly one fade-out request.
        assert_eq!(
            opacity_requests(&surface, "portugal-outline"),
            vec![json!(0.0)]
        );
        // Carried-over layer: exactly one request, at the new target.
        assert_eq!(
            opacity_requests(&surface, "basins-outline"),
            vec![json!(0.8)]
        );
        // Incoming layer: ensured and faded in once.
        assert_eq!(opacity_requests(&surface, BASINS_FILL), vec![json!(0.7)]);
        assert!(surface.layer(BASINS_FILL).is_some());

        assert_eq!(
            manager.active_layers().collect::<Vec<_>>(),
            vec![BASINS_FILL, "basins-outline"]
        );
    }

    #[test]
    fn test_fade_out_issued_before_fade_in() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.show_chapter_layers(&mut surface, &chapter(&[("portugal-outline", 1.0)]));
        surface.clear_paint_log();
        manager.show_chapter_layers(&mut surface, &chapter(&[("basins-outline", 1.0)]));

        let layers: Vec<&str> = surface
            .paint_log()
            .iter()
            .map(|call| call.layer_id.as_str())
            .collect();
        assert_eq!(layers, vec!["portugal-outline", "basins-outline"]);
    }

    #[test]
    fn test_circle_stroke_fades_in_lockstep() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.show_chapter_layers(&mut surface, &chapter(&[(CONSEQUENCE_MARKERS, 0.9)]));

        assert_eq!(
            surface.paint_value(CONSEQUENCE_MARKERS, "circle-opacity"),
            Some(&json!(0.9))
        );
        assert_eq!(
            surface.paint_value(CONSEQUENCE_MARKERS, "circle-stroke-opacity"),
            Some(&json!(0.9))
        );
    }

    #[test]
    fn test_hide_all_layers() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.show_chapter_layers(
            &mut surface,
            &chapter(&[("portugal-outline", 0.9), ("basins-outline", 0.5)]),
        );
        surface.clear_paint_log();

        manager.hide_all_layers(&mut surface);

        assert_eq!(
            opacity_requests(&surface, "portugal-outline"),
            vec![json!(0.0)]
        );
        assert_eq!(
            opacity_requests(&surface, "basins-outline"),
            vec![json!(0.0)]
        );
        assert_eq!(surface.paint_log().len(), 2);
        assert_eq!(manager.active_layers().count(), 0);
    }

    #[test]
    fn test_update_source_data() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();
        let data = FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        };

        // Before registration the source doesn't exist: no-op.
        manager.update_source_data(&mut surface, "soil-moisture-animation", &data);
        assert!(surface.source_data("source-soil-moisture-animation").is_none());

        manager.ensure(&mut surface, "soil-moisture-animation");
        manager.update_source_data(&mut surface, "soil-moisture-animation", &data);
        assert!(surface.source_data("source-soil-moisture-animation").is_some());
    }

    #[test]
    fn test_add_dynamic_layer() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        manager.add_dynamic_layer(
            &mut surface,
            "runtime-overlay",
            LayerDefinition::Static {
                kind: LayerKind::Circle,
                source: SourceSpec::empty_geojson(),
                source_layer: None,
                paint: Default::default(),
                filter: None,
            },
        );

        assert!(manager.catalog().lookup("runtime-overlay").is_some());
        assert!(manager.is_registered("runtime-overlay"));
        assert!(surface.layer("runtime-overlay").is_some());
    }

    #[test]
    fn test_remove_unregistered_is_noop() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();
        manager.remove(&mut surface, "no-such-layer");
        assert_eq!(surface.layer_adds(), 0);
    }

    #[test]
    fn test_filter_consequences_by_chapter() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();

        // No-op while the marker layer isn't materialized.
        manager.filter_consequences_by_chapter(&mut surface, Some(3));
        assert!(surface.filter(CONSEQUENCE_MARKERS).is_none());

        manager.ensure(&mut surface, CONSEQUENCE_MARKERS);
        manager.filter_consequences_by_chapter(&mut surface, Some(3));
        assert_eq!(
            surface.filter(CONSEQUENCE_MARKERS),
            Some(&json!(["==", ["get", "chapter"], 3]))
        );

        manager.filter_consequences_by_chapter(&mut surface, None);
        assert!(surface.filter(CONSEQUENCE_MARKERS).is_none());
    }

    #[test]
    fn test_colorizer_bucketing() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();
        let fetcher = StubFetcher::with_snapshot();

        manager.ensure(&mut surface, BASINS_FILL);
        block_on(manager.color_basins_by_precondition(
            &mut surface,
            &fetcher,
            Some(PreconditionMode::Peak),
        ));

        // Basins iterate in name order; the trailing entry is the fallback.
        assert_eq!(
            surface.paint_value(BASINS_FILL, "fill-color"),
            Some(&json!([
                "match", ["get", "river"],
                "Douro", "#f7f7f7",
                "Mondego", "#b2182b",
                "Tejo", "#2166ac",
                "#2166ac"
            ]))
        );
    }

    #[test]
    fn test_colorizer_caches_across_modes() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();
        let fetcher = StubFetcher::with_snapshot();

        manager.ensure(&mut surface, BASINS_FILL);
        block_on(manager.color_basins_by_precondition(
            &mut surface,
            &fetcher,
            Some(PreconditionMode::Peak),
        ));
        block_on(manager.color_basins_by_precondition(
            &mut surface,
            &fetcher,
            Some(PreconditionMode::PreStorm),
        ));

        assert_eq!(fetcher.calls.get(), 1);
    }

    #[test]
    fn test_colorizer_missing_mode_keeps_paint() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();
        let fetcher = StubFetcher::with_snapshot();

        manager.ensure(&mut surface, BASINS_FILL);
        block_on(manager.color_basins_by_precondition(
            &mut surface,
            &fetcher,
            Some(PreconditionMode::PreStorm),
        ));

        assert!(surface.paint_value(BASINS_FILL, "fill-color").is_none());
    }

    #[test]
    fn test_colorizer_reset_never_fetches() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();
        let fetcher = StubFetcher::with_snapshot();

        manager.ensure(&mut surface, BASINS_FILL);
        block_on(manager.color_basins_by_precondition(&mut surface, &fetcher, None));

        assert_eq!(fetcher.calls.get(), 0);
        assert_eq!(
            surface.paint_value(BASINS_FILL, "fill-color"),
            Some(&json!("#2166ac"))
        );
    }

    #[test]
    fn test_colorizer_fetch_failure_leaves_paint_and_retries() {
        let mut manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();
        let fetcher = StubFetcher::new(vec![
            Err("timeout".to_string()),
            Ok(sample_snapshot()),
        ]);

        manager.ensure(&mut surface, BASINS_FILL);
        block_on(manager.color_basins_by_precondition(
            &mut surface,
            &fetcher,
            Some(PreconditionMode::Peak),
        ));
        assert!(surface.paint_value(BASINS_FILL, "fill-color").is_none());

        block_on(manager.color_basins_by_precondition(
            &mut surface,
            &fetcher,
            Some(PreconditionMode::Peak),
        ));
        assert_eq!(fetcher.calls.get(), 2);
        assert!(surface.paint_value(BASINS_FILL, "fill-color").is_some());
    }

    #[test]
    fn test_colorizer_noop_without_fill_layer() {
        let manager = LayerManager::flood_story();
        let mut surface = MemorySurface::new();
        let fetcher = StubFetcher::with_snapshot();

        block_on(manager.color_basins_by_precondition(
            &mut surface,
            &fetcher,
            Some(PreconditionMode::Peak),
        ));

        assert_eq!(fetcher.calls.get(), 0);
        assert!(surface.paint_log().is_empty());
    }
}
