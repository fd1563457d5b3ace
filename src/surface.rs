//! Render-surface capability interface.
//!
//! The orchestration core never talks to a mapping engine directly; it issues
//! source, layer, paint, and filter requests through this narrow trait. A
//! MapLibre-backed implementation lives with the host application.
//! [`MemorySurface`] is the headless implementation used by tests and tooling.

use std::collections::BTreeMap;

use geojson::FeatureCollection;
use serde_json::Value;

use crate::catalog::{LayerKind, SourceSpec};

/// Duration of the paint-property tween the surface is expected to apply, in
/// milliseconds. The core only issues target values; interpolation between
/// them is the surface's job.
pub const FADE_DURATION_MS: u32 = 400;

/// A fully resolved layer ready to be placed on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLayer {
    pub id: String,
    pub kind: LayerKind,
    /// Id of the already-materialized source this layer draws from.
    pub source_id: String,
    /// Sub-layer selector for tiled sources.
    pub source_layer: Option<String>,
    pub paint: BTreeMap<String, Value>,
    pub filter: Option<Value>,
}

/// Capability interface onto the mapping engine.
///
/// Implementations are expected to animate `set_paint_property` changes
/// smoothly over [`FADE_DURATION_MS`] and to treat an unchanged paint value as
/// a no-op.
pub trait RenderSurface {
    fn has_source(&self, source_id: &str) -> bool;
    fn add_source(&mut self, source_id: &str, spec: &SourceSpec);
    fn remove_source(&mut self, source_id: &str);

    fn has_layer(&self, layer_id: &str) -> bool;
    fn add_layer(&mut self, layer: SurfaceLayer);
    fn remove_layer(&mut self, layer_id: &str);

    fn set_paint_property(&mut self, layer_id: &str, property: &str, value: Value);

    /// Replaces the layer's filter wholesale; `None` clears it.
    fn set_filter(&mut self, layer_id: &str, filter: Option<Value>);

    /// Replaces the geometry payload of an existing GeoJSON source.
    fn set_source_data(&mut self, source_id: &str, data: &FeatureCollection);
}

/// One recorded `set_paint_property` call.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintCall {
    pub layer_id: String,
    pub property: String,
    pub value: Value,
}

/// In-memory render surface.
///
/// Tracks sources, layers, filters, and replaced source data, and records
/// every paint request in order so callers can inspect exactly what the
/// orchestrator issued. Stands in for a real mapping engine in tests and
/// headless tooling.
#[derive(Debug, Default)]
pub struct MemorySurface {
    sources: BTreeMap<String, SourceSpec>,
    layers: BTreeMap<String, SurfaceLayer>,
    filters: BTreeMap<String, Value>,
    source_data: BTreeMap<String, FeatureCollection>,
    paint_log: Vec<PaintCall>,
    source_adds: usize,
    layer_adds: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, layer_id: &str) -> Option<&SurfaceLayer> {
        self.layers.get(layer_id)
    }

    pub fn source(&self, source_id: &str) -> Option<&SourceSpec> {
        self.sources.get(source_id)
    }

    pub fn filter(&self, layer_id: &str) -> Option<&Value> {
        self.filters.get(layer_id)
    }

    /// Last data payload pushed into a source, if any.
    pub fn source_data(&self, source_id: &str) -> Option<&FeatureCollection> {
        self.source_data.get(source_id)
    }

    /// Every paint request issued so far, oldest first.
    pub fn paint_log(&self) -> &[PaintCall] {
        &self.paint_log
    }

    /// Most recent value requested for a layer's paint property.
    pub fn paint_value(&self, layer_id: &str, property: &str) -> Option<&Value> {
        self.paint_log
            .iter()
            .rev()
            .find(|call| call.layer_id == layer_id && call.property == property)
            .map(|call| &call.value)
    }

    /// Total `add_source` calls, including any a buggy caller repeats.
    pub fn source_adds(&self) -> usize {
        self.source_adds
    }

    /// Total `add_layer` calls.
    pub fn layer_adds(&self) -> usize {
        self.layer_adds
    }

    pub fn clear_paint_log(&mut self) {
        self.paint_log.clear();
    }
}

impl RenderSurface for MemorySurface {
    fn has_source(&self, source_id: &str) -> bool {
        self.sources.contains_key(source_id)
    }

    fn add_source(&mut self, source_id: &str, spec: &SourceSpec) {
        self.source_adds += 1;
        self.sources.insert(source_id.to_string(), spec.clone());
    }

    fn remove_source(&mut self, source_id: &str) {
        self.sources.remove(source_id);
        self.source_data.remove(source_id);
    }

    fn has_layer(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    fn add_layer(&mut self, layer: SurfaceLayer) {
        self.layer_adds += 1;
        self.layers.insert(layer.id.clone(), layer);
    }

    fn remove_layer(&mut self, layer_id: &str) {
        self.layers.remove(layer_id);
        self.filters.remove(layer_id);
    }

    fn set_paint_property(&mut self, layer_id: &str, property: &str, value: Value) {
        if let Some(layer) = self.layers.get_mut(layer_id) {
            layer.paint.insert(property.to_string(), value.clone());
        }
        self.paint_log.push(PaintCall {
            layer_id: layer_id.to_string(),
            property: property.to_string(),
            value,
        });
    }

    fn set_filter(&mut self, layer_id: &str, filter: Option<Value>) {
        match filter {
            Some(filter) => {
                self.filters.insert(layer_id.to_string(), filter);
            }
            None => {
                self.filters.remove(layer_id);
            }
        }
    }

    fn set_source_data(&mut self, source_id: &str, data: &FeatureCollection) {
        self.source_data.insert(source_id.to_string(), data.clone());
    }
}
