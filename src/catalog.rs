//! Declarative layer catalog.
//!
//! Maps layer ids to their source and paint definitions. Definitions are pure
//! data; materializing them on the render surface is the manager's job, so
//! catalog operations never have side effects on the map.

use std::collections::BTreeMap;

use geojson::FeatureCollection;
use serde_json::{json, Value};

/// Id of the basin fill layer recolored by the precondition colorizer.
pub const BASINS_FILL: &str = "basins-fill";

/// Id of the consequence marker layer filtered by chapter number.
pub const CONSEQUENCE_MARKERS: &str = "consequence-markers";

/// Rendered layer kinds understood by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Fill,
    Line,
    Circle,
    Symbol,
    Raster,
}

impl LayerKind {
    /// The paint property controlling this kind's opacity.
    pub fn opacity_property(self) -> &'static str {
        match self {
            LayerKind::Fill => "fill-opacity",
            LayerKind::Line => "line-opacity",
            LayerKind::Circle => "circle-opacity",
            LayerKind::Symbol => "icon-opacity",
            LayerKind::Raster => "raster-opacity",
        }
    }
}

/// Where a layer's geometry comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    /// GeoJSON document hosted at a URL.
    GeoJsonUrl { url: String },
    /// Inline GeoJSON, typically an empty collection filled in after a fetch.
    GeoJsonInline { data: FeatureCollection },
    /// Externally hosted tiled vector source.
    VectorTiles { url: String },
}

impl SourceSpec {
    pub fn geojson_url(url: impl Into<String>) -> Self {
        SourceSpec::GeoJsonUrl { url: url.into() }
    }

    /// Placeholder source for layers whose data arrives after an async fetch.
    pub fn empty_geojson() -> Self {
        SourceSpec::GeoJsonInline {
            data: FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
        }
    }

    pub fn vector_tiles(url: impl Into<String>) -> Self {
        SourceSpec::VectorTiles { url: url.into() }
    }
}

/// Paint property name to static value or data-driven expression.
pub type PaintSpec = BTreeMap<String, Value>;

/// A single catalog entry.
///
/// The three cases are dispatched on the variant tag rather than optional
/// fields: a `Stub` has no backing data and registering it is a no-op marker,
/// a `Static` layer materializes its own source, and an `Aliased` layer reuses
/// the materialized source of another definition.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerDefinition {
    Stub,
    Static {
        kind: LayerKind,
        source: SourceSpec,
        /// Sub-layer selector for tiled sources.
        source_layer: Option<String>,
        paint: PaintSpec,
        filter: Option<Value>,
    },
    Aliased {
        kind: LayerKind,
        /// Layer id whose materialized source this layer draws from.
        source_ref: String,
        source_layer: Option<String>,
        paint: PaintSpec,
        filter: Option<Value>,
    },
}

impl LayerDefinition {
    pub fn is_stub(&self) -> bool {
        matches!(self, LayerDefinition::Stub)
    }

    /// The render kind, if the definition has backing data.
    pub fn kind(&self) -> Option<LayerKind> {
        match self {
            LayerDefinition::Stub => None,
            LayerDefinition::Static { kind, .. } | LayerDefinition::Aliased { kind, .. } => {
                Some(*kind)
            }
        }
    }
}

/// Ordered table of layer definitions keyed by layer id.
#[derive(Debug, Clone, Default)]
pub struct LayerCatalog {
    defs: BTreeMap<String, LayerDefinition>,
}

impl LayerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, layer_id: &str) -> Option<&LayerDefinition> {
        self.defs.get(layer_id)
    }

    /// Inserts or overwrites a definition. Used for layers whose geometry is
    /// only known after an async fetch and for runtime-added layers.
    pub fn upsert(&mut self, layer_id: impl Into<String>, def: LayerDefinition) {
        self.defs.insert(layer_id.into(), def);
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The built-in flood narrative layer table.
    pub fn flood_story() -> Self {
        let mut catalog = Self::new();

        catalog.upsert(
            "portugal-outline",
            LayerDefinition::Static {
                kind: LayerKind::Line,
                source: SourceSpec::geojson_url("assets/districts.geojson"),
                source_layer: None,
                paint: paint([
                    ("line-color", json!("#ffffff")),
                    ("line-width", json!(1)),
                    ("line-opacity", json!(0)),
                ]),
                filter: None,
            },
        );

        catalog.upsert(
            "basins-outline",
            LayerDefinition::Static {
                kind: LayerKind::Line,
                source: SourceSpec::geojson_url("assets/basins.geojson"),
                source_layer: None,
                paint: paint([
                    ("line-color", json!("#3498db")),
                    ("line-width", json!(1.5)),
                    ("line-opacity", json!(0)),
                ]),
                filter: None,
            },
        );

        catalog.upsert(
            BASINS_FILL,
            LayerDefinition::Static {
                kind: LayerKind::Fill,
                source: SourceSpec::geojson_url("assets/basins.geojson"),
                source_layer: None,
                paint: paint([
                    ("fill-color", json!("#2166ac")),
                    ("fill-opacity", json!(0)),
                ]),
                filter: None,
            },
        );

        // Dynamic layers: source data is pushed programmatically after fetch.
        catalog.upsert(
            "soil-moisture-animation",
            LayerDefinition::Static {
                kind: LayerKind::Circle,
                source: SourceSpec::empty_geojson(),
                source_layer: None,
                paint: soil_moisture_paint(),
                filter: None,
            },
        );

        catalog.upsert(
            "precipitation-accumulation",
            LayerDefinition::Static {
                kind: LayerKind::Circle,
                source: SourceSpec::empty_geojson(),
                source_layer: None,
                paint: paint([
                    (
                        "circle-radius",
                        json!([
                            "interpolate", ["linear"], ["get", "total_mm"],
                            0, 3, 100, 6, 250, 10, 500, 16
                        ]),
                    ),
                    (
                        "circle-color",
                        json!([
                            "step", ["get", "total_mm"],
                            "#2166ac", 50,
                            "#f7f7b5", 100,
                            "#F7991F", 250,
                            "#e74c3c"
                        ]),
                    ),
                    ("circle-opacity", json!(0)),
                    ("circle-stroke-width", json!(0.5)),
                    ("circle-stroke-color", json!("rgba(255,255,255,0.2)")),
                ]),
                filter: None,
            },
        );

        catalog.upsert(
            "glofas-discharge",
            LayerDefinition::Static {
                kind: LayerKind::Circle,
                source: SourceSpec::empty_geojson(),
                source_layer: None,
                paint: paint([
                    (
                        "circle-radius",
                        json!([
                            "interpolate", ["linear"], ["get", "discharge_ratio"],
                            1, 6, 5, 14, 10, 22
                        ]),
                    ),
                    (
                        "circle-color",
                        json!([
                            "step", ["get", "discharge_ratio"],
                            "#2166ac", 2,
                            "#F7991F", 5,
                            "#e74c3c"
                        ]),
                    ),
                    ("circle-opacity", json!(0)),
                    ("circle-stroke-width", json!(2)),
                    ("circle-stroke-color", json!("rgba(255,255,255,0.3)")),
                ]),
                filter: None,
            },
        );

        catalog.upsert(
            "soil-moisture-snapshot",
            LayerDefinition::Static {
                kind: LayerKind::Circle,
                source: SourceSpec::empty_geojson(),
                source_layer: None,
                paint: soil_moisture_paint(),
                filter: None,
            },
        );

        // PMTiles flood extent pair: the polygon layer reuses the combined
        // tiled source instead of materializing its own.
        catalog.upsert(
            "sentinel1-flood-extent",
            LayerDefinition::Static {
                kind: LayerKind::Fill,
                source: SourceSpec::vector_tiles("pmtiles://data/flood-extent/combined.pmtiles"),
                source_layer: Some("flood-extent".to_string()),
                paint: paint([
                    ("fill-color", json!("#e74c3c")),
                    ("fill-opacity", json!(0)),
                ]),
                filter: None,
            },
        );

        catalog.upsert(
            "flood-extent-polygons",
            LayerDefinition::Aliased {
                kind: LayerKind::Fill,
                source_ref: "sentinel1-flood-extent".to_string(),
                source_layer: Some("flood-extent".to_string()),
                paint: paint([
                    ("fill-color", json!("#e74c3c")),
                    ("fill-opacity", json!(0)),
                ]),
                filter: None,
            },
        );

        catalog.upsert(
            CONSEQUENCE_MARKERS,
            LayerDefinition::Static {
                kind: LayerKind::Circle,
                source: SourceSpec::geojson_url("data/consequences/events.geojson"),
                source_layer: None,
                paint: paint([
                    ("circle-radius", json!(7)),
                    (
                        "circle-color",
                        json!([
                            "match", ["get", "type"],
                            "death", "#e74c3c",
                            "evacuation", "#F7991F",
                            "infrastructure", "#8e44ad",
                            "river_record", "#2166ac",
                            "levee_dam", "#e74c3c",
                            "landslide", "#795548",
                            "rescue", "#27ae60",
                            "closure", "#607080",
                            "power_cut", "#f39c12",
                            "military", "#34495e",
                            "political", "#95a5a6",
                            "#607080"
                        ]),
                    ),
                    ("circle-opacity", json!(0)),
                    ("circle-stroke-width", json!(1.5)),
                    ("circle-stroke-color", json!("rgba(255,255,255,0.7)")),
                    ("circle-stroke-opacity", json!(0)),
                ]),
                filter: None,
            },
        );

        // Stubbed layers: data not yet available.
        catalog.upsert("sst-anomaly", LayerDefinition::Stub);
        catalog.upsert("atmospheric-river-track", LayerDefinition::Stub);
        catalog.upsert("ipma-warnings-timeline", LayerDefinition::Stub);
        catalog.upsert("satellite-after", LayerDefinition::Stub);

        catalog
    }
}

fn paint<const N: usize>(props: [(&str, Value); N]) -> PaintSpec {
    props
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn soil_moisture_paint() -> PaintSpec {
    paint([
        (
            "circle-radius",
            json!(["interpolate", ["linear"], ["zoom"], 5, 4, 9, 10]),
        ),
        (
            "circle-color",
            json!([
                "interpolate", ["linear"], ["get", "value"],
                0, "#f7f7f7",
                0.5, "#67a9cf",
                1.0, "#2166ac"
            ]),
        ),
        ("circle-opacity", json!(0)),
        ("circle-stroke-width", json!(0)),
    ])
}
