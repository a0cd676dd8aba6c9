//! Conversion capability registry.
//!
//! The registry maps (source, target) canonical format pairs to converter
//! capabilities. It is built once at process start from the intersection of
//! the declared pair grid and the formats the imaging engine can actually
//! load and save, and is read-only thereafter.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::engine::ImageEngine;
use crate::format;

/// Raster formats that appear on both sides of the declared grid.
const RASTER_FORMATS: &[&str] = &["avif", "gif", "heif", "jpeg", "png", "tiff", "webp"];

/// Formats the service only ever accepts as conversion sources.
const SOURCE_ONLY_FORMATS: &[&str] = &["magick", "pdf", "svg"];

/// One supported conversion direction between canonical formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability {
    pub source: String,
    pub target: String,
}

impl Capability {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The full declared conversion grid, before engine capability filtering.
///
/// Every raster format converts to every other raster format, and each
/// source-only format converts to every raster format. Identity pairs are
/// never declared.
pub fn declared_pairs() -> Vec<Capability> {
    let mut pairs = Vec::new();
    for source in RASTER_FORMATS {
        for target in RASTER_FORMATS {
            if source != target {
                pairs.push(Capability::new(*source, *target));
            }
        }
    }
    for source in SOURCE_ONLY_FORMATS {
        for target in RASTER_FORMATS {
            pairs.push(Capability::new(*source, *target));
        }
    }
    pairs
}

/// Immutable registry of usable conversion capabilities.
///
/// Built once from declared pairs filtered by the engine's runtime
/// capabilities; lookups never mutate. An empty registry is a legal,
/// queryable state.
#[derive(Debug, Default)]
pub struct ConversionRegistry {
    by_pair: HashMap<(String, String), Capability>,
}

impl ConversionRegistry {
    /// Builds a registry from declared pairs, keeping only the pairs whose
    /// source the engine can load and whose target it can save. Pairs with
    /// `source == target` are dropped unconditionally.
    pub fn build(declared: &[Capability], engine: &dyn ImageEngine) -> Self {
        let mut by_pair = HashMap::with_capacity(declared.len());
        for capability in declared {
            if capability.source == capability.target {
                continue;
            }
            if !engine.supports_source(&capability.source) {
                continue;
            }
            if !engine.supports_target(&capability.target) {
                continue;
            }
            by_pair.insert(
                (capability.source.clone(), capability.target.clone()),
                capability.clone(),
            );
        }

        tracing::info!(
            engine = engine.name(),
            declared = declared.len(),
            registered = by_pair.len(),
            "conversion registry built"
        );

        Self { by_pair }
    }

    /// Looks up a capability by exact canonical pair.
    ///
    /// Callers normalize first; a miss is an outcome, not an error.
    pub fn find(&self, source: &str, target: &str) -> Option<&Capability> {
        self.by_pair.get(&(source.to_string(), target.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    /// Canonical discovery map: source format to sorted target formats.
    pub fn targets_by_source(&self) -> BTreeMap<String, Vec<String>> {
        let mut output: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (source, target) in self.by_pair.keys() {
            output
                .entry(source.clone())
                .or_default()
                .insert(target.clone());
        }

        output
            .into_iter()
            .map(|(source, targets)| (source, targets.into_iter().collect()))
            .collect()
    }

    /// Discovery map with alias expansion across both axes: every canonical
    /// source also appears under each of its aliases, and every target list
    /// carries the aliases of each canonical target.
    pub fn aliased_targets_by_source(&self) -> BTreeMap<String, Vec<String>> {
        let mut expanded: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (canonical_source, canonical_targets) in self.targets_by_source() {
            let mut targets = BTreeSet::new();
            for canonical_target in &canonical_targets {
                targets.extend(format::aliases_for(canonical_target));
            }

            for source in format::aliases_for(&canonical_source) {
                expanded.entry(source).or_default().extend(targets.clone());
            }
        }

        expanded
            .into_iter()
            .map(|(source, targets)| (source, targets.into_iter().collect()))
            .collect()
    }
}
