//! Mtype composition: per-layer average densities and derived ratios.

use std::collections::{HashMap, HashSet};

use cmn::{CmnError, CmnResult, MapStore};
use scheme::{SynapseClass, TaxonomyScheme};

/// One decoded composition row.
#[derive(Debug, Clone)]
pub struct CompositionEntry {
    /// Average cell density, cells per mm^3.
    pub density: f32,
    /// Layer label of the form `layer_N`.
    pub layer: String,
    pub mtype: String,
}

impl CompositionEntry {
    pub fn new<L, M>(density: f32, layer: L, mtype: M) -> CompositionEntry
            where L: Into<String>, M: Into<String> {
        CompositionEntry {
            density,
            layer: layer.into(),
            mtype: mtype.into(),
        }
    }
}

/// A validated composition table.
///
/// Densities must be non-negative and no mtype may appear twice.
#[derive(Debug, Clone)]
pub struct CompositionScheme {
    entries: Vec<CompositionEntry>,
}

impl CompositionScheme {
    pub fn new(entries: Vec<CompositionEntry>) -> CmnResult<CompositionScheme> {
        let mut seen = HashSet::new();

        for entry in &entries {
            if entry.density < 0.0 {
                return CmnError::err(format!("Negative density value \
                    encountered in composition (mtype '{}', layer '{}').",
                    entry.mtype, entry.layer));
            }
            if !seen.insert(entry.mtype.clone()) {
                return CmnError::err(format!("Composition lists mtype \
                    '{}' more than once.", entry.mtype));
            }
        }

        Ok(CompositionScheme { entries })
    }

    pub fn entries(&self) -> &[CompositionEntry] {
        &self.entries
    }

    pub fn mtypes(&self) -> HashSet<&str> {
        self.entries.iter().map(|e| e.mtype.as_str()).collect()
    }
}

/// Excitatory composition ratios: each excitatory mtype's share of the
/// total excitatory average density of its layer.
///
/// Invariant: ratios of the mtypes sharing one layer sum to 1.
#[derive(Debug, Clone)]
pub struct CompositionRatios {
    // mtype -> (layer, ratio), in composition order.
    ratios: MapStore<String, (String, f32)>,
}

impl CompositionRatios {
    /// Derives ratios from `composition`, keeping only the mtypes the
    /// `taxonomy` classifies as excitatory.
    ///
    /// The taxonomy and composition must reference the same mtype set; a
    /// layer whose excitatory densities sum to zero is fatal.
    pub fn new(taxonomy: &TaxonomyScheme, composition: &CompositionScheme)
            -> CmnResult<CompositionRatios> {
        check_congruency(taxonomy, composition)?;

        let excitatory: Vec<&CompositionEntry> = composition.entries().iter()
            .filter(|e| taxonomy.synapse_class(&e.mtype) == Some(SynapseClass::Exc))
            .collect();

        let mut layer_totals: HashMap<&str, f32> = HashMap::new();
        for entry in &excitatory {
            *layer_totals.entry(entry.layer.as_str()).or_insert(0.0) +=
                entry.density;
        }

        for (layer, &total) in &layer_totals {
            if total <= 0.0 {
                return CmnError::err(format!("Layer '{}' has zero total \
                    excitatory composition density; ratios are undefined \
                    there.", layer));
            }
        }

        let mut ratios = MapStore::with_capacity(excitatory.len());
        for entry in excitatory {
            let total = layer_totals[entry.layer.as_str()];
            ratios.insert(entry.mtype.clone(),
                (entry.layer.clone(), entry.density / total));
        }

        Ok(CompositionRatios { ratios })
    }

    /// Excitatory mtypes in composition order.
    pub fn mtypes(&self) -> &[String] {
        self.ratios.keys()
    }

    /// The layer and ratio of `mtype`.
    pub fn ratio(&self, mtype: &str) -> Option<(&str, f32)> {
        self.ratios.by_key(&mtype.to_string())
            .map(|&(ref layer, ratio)| (layer.as_str(), ratio))
    }

    /// Layers carrying at least one excitatory mtype.
    pub fn layers(&self) -> HashSet<&str> {
        self.ratios.values().iter().map(|&(ref l, _)| l.as_str()).collect()
    }
}

/// Fails unless the taxonomy and composition carry identical mtype sets;
/// the message lists the differences both ways.
fn check_congruency(taxonomy: &TaxonomyScheme, composition: &CompositionScheme)
        -> CmnResult<()> {
    let taxonomy_mtypes: HashSet<&str> =
        taxonomy.mtypes().iter().map(|m| m.as_str()).collect();
    let composition_mtypes = composition.mtypes();

    if taxonomy_mtypes != composition_mtypes {
        let mut only_taxonomy: Vec<&str> = taxonomy_mtypes
            .difference(&composition_mtypes).cloned().collect();
        let mut only_composition: Vec<&str> = composition_mtypes
            .difference(&taxonomy_mtypes).cloned().collect();
        only_taxonomy.sort();
        only_composition.sort();

        return CmnError::err(format!("Taxonomy and composition mtypes are \
            inconsistent. In taxonomy but not in composition: {:?}. In \
            composition but not in taxonomy: {:?}.", only_taxonomy,
            only_composition));
    }

    Ok(())
}
