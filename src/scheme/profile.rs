//! Literature density profiles and their normalized (relative) form.

use std::collections::HashMap;

use cmn::{self, CmnError, CmnResult};
use scheme::SynapseClass;

/// One raw profile: per-slice cell counts for an mtype within one layer.
#[derive(Debug, Clone)]
pub struct DensityProfileEntry {
    pub mtype: String,
    pub layer: String,
    pub synapse_class: SynapseClass,
    /// One value per slice of the layer, slice 0 deepest.
    pub profile: Vec<f32>,
}

impl DensityProfileEntry {
    pub fn new<M, L>(mtype: M, layer: L, synapse_class: SynapseClass,
            profile: Vec<f32>) -> DensityProfileEntry
            where M: Into<String>, L: Into<String> {
        DensityProfileEntry {
            mtype: mtype.into(),
            layer: layer.into(),
            synapse_class,
            profile,
        }
    }
}

/// Relative density profiles: for every (layer, slice, synapse class)
/// carrying any mass, the weights across mtypes sum to 1.
///
/// This is the construction-time invariant that lets the profile-based
/// allocator conserve the total density field within each layer slice.
#[derive(Debug, Clone)]
pub struct RelativeDensityProfiles {
    // (mtype, layer) -> per-slice weights.
    weights: HashMap<(String, String), Vec<f32>>,
    // mtype -> synapse class, insertion-ordered mtype list alongside.
    classes: HashMap<String, SynapseClass>,
    mtypes: Vec<String>,
    slice_counts: HashMap<String, u8>,
}

impl RelativeDensityProfiles {
    /// Normalizes `entries` against the per-layer `slice_counts`
    /// configuration.
    ///
    /// Entries for layers absent from the configuration are skipped (with
    /// a log message); profile lengths must match the configured count;
    /// negative values, duplicate (mtype, layer) pairs, and conflicting
    /// synapse classes for one mtype are fatal.
    pub fn new(entries: &[DensityProfileEntry],
            slice_counts: &HashMap<String, u8>)
            -> CmnResult<RelativeDensityProfiles> {
        if slice_counts.is_empty() {
            return CmnError::err("RelativeDensityProfiles::new: the layer \
                slice-count configuration is empty.");
        }

        let mut raw: HashMap<(String, String), Vec<f32>> = HashMap::new();
        let mut classes: HashMap<String, SynapseClass> = HashMap::new();
        let mut mtypes: Vec<String> = Vec::new();
        // Totals per (layer, class, slice) for the normalization pass.
        let mut totals: HashMap<(String, SynapseClass), Vec<f32>> = HashMap::new();

        for entry in entries {
            let k = match slice_counts.get(&entry.layer) {
                Some(&k) => k as usize,
                None => {
                    info!("RelativeDensityProfiles::new: no slice count \
                        configured for layer '{}'; skipping the profile of \
                        mtype '{}' there.", entry.layer, entry.mtype);
                    continue;
                },
            };

            if entry.profile.len() != k {
                return CmnError::err(format!("Density profile for mtype \
                    '{}', layer '{}' has {} slice values; the layer is \
                    configured with {} slices.", entry.mtype, entry.layer,
                    entry.profile.len(), k));
            }
            if entry.profile.iter().any(|&v| v < 0.0) {
                return CmnError::err(format!("Density profile for mtype \
                    '{}', layer '{}' contains negative values.",
                    entry.mtype, entry.layer));
            }

            match classes.get(&entry.mtype) {
                Some(&class) if class != entry.synapse_class => {
                    return CmnError::err(format!("Mtype '{}' is declared \
                        both {} and {} across density profiles.",
                        entry.mtype, class, entry.synapse_class));
                },
                Some(_) => {},
                None => {
                    classes.insert(entry.mtype.clone(), entry.synapse_class);
                    mtypes.push(entry.mtype.clone());
                },
            }

            let key = (entry.mtype.clone(), entry.layer.clone());
            if raw.insert(key, entry.profile.clone()).is_some() {
                return CmnError::err(format!("Duplicate density profile \
                    for mtype '{}', layer '{}'.", entry.mtype, entry.layer));
            }

            let slot = totals.entry((entry.layer.clone(), entry.synapse_class))
                .or_insert_with(|| vec![0.0; k]);
            for (s, &v) in entry.profile.iter().enumerate() {
                slot[s] += v;
            }
        }

        // Normalize each profile slice-wise by the (layer, class) total,
        // leaving zero-mass slices at weight 0.
        let mut weights = HashMap::with_capacity(raw.len());
        for ((mtype, layer), profile) in raw {
            let class = classes[&mtype];
            let slot = &totals[&(layer.clone(), class)];
            let normalized = profile.iter().zip(slot.iter())
                .map(|(&v, &total)| if total > 0.0 { v / total } else { 0.0 })
                .collect();
            weights.insert((mtype, layer), normalized);
        }

        Ok(RelativeDensityProfiles {
            weights,
            classes,
            mtypes,
            slice_counts: slice_counts.clone(),
        })
    }

    /// Mtypes carrying at least one profile, in first-appearance order.
    pub fn mtypes(&self) -> &[String] {
        &self.mtypes
    }

    pub fn synapse_class(&self, mtype: &str) -> Option<SynapseClass> {
        self.classes.get(mtype).cloned()
    }

    /// The normalized weight of `mtype` within `(layer, slice)`, or 0
    /// where the profile defines none.
    pub fn weight(&self, mtype: &str, layer: &str, slice: u8) -> f32 {
        self.weights.get(&(mtype.to_string(), layer.to_string()))
            .and_then(|w| w.get(slice as usize))
            .cloned()
            .unwrap_or(0.0)
    }

    /// Per-slice weights of `mtype` within `layer`, if defined.
    pub fn layer_weights(&self, mtype: &str, layer: &str) -> Option<&[f32]> {
        self.weights.get(&(mtype.to_string(), layer.to_string()))
            .map(|w| w.as_slice())
    }

    pub fn slice_counts(&self) -> &HashMap<String, u8> {
        &self.slice_counts
    }

    /// Verifies the normalization invariant; used by consumers that want
    /// the guarantee restated at the point of use.
    pub fn check_normalization(&self) -> CmnResult<()> {
        let mut sums: HashMap<(String, SynapseClass), Vec<f32>> = HashMap::new();

        for (&(ref mtype, ref layer), weights) in &self.weights {
            let class = self.classes[mtype];
            let slot = sums.entry((layer.clone(), class))
                .or_insert_with(|| vec![0.0; weights.len()]);
            for (s, &w) in weights.iter().enumerate() {
                slot[s] += w;
            }
        }

        for ((layer, class), slot) in sums {
            for (s, &sum) in slot.iter().enumerate() {
                if sum != 0.0 && !cmn::approx_eq(sum, 1.0, cmn::WEIGHT_SUM_TOLERANCE) {
                    return CmnError::err(format!("Relative density \
                        profile weights for layer '{}', slice {}, class {} \
                        sum to {} (expected 1).", layer, s, class, sum));
                }
            }
        }

        Ok(())
    }
}
