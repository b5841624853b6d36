//! Depth-resolved density-profile allocation.

use alloc::MtypeDensities;
use cmn::{CmnError, CmnResult};
use field::{self, VolumetricField};
use map::{LayerMap, SliceMap};
use scheme::{RelativeDensityProfiles, SynapseClass};

/// Allocates total excitatory/inhibitory densities among mtypes using
/// relative density profiles over layer slices.
///
/// Single-threaded, pure transform: all partitioning work (layer
/// resolution, depth tracing, slice binning) happens before this engine
/// runs.
pub struct ProfileBasedAllocator<'a> {
    layer_map: &'a LayerMap,
    slice_map: &'a SliceMap,
    profiles: &'a RelativeDensityProfiles,
}

impl<'a> ProfileBasedAllocator<'a> {
    pub fn new(layer_map: &'a LayerMap, slice_map: &'a SliceMap,
            profiles: &'a RelativeDensityProfiles)
            -> ProfileBasedAllocator<'a> {
        ProfileBasedAllocator { layer_map, slice_map, profiles }
    }

    /// Produces one density field per mtype whose synapse class has a
    /// supplied total field.
    ///
    /// Supplying neither total field is fatal. Each supplied field must
    /// conform to the annotation geometry, be non-negative, and not be
    /// identically zero. Voxels without a slice assignment, and mtypes
    /// without a weight at a voxel's (layer, slice), receive 0.
    pub fn allocate(&self,
            excitatory: Option<&VolumetricField<f32>>,
            inhibitory: Option<&VolumetricField<f32>>)
            -> CmnResult<MtypeDensities> {
        if excitatory.is_none() && inhibitory.is_none() {
            return CmnError::err("No total density fields were provided. \
                Expected: excitatory density, or inhibitory density, or \
                both.");
        }

        for &(field_opt, name) in &[(excitatory, "excitatory"),
                (inhibitory, "inhibitory")] {
            if let Some(total) = field_opt {
                field::check_conformant(
                    &format!("annotation vs {} total density", name),
                    &[self.layer_map.geometry(), total.geometry()])?;
                total.check_density(name)?;
            }
        }

        let voxel_layers = self.layer_map.voxel_layers();
        let voxel_slices = self.slice_map.voxel_slices();
        let mut output = MtypeDensities::new();

        for mtype in self.profiles.mtypes() {
            let class = match self.profiles.synapse_class(mtype) {
                Some(class) => class,
                None => continue,
            };
            let total = match class {
                SynapseClass::Exc => excitatory,
                SynapseClass::Inh => inhibitory,
            };
            let total = match total {
                Some(total) => total,
                None => {
                    info!("ProfileBasedAllocator::allocate: no {} total \
                        field supplied; skipping mtype '{}'.", class, mtype);
                    continue;
                },
            };

            // Dense per-(layer, slice) weight table for the single pass
            // over voxels below.
            let weight_lut = self.build_weight_lut(mtype);

            let mut data = vec![0.0f32; total.geometry().voxel_count()];
            for (vx, value) in data.iter_mut().enumerate() {
                let (layer, slice) = match (voxel_layers[vx], voxel_slices[vx]) {
                    (Some(layer), Some(slice)) => (layer, slice),
                    _ => continue,
                };
                let weight = weight_lut[layer as usize]
                    .as_ref()
                    .and_then(|w| w.get(slice as usize))
                    .cloned()
                    .unwrap_or(0.0);
                if weight > 0.0 {
                    *value = weight * total.data()[vx];
                }
            }

            output.insert(mtype.clone(), total.with_data(data)?)?;
        }

        Ok(output)
    }

    // One optional per-slice weight vector per layer id.
    fn build_weight_lut(&self, mtype: &str) -> Vec<Option<Vec<f32>>> {
        (0..self.layer_map.layer_count()).map(|id| {
            self.layer_map.layer_name(id as u8)
                .and_then(|layer| self.profiles.layer_weights(mtype, layer))
                .map(|w| w.to_vec())
        }).collect()
    }
}
