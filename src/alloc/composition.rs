//! Layer-ratio (composition) allocation for excitatory mtypes.

use alloc::MtypeDensities;
use cmn::{CmnError, CmnResult};
use field::{self, VolumetricField};
use map::LayerMap;
use scheme::CompositionRatios;

/// Allocates the total excitatory density among excitatory mtypes by
/// their per-layer composition ratios.
///
/// Single-threaded, pure transform. Inhibitory mtypes are outside this
/// path; see the probability-map allocator.
pub struct CompositionBasedAllocator<'a> {
    layer_map: &'a LayerMap,
    ratios: &'a CompositionRatios,
}

impl<'a> CompositionBasedAllocator<'a> {
    pub fn new(layer_map: &'a LayerMap, ratios: &'a CompositionRatios)
            -> CompositionBasedAllocator<'a> {
        CompositionBasedAllocator { layer_map, ratios }
    }

    /// Produces one density field per excitatory mtype: its ratio times
    /// the excitatory total, restricted (zeroed outside) to its layer's
    /// voxels.
    pub fn allocate(&self, excitatory: &VolumetricField<f32>)
            -> CmnResult<MtypeDensities> {
        field::check_conformant("annotation vs excitatory total density",
            &[self.layer_map.geometry(), excitatory.geometry()])?;
        excitatory.check_density("excitatory")?;

        // Every composition layer must resolve before any field is built.
        for layer in self.ratios.layers() {
            if self.layer_map.layer_id(layer).is_none() {
                return CmnError::err(format!("Composition references \
                    layer '{}', which the layer map does not define.",
                    layer));
            }
        }

        let voxel_layers = self.layer_map.voxel_layers();
        let mut output = MtypeDensities::new();

        for mtype in self.ratios.mtypes() {
            let (layer, ratio) = self.ratios.ratio(mtype)
                .expect("CompositionBasedAllocator::allocate: ratio lookup");
            let layer_id = self.layer_map.layer_id(layer)
                .expect("CompositionBasedAllocator::allocate: layer lookup");

            let mut data = vec![0.0f32; excitatory.geometry().voxel_count()];
            for (vx, value) in data.iter_mut().enumerate() {
                if voxel_layers[vx] == Some(layer_id) {
                    *value = ratio * excitatory.data()[vx];
                }
            }

            output.insert(mtype.clone(), excitatory.with_data(data)?)?;
        }

        Ok(output)
    }
}
