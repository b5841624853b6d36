//! A small synthetic atlas shared by the test modules.
//!
//! The volume is 4 x 4 x 8 voxels with the cortical axis along +z:
//! region "L2" (leaves "L2a"/"L2b") fills z < 4, region "L1" fills
//! z >= 4, and the direction field points straight up.

use std::collections::HashMap;

use field::{FieldGeometry, VolumetricField};
use map::{LayerMap, LayerScheme, RegionHierarchy, RegionNode};

pub const SHAPE: [usize; 3] = [4, 4, 8];

pub const ROOT_ID: u32 = 1;
pub const ISOCORTEX_ID: u32 = 10;
pub const L1_ID: u32 = 11;
pub const L2_ID: u32 = 12;
pub const L2A_ID: u32 = 121;
pub const L2B_ID: u32 = 122;

pub fn init_logging() {
    let _ = ::env_logger::try_init();
}

pub fn define_geometry() -> FieldGeometry {
    FieldGeometry::new(SHAPE, [1.0, 1.0, 1.0], [0.0, 0.0, 0.0]).unwrap()
}

pub fn define_hierarchy() -> RegionHierarchy {
    RegionHierarchy::new(vec![
        RegionNode::new(ROOT_ID, None, "root"),
        RegionNode::new(ISOCORTEX_ID, Some(ROOT_ID), "Isocortex"),
        RegionNode::new(L1_ID, Some(ISOCORTEX_ID), "L1"),
        RegionNode::new(L2_ID, Some(ISOCORTEX_ID), "L2"),
        RegionNode::new(L2A_ID, Some(L2_ID), "L2a"),
        RegionNode::new(L2B_ID, Some(L2_ID), "L2b"),
    ]).unwrap()
}

/// Annotation volume: "L2a"/"L2b" leaves alternating by x below z = 4,
/// "L1" above.
pub fn define_annotation() -> VolumetricField<u32> {
    let geometry = define_geometry();
    let mut data = vec![0u32; geometry.voxel_count()];

    for x in 0..SHAPE[0] {
        for y in 0..SHAPE[1] {
            for z in 0..SHAPE[2] {
                let region = if z < 4 {
                    if x % 2 == 0 { L2A_ID } else { L2B_ID }
                } else {
                    L1_ID
                };
                data[geometry.idx([x, y, z])] = region;
            }
        }
    }

    VolumetricField::new(geometry, data).unwrap()
}

/// Direction vectors pointing straight toward the surface (+z).
pub fn define_direction_field() -> VolumetricField<[f32; 3]> {
    VolumetricField::filled(define_geometry(), [0.0, 0.0, 1.0])
}

pub fn define_layer_schemes() -> Vec<LayerScheme> {
    vec![
        LayerScheme::new("layer_1", vec!["L1".to_string()]),
        LayerScheme::new("layer_2", vec!["L2".to_string()]),
    ]
}

pub fn define_layer_map() -> LayerMap {
    LayerMap::new(&define_annotation(), &define_hierarchy(),
        &define_layer_schemes()).unwrap()
}

/// Two slices for each of the two layers.
pub fn define_slice_counts() -> HashMap<String, u8> {
    let mut counts = HashMap::new();
    counts.insert("layer_1".to_string(), 2);
    counts.insert("layer_2".to_string(), 2);
    counts
}

pub fn uniform_field(value: f32) -> VolumetricField<f32> {
    VolumetricField::filled(define_geometry(), value)
}

/// A reproducible pseudo-random density field.
pub fn seeded_field(seed: u64) -> VolumetricField<f32> {
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    let geometry = define_geometry();
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..geometry.voxel_count())
        .map(|_| rng.gen::<f32>() * 10.0)
        .collect();

    VolumetricField::new(geometry, data).unwrap()
}
