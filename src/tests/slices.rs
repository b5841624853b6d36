//! Depth tracing and slice assignment.

use map::{DegeneratePolicy, DepthField, SliceMap};
use super::testbed;

#[test]
fn slice_assignment_is_disjoint_and_exhaustive() {
    testbed::init_logging();
    let layer_map = testbed::define_layer_map();
    let direction = testbed::define_direction_field();

    let depth = DepthField::trace(&layer_map, &direction,
        DegeneratePolicy::Warn).unwrap();
    assert_eq!(depth.degenerate_count(), 0);

    let slices = SliceMap::new(&layer_map, &depth,
        &testbed::define_slice_counts()).unwrap();

    let mut per_layer_slice = [[0usize; 2]; 2];
    for (vx, &layer) in layer_map.voxel_layers().iter().enumerate() {
        match layer {
            Some(layer) => {
                let slice = slices.voxel_slices()[vx]
                    .expect("layer voxel without a slice index");
                assert!(slice < 2);
                per_layer_slice[layer as usize][slice as usize] += 1;
            },
            None => assert!(slices.voxel_slices()[vx].is_none()),
        }
    }

    // Both layers are 4 voxels deep and 4x4 wide; two equal-width bins
    // split each into 32 + 32.
    for layer in 0..2 {
        assert_eq!(per_layer_slice[layer][0], 32);
        assert_eq!(per_layer_slice[layer][1], 32);
    }
}

#[test]
fn shallow_voxels_land_in_low_slices() {
    let layer_map = testbed::define_layer_map();
    let direction = testbed::define_direction_field();
    let depth = DepthField::trace(&layer_map, &direction,
        DegeneratePolicy::Warn).unwrap();
    let slices = SliceMap::new(&layer_map, &depth,
        &testbed::define_slice_counts()).unwrap();

    let geometry = testbed::define_geometry();
    // Bottom of layer_2 (z = 0) is slice 0; its top (z = 3) is slice 1.
    assert_eq!(slices.voxel_slices()[geometry.idx([0, 0, 0])], Some(0));
    assert_eq!(slices.voxel_slices()[geometry.idx([0, 0, 3])], Some(1));
    // Same within layer_1 (z = 4 deepest, z = 7 at the surface).
    assert_eq!(slices.voxel_slices()[geometry.idx([0, 0, 4])], Some(0));
    assert_eq!(slices.voxel_slices()[geometry.idx([0, 0, 7])], Some(1));
}

#[test]
fn degenerate_direction_vectors_are_excluded() {
    testbed::init_logging();
    let layer_map = testbed::define_layer_map();
    let geometry = testbed::define_geometry();

    let mut vectors = testbed::define_direction_field().into_data();
    let broken = geometry.idx([2, 2, 1]);
    vectors[broken] = [0.0, 0.0, 0.0];
    let direction = ::field::VolumetricField::new(geometry.clone(), vectors)
        .unwrap();

    let depth = DepthField::trace(&layer_map, &direction,
        DegeneratePolicy::Warn).unwrap();
    // The whole layer_2 column is cut off: its streamlines all pass
    // through the broken voxel.
    assert_eq!(depth.degenerate_count(), 4);
    assert!(!depth.is_defined(broken));

    let slices = SliceMap::new(&layer_map, &depth,
        &testbed::define_slice_counts()).unwrap();
    for z in 0..4 {
        assert!(slices.voxel_slices()[geometry.idx([2, 2, z])].is_none());
    }
}

#[test]
fn degenerate_policy_fail_above_threshold() {
    let layer_map = testbed::define_layer_map();
    let geometry = testbed::define_geometry();

    let mut vectors = testbed::define_direction_field().into_data();
    vectors[geometry.idx([1, 1, 2])] = [0.0, 0.0, 0.0];
    let direction = ::field::VolumetricField::new(geometry, vectors).unwrap();

    assert!(DepthField::trace(&layer_map, &direction,
        DegeneratePolicy::FailAbove(0.0)).is_err());
    assert!(DepthField::trace(&layer_map, &direction,
        DegeneratePolicy::FailAbove(0.5)).is_ok());
}

#[test]
fn unconfigured_layers_are_skipped() {
    let layer_map = testbed::define_layer_map();
    let direction = testbed::define_direction_field();
    let depth = DepthField::trace(&layer_map, &direction,
        DegeneratePolicy::Warn).unwrap();

    let mut counts = testbed::define_slice_counts();
    counts.remove("layer_2");
    let slices = SliceMap::new(&layer_map, &depth, &counts).unwrap();

    let layer_2 = layer_map.layer_id("layer_2").unwrap();
    for (vx, &layer) in layer_map.voxel_layers().iter().enumerate() {
        if layer == Some(layer_2) {
            assert!(slices.voxel_slices()[vx].is_none());
        }
    }
    assert_eq!(slices.slice_count(layer_2), None);
}

#[test]
fn empty_slice_configuration_is_fatal() {
    let layer_map = testbed::define_layer_map();
    let direction = testbed::define_direction_field();
    let depth = DepthField::trace(&layer_map, &direction,
        DegeneratePolicy::Warn).unwrap();

    assert!(SliceMap::new(&layer_map, &depth, &Default::default()).is_err());
}
