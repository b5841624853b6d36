//! Cortical-depth coordinates and slice assignment.
//!
//! Layers are subdivided into slices of equal thickness along the local
//! cortical axis. The axis is given by a direction-vector field; a
//! streamline is traced through it from each voxel to both layer
//! boundaries, and the voxel's normalized depth is its relative position
//! between them.

use std::collections::HashMap;

use cmn::{CmnError, CmnResult};
use field::{self, VolumetricField};
use map::LayerMap;

/// Sentinel depth for voxels outside every layer or excluded as
/// degenerate.
pub const DEPTH_UNDEFINED: f32 = -1.0;

// A streamline longer than this many steps is considered non-terminating
// and its seed voxel degenerate.
const MAX_TRACE_STEPS: usize = 10_000;

/// What to do about voxels that cannot be assigned a depth (zero-norm
/// direction vector or a non-terminating streamline).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegeneratePolicy {
    /// Log the excluded fraction and carry on; excluded voxels receive
    /// zero density downstream.
    Warn,
    /// Fail when the excluded fraction of layer voxels exceeds the given
    /// threshold.
    FailAbove(f32),
}

impl Default for DegeneratePolicy {
    fn default() -> DegeneratePolicy {
        DegeneratePolicy::Warn
    }
}

/// Normalized cortical depth per voxel, in `[0, 1]` within each layer.
///
/// Computed once per (annotation, direction field) pair and shared
/// read-only by every consumer that needs slicing.
#[derive(Debug, Clone)]
pub struct DepthField {
    depths: VolumetricField<f32>,
    included: usize,
    degenerate: usize,
}

impl DepthField {
    /// Traces a streamline through `direction` from every layer voxel of
    /// `layer_map` and records its normalized depth. Depth 0 lies at the
    /// boundary reached against the direction vectors (the white-matter
    /// side when vectors point toward the surface), depth 1 at the
    /// boundary reached along them.
    pub fn trace(layer_map: &LayerMap, direction: &VolumetricField<[f32; 3]>,
            policy: DegeneratePolicy) -> CmnResult<DepthField> {
        field::check_conformant("annotation vs direction vectors",
            &[layer_map.geometry(), direction.geometry()])?;

        let geometry = layer_map.geometry().clone();
        let step = 0.5 * geometry.min_voxel_dim();
        let voxel_layers = layer_map.voxel_layers();

        let mut depths = vec![DEPTH_UNDEFINED; geometry.voxel_count()];
        let mut included = 0usize;
        let mut degenerate = 0usize;

        for vx in 0..depths.len() {
            let layer = match voxel_layers[vx] {
                Some(layer) => layer,
                None => continue,
            };

            let origin = geometry.voxel_center(geometry.coords(vx));

            if normalize(direction.data()[vx]).is_none() {
                degenerate += 1;
                continue;
            }

            let up = trace_to_boundary(origin, 1.0, layer, layer_map,
                direction, step);
            let down = trace_to_boundary(origin, -1.0, layer, layer_map,
                direction, step);

            match (up, down) {
                (Some(d_up), Some(d_down)) => {
                    depths[vx] = d_down / (d_down + d_up);
                    included += 1;
                },
                _ => degenerate += 1,
            }
        }

        let layer_total = included + degenerate;
        if degenerate > 0 {
            let fraction = degenerate as f32 / layer_total as f32;
            match policy {
                DegeneratePolicy::Warn => {
                    warn!("DepthField::trace: {} of {} layer voxels \
                        ({:.2}%) have no usable depth coordinate and will \
                        receive zero density.", degenerate, layer_total,
                        fraction * 100.0);
                },
                DegeneratePolicy::FailAbove(threshold) => {
                    if fraction > threshold {
                        return CmnError::err(format!("DepthField::trace: \
                            {} of {} layer voxels ({:.4}) have no usable \
                            depth coordinate (threshold: {:.4}).",
                            degenerate, layer_total, fraction, threshold));
                    }
                },
            }
        }

        let depths = VolumetricField::new(geometry, depths)?;
        Ok(DepthField { depths, included, degenerate })
    }

    #[inline]
    pub fn depths(&self) -> &VolumetricField<f32> {
        &self.depths
    }

    /// Whether the voxel at flat index `vx` carries a depth coordinate.
    #[inline]
    pub fn is_defined(&self, vx: usize) -> bool {
        self.depths.data()[vx] >= 0.0
    }

    pub fn included_count(&self) -> usize {
        self.included
    }

    pub fn degenerate_count(&self) -> usize {
        self.degenerate
    }
}

/// Follows the direction field from `origin` (sign `dir_sign`) until the
/// streamline leaves the layer `layer` or the volume, re-sampling the
/// direction at every step. Returns the distance traveled, or `None` for
/// a degenerate streamline (zero-norm sample or step-cap overrun).
fn trace_to_boundary(origin: [f32; 3], dir_sign: f32, layer: u8,
        layer_map: &LayerMap, direction: &VolumetricField<[f32; 3]>,
        step: f32) -> Option<f32> {
    let geometry = layer_map.geometry();
    let voxel_layers = layer_map.voxel_layers();
    let mut pos = origin;
    let mut dist = 0.0f32;

    for _ in 0..MAX_TRACE_STEPS {
        let coords = match geometry.position_coords(pos) {
            Some(coords) => coords,
            // Left the volume while still inside the layer; treat the
            // volume boundary as the layer boundary.
            None => return Some(dist),
        };
        let vx = geometry.idx(coords);

        if voxel_layers[vx] != Some(layer) {
            return Some(dist);
        }

        let dir = match normalize(direction.data()[vx]) {
            Some(dir) => dir,
            None => return None,
        };

        for a in 0..3 {
            pos[a] += dir_sign * dir[a] * step;
        }
        dist += step;
    }

    None
}

/// Unit vector of `v`, or `None` when `v` is (near) zero-norm.
fn normalize(v: [f32; 3]) -> Option<[f32; 3]> {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if norm < 1.0e-6 || !norm.is_finite() {
        return None;
    }
    Some([v[0] / norm, v[1] / norm, v[2] / norm])
}

/// Per-voxel slice assignment: each layer's depth range `[0, 1]` is
/// partitioned into `k` equal-width bins, `k` configured per layer.
///
/// The assignment is disjoint and exhaustive over the depth-carrying
/// voxels of configured layers; layers absent from the configuration are
/// skipped entirely.
#[derive(Debug, Clone)]
pub struct SliceMap {
    // One entry per voxel: the slice index within the voxel's layer.
    voxel_slices: Vec<Option<u8>>,
    // Slice count per layer id; zero marks an unconfigured layer.
    slice_counts: Vec<u8>,
}

impl SliceMap {
    pub fn new(layer_map: &LayerMap, depth_field: &DepthField,
            slice_counts: &HashMap<String, u8>) -> CmnResult<SliceMap> {
        if slice_counts.is_empty() {
            return CmnError::err("SliceMap::new: the layer slice-count \
                configuration is empty.");
        }
        field::check_conformant("annotation vs depth coordinates",
            &[layer_map.geometry(), depth_field.depths().geometry()])?;

        let mut counts = vec![0u8; layer_map.layer_count()];
        for (name, &k) in slice_counts {
            match layer_map.layer_id(name) {
                Some(id) => {
                    if k == 0 {
                        return CmnError::err(format!("SliceMap::new: \
                            layer '{}' is configured with zero slices.",
                            name));
                    }
                    counts[id as usize] = k;
                },
                None => warn!("SliceMap::new: slice count given for \
                    unresolved layer '{}'; ignoring.", name),
            }
        }

        for id in 0..layer_map.layer_count() {
            if counts[id] == 0 {
                info!("SliceMap::new: layer '{}' has no configured slice \
                    count and will be skipped.",
                    layer_map.layer_name(id as u8).unwrap_or("?"));
            }
        }

        let voxel_layers = layer_map.voxel_layers();
        let depths = depth_field.depths().data();
        let mut voxel_slices = vec![None; depths.len()];

        for vx in 0..depths.len() {
            let layer = match voxel_layers[vx] {
                Some(layer) => layer,
                None => continue,
            };
            let k = counts[layer as usize];
            if k == 0 || !depth_field.is_defined(vx) {
                continue;
            }

            let bin = (depths[vx] * k as f32) as usize;
            voxel_slices[vx] = Some(bin.min(k as usize - 1) as u8);
        }

        Ok(SliceMap { voxel_slices, slice_counts: counts })
    }

    /// Per-voxel slice assignment, one entry per flat voxel index.
    #[inline]
    pub fn voxel_slices(&self) -> &[Option<u8>] {
        &self.voxel_slices
    }

    /// Configured slice count for the layer `id`; `None` when the layer
    /// was skipped.
    pub fn slice_count(&self, id: u8) -> Option<u8> {
        match self.slice_counts.get(id as usize) {
            Some(&k) if k > 0 => Some(k),
            _ => None,
        }
    }
}
