//! Volumetric fields: 3D arrays with shared affine metadata.

use cmn::{self, CmnError, CmnResult};

/// Shape, voxel dimensions, and world offset of a volumetric field.
///
/// Every field participating in one computation must carry a conformant
/// geometry; see [`FieldGeometry::conformant`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGeometry {
    shape: [usize; 3],
    voxel_dims: [f32; 3],
    offset: [f32; 3],
}

impl FieldGeometry {
    pub fn new(shape: [usize; 3], voxel_dims: [f32; 3], offset: [f32; 3])
            -> CmnResult<FieldGeometry> {
        if shape.iter().any(|&s| s == 0) {
            return CmnError::err(format!("FieldGeometry::new: zero-sized \
                shape: {:?}.", shape));
        }
        if voxel_dims.iter().any(|&d| d <= 0.0) {
            return CmnError::err(format!("FieldGeometry::new: non-positive \
                voxel dimensions: {:?}.", voxel_dims));
        }
        Ok(FieldGeometry { shape, voxel_dims, offset })
    }

    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    #[inline]
    pub fn voxel_dims(&self) -> [f32; 3] {
        self.voxel_dims
    }

    #[inline]
    pub fn offset(&self) -> [f32; 3] {
        self.offset
    }

    /// Total number of voxels.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.shape[0] * self.shape[1] * self.shape[2]
    }

    /// Flat row-major index of the voxel at `coords`.
    #[inline]
    pub fn idx(&self, coords: [usize; 3]) -> usize {
        (coords[0] * self.shape[1] + coords[1]) * self.shape[2] + coords[2]
    }

    /// Integer voxel coordinates of the flat index `idx`.
    #[inline]
    pub fn coords(&self, idx: usize) -> [usize; 3] {
        let z = idx % self.shape[2];
        let y = (idx / self.shape[2]) % self.shape[1];
        let x = idx / (self.shape[1] * self.shape[2]);
        [x, y, z]
    }

    /// World coordinates of the center of the voxel at `coords`.
    pub fn voxel_center(&self, coords: [usize; 3]) -> [f32; 3] {
        let mut ctr = [0.0f32; 3];
        for a in 0..3 {
            ctr[a] = self.offset[a] + (coords[a] as f32 + 0.5) * self.voxel_dims[a];
        }
        ctr
    }

    /// Integer voxel coordinates containing the world position `pos`, or
    /// `None` when `pos` lies outside the volume.
    pub fn position_coords(&self, pos: [f32; 3]) -> Option<[usize; 3]> {
        let mut coords = [0usize; 3];
        for a in 0..3 {
            let c = (pos[a] - self.offset[a]) / self.voxel_dims[a];
            if c < 0.0 || c >= self.shape[a] as f32 {
                return None;
            }
            coords[a] = c as usize;
        }
        Some(coords)
    }

    /// Length of the smallest voxel edge, in world units.
    pub fn min_voxel_dim(&self) -> f32 {
        self.voxel_dims.iter().cloned().fold(::std::f32::MAX, f32::min)
    }

    /// Checks shape equality and voxel-dimension/offset agreement (within
    /// tolerance) with `other`.
    pub fn conformant(&self, other: &FieldGeometry) -> bool {
        self.shape == other.shape
            && (0..3).all(|a| {
                cmn::approx_eq(self.voxel_dims[a], other.voxel_dims[a],
                    cmn::GEOMETRY_TOLERANCE)
                    && cmn::approx_eq(self.offset[a], other.offset[a],
                        cmn::GEOMETRY_TOLERANCE)
            })
    }
}

/// Fails when any geometry in `geometries` is not conformant with the
/// first. `what` names the offending field set in the error message.
pub fn check_conformant(what: &str, geometries: &[&FieldGeometry]) -> CmnResult<()> {
    if let Some((first, rest)) = geometries.split_first() {
        for (i, geo) in rest.iter().enumerate() {
            if !first.conformant(geo) {
                return CmnError::err(format!("Mismatched field metadata \
                    ({}): field 0 has shape {:?}, voxel dims {:?}, offset \
                    {:?}; field {} has shape {:?}, voxel dims {:?}, offset \
                    {:?}.", what, first.shape(), first.voxel_dims(),
                    first.offset(), i + 1, geo.shape(), geo.voxel_dims(),
                    geo.offset()));
            }
        }
    }
    Ok(())
}

/// A 3D array of voxel values plus its affine metadata.
///
/// Fields are read-only inputs or freshly allocated outputs; nothing in
/// this crate mutates a field after handing it to a consumer.
#[derive(Debug, Clone)]
pub struct VolumetricField<T> {
    geometry: FieldGeometry,
    data: Vec<T>,
}

impl<T> VolumetricField<T> {
    pub fn new(geometry: FieldGeometry, data: Vec<T>) -> CmnResult<VolumetricField<T>> {
        if data.len() != geometry.voxel_count() {
            return CmnError::err(format!("VolumetricField::new: payload \
                length ({}) does not match the geometry voxel count ({}).",
                data.len(), geometry.voxel_count()));
        }
        Ok(VolumetricField { geometry, data })
    }

    /// A new field sharing this field's geometry with payload `data`.
    pub fn with_data<U>(&self, data: Vec<U>) -> CmnResult<VolumetricField<U>> {
        VolumetricField::new(self.geometry.clone(), data)
    }

    #[inline]
    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn get(&self, coords: [usize; 3]) -> &T {
        &self.data[self.geometry.idx(coords)]
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone> VolumetricField<T> {
    /// A field of `geometry` with every voxel set to `value`.
    pub fn filled(geometry: FieldGeometry, value: T) -> VolumetricField<T> {
        let len = geometry.voxel_count();
        VolumetricField { geometry, data: vec![value; len] }
    }
}

impl VolumetricField<f32> {
    /// Fails when `self` contains a negative value or is identically zero.
    /// `what` names the field in the error message.
    pub fn check_density(&self, what: &str) -> CmnResult<()> {
        if self.data.iter().any(|&v| v < 0.0) {
            return CmnError::err(format!("Density field '{}' contains \
                negative values.", what));
        }
        if self.data.iter().all(|&v| v == 0.0) {
            return CmnError::err(format!("Density field '{}' is zero \
                everywhere.", what));
        }
        Ok(())
    }

    /// Fails on negative values only; an all-zero field is allowed.
    /// Used for marker fields, which may legitimately vanish.
    pub fn check_non_negative(&self, what: &str) -> CmnResult<()> {
        if self.data.iter().any(|&v| v < 0.0) {
            return CmnError::err(format!("Density field '{}' contains \
                negative values.", what));
        }
        Ok(())
    }
}
