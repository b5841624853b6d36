//! Allocation engines: each turns a total density field and a weight
//! table into one density field per mtype.

pub use self::profile::ProfileBasedAllocator;
pub use self::composition::CompositionBasedAllocator;
pub use self::probability::ProbabilityMapBasedAllocator;
pub use self::work_pool::WorkPool;

mod profile;
mod composition;
mod probability;
mod work_pool;

use cmn::{CmnError, CmnResult, MapStore, MapStoreIter};
use field::VolumetricField;

/// Canonical artifact name for an mtype's density field.
pub fn density_file_name(mtype: &str) -> String {
    format!("{}_densities.nrrd", mtype)
}

/// Allocation output: one freshly allocated density field per mtype,
/// iterable in deterministic insertion order.
#[derive(Debug)]
pub struct MtypeDensities {
    fields: MapStore<String, VolumetricField<f32>>,
}

impl MtypeDensities {
    pub fn new() -> MtypeDensities {
        MtypeDensities { fields: MapStore::new() }
    }

    /// Adds the finished field for `mtype`; an mtype may be added once.
    pub fn insert(&mut self, mtype: String, field: VolumetricField<f32>)
            -> CmnResult<()> {
        let name = mtype.clone();
        if self.fields.insert(mtype, field).is_some() {
            return CmnError::err(format!("MtypeDensities::insert: a \
                density field for mtype '{}' already exists.", name));
        }
        Ok(())
    }

    pub fn mtypes(&self) -> &[String] {
        self.fields.keys()
    }

    pub fn by_mtype(&self, mtype: &str) -> Option<&VolumetricField<f32>> {
        self.fields.by_key(&mtype.to_string())
    }

    /// `(mtype, field)` pairs in insertion order.
    pub fn iter(&self) -> MapStoreIter<String, VolumetricField<f32>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
