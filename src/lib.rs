//! # Densit: Volumetric Cell Density Allocation Toolkit
//!
//! Allocates total excitatory/inhibitory volumetric cell-density fields
//! among morphological types (mtypes). Three allocation strategies are
//! provided: depth-resolved density profiles, per-layer composition
//! ratios, and molecular-marker probability maps.

extern crate time;
extern crate futures;
extern crate futures_cpupool;
#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;
#[cfg(test)]
extern crate rand;
#[cfg(test)]
extern crate env_logger;

pub mod alloc;
pub mod field;
pub mod map;
pub mod scheme;
pub mod cmn;
#[cfg(test)]
pub mod tests;

pub use self::cmn::{CmnError as Error, CmnResult as Result, MapStore};
pub use self::field::{FieldGeometry, VolumetricField};
pub use self::map::{RegionHierarchy, RegionNode, LayerScheme, LayerMap,
    DepthField, SliceMap, DegeneratePolicy};
pub use self::scheme::{SynapseClass, TaxonomyTable, TaxonomyScheme,
    DensityProfileEntry, RelativeDensityProfiles, CompositionEntry,
    CompositionScheme, CompositionRatios, ProbabilityMap, ProbabilityMapRow};
pub use self::alloc::{MtypeDensities, ProfileBasedAllocator,
    CompositionBasedAllocator, ProbabilityMapBasedAllocator, WorkPool,
    density_file_name};
