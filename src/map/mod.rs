//! Spatial maps: the region hierarchy, layer resolution, and
//! cortical-depth slicing.

pub use self::region_hierarchy::{RegionHierarchy, RegionNode};
pub use self::layer_map::{LayerScheme, LayerMap, LayerInfo};
pub use self::depth_slice::{DepthField, SliceMap, DegeneratePolicy,
    DEPTH_UNDEFINED};

mod region_hierarchy;
mod layer_map;
mod depth_slice;
