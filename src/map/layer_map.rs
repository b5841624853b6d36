//! Resolution of named cortical layers against an annotation volume.

use std::collections::HashSet;

use cmn::{CmnError, CmnResult, MapStore};
use field::{FieldGeometry, VolumetricField};
use map::RegionHierarchy;

/// Declares one named layer as the union of the subtrees rooted at each
/// listed acronym.
#[derive(Debug, Clone)]
pub struct LayerScheme {
    name: String,
    acronyms: Vec<String>,
}

impl LayerScheme {
    pub fn new<S: Into<String>>(name: S, acronyms: Vec<String>) -> LayerScheme {
        LayerScheme { name: name.into(), acronyms }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A resolved layer: its region-id set and voxel membership.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    name: String,
    region_ids: HashSet<u32>,
    voxel_count: usize,
}

impl LayerInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region_ids(&self) -> &HashSet<u32> {
        &self.region_ids
    }

    pub fn voxel_count(&self) -> usize {
        self.voxel_count
    }
}

/// Per-voxel layer assignment for a full annotation volume.
///
/// Resolved once against the hierarchy and shared read-only by the slicing
/// and allocation stages. Layers must not overlap; unknown acronyms fail
/// construction.
#[derive(Debug, Clone)]
pub struct LayerMap {
    geometry: FieldGeometry,
    layers: MapStore<String, LayerInfo>,
    // One entry per voxel: the index of the voxel's layer within `layers`,
    // or `None` outside every declared layer.
    voxel_layers: Vec<Option<u8>>,
}

impl LayerMap {
    pub fn new(annotation: &VolumetricField<u32>, hierarchy: &RegionHierarchy,
            schemes: &[LayerScheme]) -> CmnResult<LayerMap> {
        if schemes.is_empty() {
            return CmnError::err("LayerMap::new: no layer schemes supplied.");
        }
        if schemes.len() > u8::max_value() as usize {
            return CmnError::err(format!("LayerMap::new: too many layers \
                ({}).", schemes.len()));
        }

        let mut layers = MapStore::with_capacity(schemes.len());

        for scheme in schemes {
            let mut region_ids = HashSet::new();

            for acronym in &scheme.acronyms {
                let root = match hierarchy.find_by_acronym(acronym) {
                    Some(node) => node,
                    None => return CmnError::err(format!("LayerMap::new: \
                        layer '{}' references unknown region acronym '{}'.",
                        scheme.name, acronym)),
                };
                region_ids.extend(hierarchy.descendants(root.id));
            }

            let info = LayerInfo {
                name: scheme.name.clone(),
                region_ids,
                voxel_count: 0,
            };

            if layers.insert(scheme.name.clone(), info).is_some() {
                return CmnError::err(format!("LayerMap::new: duplicate \
                    layer name: '{}'.", scheme.name));
            }
        }

        // Region-id sets must be disjoint before voxels are assigned.
        for i in 0..layers.len() {
            for j in (i + 1)..layers.len() {
                let shared: Vec<u32> = layers[i].region_ids
                    .intersection(&layers[j].region_ids).cloned().collect();
                if !shared.is_empty() {
                    return CmnError::err(format!("LayerMap::new: layers \
                        '{}' and '{}' overlap on region ids {:?}.",
                        layers[i].name, layers[j].name, shared));
                }
            }
        }

        let mut voxel_layers = vec![None; annotation.geometry().voxel_count()];
        let mut counts = vec![0usize; layers.len()];

        for (vx, &region_id) in annotation.data().iter().enumerate() {
            for idx in 0..layers.len() {
                if layers[idx].region_ids.contains(&region_id) {
                    voxel_layers[vx] = Some(idx as u8);
                    counts[idx] += 1;
                    break;
                }
            }
        }

        for (idx, count) in counts.into_iter().enumerate() {
            if count == 0 {
                warn!("LayerMap::new: layer '{}' has no voxels in the \
                    annotation volume.", layers[idx].name);
            }
            if let Some(info) = layers.by_index_mut(idx) {
                info.voxel_count = count;
            }
        }

        Ok(LayerMap {
            geometry: annotation.geometry().clone(),
            layers,
            voxel_layers,
        })
    }

    #[inline]
    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_id(&self, name: &str) -> Option<u8> {
        self.layers.index_of(&name.to_string()).map(|idx| idx as u8)
    }

    pub fn layer_name(&self, id: u8) -> Option<&str> {
        self.layers.keys().get(id as usize).map(|name| name.as_str())
    }

    pub fn by_name(&self, name: &str) -> Option<&LayerInfo> {
        self.layers.by_key(&name.to_string())
    }

    pub fn by_id(&self, id: u8) -> Option<&LayerInfo> {
        self.layers.by_index(id as usize)
    }

    /// Per-voxel layer assignment, one entry per flat voxel index.
    #[inline]
    pub fn voxel_layers(&self) -> &[Option<u8>] {
        &self.voxel_layers
    }

    /// Flat voxel indices belonging to the layer `id`.
    pub fn layer_voxels(&self, id: u8) -> Vec<usize> {
        self.voxel_layers.iter().enumerate()
            .filter(|&(_, &l)| l == Some(id))
            .map(|(vx, _)| vx)
            .collect()
    }
}
