//! Marker-probability allocation, partitioned across a worker pool.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use time;

use alloc::{MtypeDensities, WorkPool};
use cmn::{CmnError, CmnResult};
use field::{self, VolumetricField};
use map::RegionHierarchy;
use scheme::{ProbabilityMap, SynapseClass};

// Inputs shared read-only by every worker.
struct SharedInputs {
    // Row-region acronym -> flat voxel indices resolved to it.
    region_voxels: HashMap<String, Vec<usize>>,
    // Molecular type -> marker density payload.
    markers: HashMap<String, Vec<f32>>,
    voxel_count: usize,
}

// One (region, molecular type, probability) contribution to an mtype.
#[derive(Debug, Clone)]
struct Contribution {
    region: String,
    molecular_type: String,
    probability: f32,
}

/// Allocates molecular-marker densities among the mtypes of one synapse
/// class using probability maps.
///
/// For each applicable row, the contribution to an mtype at the row's
/// voxels is `p` times the marker density there. Contributions to the
/// same mtype accumulate by summation; no renormalization is applied, so
/// overlapping marker populations are the caller's concern.
pub struct ProbabilityMapBasedAllocator<'a> {
    annotation: &'a VolumetricField<u32>,
    hierarchy: &'a RegionHierarchy,
    maps: &'a [ProbabilityMap],
    synapse_class: SynapseClass,
}

impl<'a> ProbabilityMapBasedAllocator<'a> {
    pub fn new(annotation: &'a VolumetricField<u32>,
            hierarchy: &'a RegionHierarchy, maps: &'a [ProbabilityMap],
            synapse_class: SynapseClass) -> ProbabilityMapBasedAllocator<'a> {
        ProbabilityMapBasedAllocator { annotation, hierarchy, maps, synapse_class }
    }

    /// Produces one density field per mtype that receives a positive
    /// probability in at least one row of the target synapse class. Rows
    /// of the other class are skipped. Work is partitioned by mtype
    /// across `pool`; per-mtype partial fields are reduced by elementwise
    /// summation in submission order, so results are identical for any
    /// pool size.
    pub fn allocate(&self, markers: &HashMap<String, VolumetricField<f32>>,
            pool: &WorkPool) -> CmnResult<MtypeDensities> {
        if self.maps.is_empty() {
            return CmnError::err("ProbabilityMapBasedAllocator::allocate: \
                no probability maps supplied.");
        }

        let mut geometries = vec![self.annotation.geometry()];
        for (name, marker) in markers.iter() {
            marker.check_non_negative(name)?;
            geometries.push(marker.geometry());
        }
        field::check_conformant("annotation vs marker densities", &geometries)?;

        let (mtypes, contributions) = self.collect_contributions()?;

        for (mtype, rows) in contributions.iter() {
            for contribution in rows {
                if !markers.contains_key(&contribution.molecular_type) {
                    return CmnError::err(format!("Probability-map row \
                        ('{}', '{}', {}) targets mtype '{}', but no \
                        marker density field named '{}' was supplied.",
                        contribution.region, contribution.molecular_type,
                        self.synapse_class, mtype,
                        contribution.molecular_type));
                }
            }
        }

        let row_regions: HashSet<&str> = contributions.values()
            .flat_map(|rows| rows.iter().map(|c| c.region.as_str()))
            .collect();
        let region_voxels = self.resolve_regions(&row_regions);

        let shared = Arc::new(SharedInputs {
            region_voxels,
            markers: markers.iter()
                .map(|(name, marker)| (name.clone(), marker.data().to_vec()))
                .collect(),
            voxel_count: self.annotation.geometry().voxel_count(),
        });

        let time_start = time::get_time();
        let chunk_len = partition_len(mtypes.len(), pool.size());

        let jobs: Vec<_> = mtypes.chunks(chunk_len).map(|chunk| {
            let shared = Arc::clone(&shared);
            let work: Vec<(String, Vec<Contribution>)> = chunk.iter()
                .map(|mtype| (mtype.clone(), contributions[mtype].clone()))
                .collect();
            move || compute_partition(&shared, work)
        }).collect();

        let partials = pool.run_all(jobs)?;

        let mut accumulated: Vec<(String, Vec<f32>)> = Vec::with_capacity(mtypes.len());
        for partial in partials {
            for (mtype, data) in partial {
                match accumulated.iter_mut().find(|&&mut (ref m, _)| *m == mtype) {
                    Some(&mut (_, ref mut acc)) => {
                        for (a, v) in acc.iter_mut().zip(data) {
                            *a += v;
                        }
                    },
                    None => accumulated.push((mtype, data)),
                }
            }
        }

        let mut output = MtypeDensities::new();
        for (mtype, data) in accumulated {
            output.insert(mtype, self.annotation.with_data(data)?)?;
        }

        let time_elapsed = time::get_time() - time_start;
        info!("ProbabilityMapBasedAllocator::allocate: allocated {} mtype \
            fields on {} workers in {}ms.", output.len(), pool.size(),
            time_elapsed.num_milliseconds());

        Ok(output)
    }

    // Flattens the maps into per-mtype contribution lists, keeping only
    // target-class rows and positive probabilities. Also fails on row
    // keys duplicated across maps (within-map duplicates fail at map
    // construction).
    fn collect_contributions(&self)
            -> CmnResult<(Vec<String>, HashMap<String, Vec<Contribution>>)> {
        let mut seen_keys = HashSet::new();
        let mut mtypes: Vec<String> = Vec::new();
        let mut contributions: HashMap<String, Vec<Contribution>> = HashMap::new();

        for map in self.maps {
            for (key, probabilities) in map.rows() {
                if !seen_keys.insert(key.clone()) {
                    return CmnError::err(format!("Probability-map row key \
                        ('{}', '{}', {}) appears in more than one map.",
                        key.region, key.molecular_type, key.synapse_class));
                }
                if key.synapse_class != self.synapse_class {
                    continue;
                }

                for (mtype, &p) in map.mtypes().iter().zip(probabilities) {
                    if p <= 0.0 {
                        continue;
                    }
                    if !contributions.contains_key(mtype) {
                        mtypes.push(mtype.clone());
                    }
                    contributions.entry(mtype.clone())
                        .or_insert_with(Vec::new)
                        .push(Contribution {
                            region: key.region.clone(),
                            molecular_type: key.molecular_type.clone(),
                            probability: p,
                        });
                }
            }
        }

        if mtypes.is_empty() {
            return CmnError::err(format!("No probability-map row of class \
                {} assigns a positive probability to any mtype.",
                self.synapse_class));
        }

        for (mtype, rows) in contributions.iter() {
            if rows.len() > 1 {
                debug!("ProbabilityMapBasedAllocator: mtype '{}' \
                    accumulates {} row contributions; overlapping marker \
                    populations are summed without renormalization.",
                    mtype, rows.len());
            }
        }

        Ok((mtypes, contributions))
    }

    // Maps every row-region acronym to the voxels resolving to it: a
    // voxel belongs to the row region matched by its own region or by
    // the nearest ancestor with rows. Uncovered regions contribute
    // nothing.
    fn resolve_regions(&self, row_regions: &HashSet<&str>)
            -> HashMap<String, Vec<usize>> {
        let mut by_region_id: HashMap<u32, Option<String>> = HashMap::new();
        let mut region_voxels: HashMap<String, Vec<usize>> = HashMap::new();
        let mut uncovered = 0usize;

        for (vx, &region_id) in self.annotation.data().iter().enumerate() {
            let resolved = by_region_id.entry(region_id).or_insert_with(|| {
                self.hierarchy
                    .ascend_until(region_id, |node| {
                        row_regions.contains(node.acronym.as_str())
                    })
                    .map(|node| node.acronym.clone())
            });

            match *resolved {
                Some(ref acronym) => {
                    region_voxels.entry(acronym.clone())
                        .or_insert_with(Vec::new)
                        .push(vx);
                },
                None => uncovered += 1,
            }
        }

        if uncovered > 0 {
            warn!("ProbabilityMapBasedAllocator: {} voxels belong to \
                regions with no probability-map row (including ancestors) \
                and will receive zero density.", uncovered);
        }

        region_voxels
    }
}

// Computes the partial fields of one partition: every mtype's field is
// the sum of its contributions, `p` times the marker density over the
// row region's voxels.
fn compute_partition(shared: &SharedInputs,
        work: Vec<(String, Vec<Contribution>)>)
        -> CmnResult<Vec<(String, Vec<f32>)>> {
    let mut results = Vec::with_capacity(work.len());

    for (mtype, rows) in work {
        let mut data = vec![0.0f32; shared.voxel_count];

        for contribution in rows {
            let marker = shared.markers.get(&contribution.molecular_type)
                .ok_or_else(|| CmnError::new(format!("Worker: marker \
                    density '{}' vanished from the shared inputs.",
                    contribution.molecular_type)))?;

            let voxels = match shared.region_voxels.get(&contribution.region) {
                Some(voxels) => voxels,
                // The row's region annotates no voxel; zero contribution.
                None => continue,
            };

            for &vx in voxels {
                data[vx] += contribution.probability * marker[vx];
            }
        }

        results.push((mtype, data));
    }

    Ok(results)
}

// Partition length giving at most `parts` contiguous chunks.
fn partition_len(total: usize, parts: usize) -> usize {
    let parts = parts.max(1).min(total.max(1));
    (total + parts - 1) / parts
}
