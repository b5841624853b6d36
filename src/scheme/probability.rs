//! Marker probability maps: P(mtype | region, molecular type, synapse
//! class).

use cmn::{self, CmnError, CmnResult, MapStore, MapStoreIter};
use scheme::SynapseClass;

/// One decoded probability-map row: for cells of `synapse_class` in
/// `region` expressing `molecular_type`, the probability of each mtype
/// column.
#[derive(Debug, Clone)]
pub struct ProbabilityMapRow {
    pub region: String,
    pub molecular_type: String,
    pub synapse_class: SynapseClass,
    /// One probability per mtype column of the owning map.
    pub probabilities: Vec<f32>,
}

impl ProbabilityMapRow {
    pub fn new<R, M>(region: R, molecular_type: M, synapse_class: SynapseClass,
            probabilities: Vec<f32>) -> ProbabilityMapRow
            where R: Into<String>, M: Into<String> {
        ProbabilityMapRow {
            region: region.into(),
            molecular_type: molecular_type.into(),
            synapse_class,
            probabilities,
        }
    }
}

/// Composite row key: (region acronym, molecular type, synapse class).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub region: String,
    pub molecular_type: String,
    pub synapse_class: SynapseClass,
}

/// A validated probability map.
///
/// Construction enforces: every row carries one probability per mtype
/// column; probabilities lie in `[0, 1]`; each row's probabilities sum to
/// at most 1 (within tolerance) since a cell may belong to none of the
/// listed mtypes; and row keys are unique (duplicates fail fast rather
/// than silently overwriting).
#[derive(Debug, Clone)]
pub struct ProbabilityMap {
    mtypes: Vec<String>,
    rows: MapStore<RowKey, Vec<f32>>,
}

impl ProbabilityMap {
    pub fn new(mtypes: Vec<String>, rows: Vec<ProbabilityMapRow>)
            -> CmnResult<ProbabilityMap> {
        if mtypes.is_empty() {
            return CmnError::err("ProbabilityMap::new: no mtype columns.");
        }
        {
            let mut sorted = mtypes.clone();
            sorted.sort();
            sorted.dedup();
            if sorted.len() != mtypes.len() {
                return CmnError::err("ProbabilityMap::new: duplicate \
                    mtype columns.");
            }
        }

        let mut row_store = MapStore::with_capacity(rows.len());

        for row in rows {
            if row.probabilities.len() != mtypes.len() {
                return CmnError::err(format!("Probability-map row \
                    ('{}', '{}', {}) has {} probabilities for {} mtype \
                    columns.", row.region, row.molecular_type,
                    row.synapse_class, row.probabilities.len(), mtypes.len()));
            }
            if row.probabilities.iter().any(|&p| p < 0.0 || p > 1.0) {
                return CmnError::err(format!("Probability-map row \
                    ('{}', '{}', {}) contains probabilities outside \
                    [0, 1].", row.region, row.molecular_type,
                    row.synapse_class));
            }
            let sum: f32 = row.probabilities.iter().sum();
            if sum > 1.0 + cmn::WEIGHT_SUM_TOLERANCE {
                return CmnError::err(format!("Probability-map row \
                    ('{}', '{}', {}) probabilities sum to {} (expected \
                    at most 1).", row.region, row.molecular_type,
                    row.synapse_class, sum));
            }

            let key = RowKey {
                region: row.region,
                molecular_type: row.molecular_type,
                synapse_class: row.synapse_class,
            };
            if row_store.insert(key.clone(), row.probabilities).is_some() {
                return CmnError::err(format!("Duplicate probability-map \
                    row key: ('{}', '{}', {}).", key.region,
                    key.molecular_type, key.synapse_class));
            }
        }

        Ok(ProbabilityMap { mtypes, rows: row_store })
    }

    /// Mtype columns, in table order.
    pub fn mtypes(&self) -> &[String] {
        &self.mtypes
    }

    /// `(key, probabilities)` pairs in table order.
    pub fn rows(&self) -> MapStoreIter<RowKey, Vec<f32>> {
        self.rows.iter()
    }

    pub fn row(&self, key: &RowKey) -> Option<&[f32]> {
        self.rows.by_key(key).map(|p| p.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
