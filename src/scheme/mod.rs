//! Declarative weight tables: taxonomy, density profiles, composition
//! ratios, and marker probability maps. Each table enforces its own
//! normalization invariant at construction.

pub use self::taxonomy::{SynapseClass, TaxonomyTable, TaxonomyScheme,
    TAXONOMY_COLUMNS};
pub use self::profile::{DensityProfileEntry, RelativeDensityProfiles};
pub use self::composition::{CompositionEntry, CompositionScheme,
    CompositionRatios};
pub use self::probability::{ProbabilityMap, ProbabilityMapRow, RowKey};

mod taxonomy;
mod profile;
mod composition;
mod probability;
