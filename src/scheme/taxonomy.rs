//! The mtype taxonomy: morphological class and synapse class per mtype.

use std::collections::HashSet;
use std::fmt;

use cmn::{CmnError, CmnResult, MapStore};

/// Excitatory or inhibitory classification of an mtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynapseClass {
    Exc,
    Inh,
}

impl SynapseClass {
    pub fn parse(s: &str) -> CmnResult<SynapseClass> {
        match s {
            "EXC" => Ok(SynapseClass::Exc),
            "INH" => Ok(SynapseClass::Inh),
            _ => CmnError::err(format!("Unknown synapse class: '{}' \
                (expected 'EXC' or 'INH').", s)),
        }
    }
}

impl fmt::Display for SynapseClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SynapseClass::Exc => f.write_str("EXC"),
            SynapseClass::Inh => f.write_str("INH"),
        }
    }
}

/// The column set a decoded taxonomy table must carry, in no particular
/// order.
pub const TAXONOMY_COLUMNS: [&'static str; 3] = ["mtype", "mClass", "sClass"];

/// A decoded-but-unvalidated taxonomy table: named columns and string
/// records, exactly as the (external) table reader produced them.
#[derive(Debug, Clone)]
pub struct TaxonomyTable {
    pub columns: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl TaxonomyTable {
    pub fn new(columns: Vec<String>, records: Vec<Vec<String>>) -> TaxonomyTable {
        TaxonomyTable { columns, records }
    }
}

#[derive(Debug, Clone)]
struct TaxonomyEntry {
    m_class: String,
    s_class: SynapseClass,
}

/// A validated taxonomy: mtype -> (morphological class, synapse class).
///
/// Construction checks that the column set is exactly
/// [`TAXONOMY_COLUMNS`], that every sClass value parses, that both
/// synapse classes are represented, and that no mtype repeats.
#[derive(Debug, Clone)]
pub struct TaxonomyScheme {
    entries: MapStore<String, TaxonomyEntry>,
}

impl TaxonomyScheme {
    pub fn new(table: &TaxonomyTable) -> CmnResult<TaxonomyScheme> {
        let expected: HashSet<&str> = TAXONOMY_COLUMNS.iter().cloned().collect();
        let found: HashSet<&str> = table.columns.iter().map(|c| c.as_str()).collect();

        if expected != found {
            return CmnError::err(format!("Taxonomy column mismatch. \
                Expected: {:?}. Found: {:?}.", TAXONOMY_COLUMNS,
                table.columns));
        }

        // Column presence was just verified against the expected set.
        let col = |name: &str| {
            table.columns.iter().position(|c| c == name)
                .expect("TaxonomyScheme::new: column lookup")
        };
        let (mtype_col, m_class_col, s_class_col) =
            (col("mtype"), col("mClass"), col("sClass"));

        let mut entries = MapStore::with_capacity(table.records.len());
        let mut seen_classes = HashSet::new();

        for (i, record) in table.records.iter().enumerate() {
            if record.len() != table.columns.len() {
                return CmnError::err(format!("Taxonomy record {} has {} \
                    values for {} columns.", i, record.len(),
                    table.columns.len()));
            }

            let mtype = record[mtype_col].clone();
            let s_class = SynapseClass::parse(&record[s_class_col])
                .map_err(|err| err.prepend(format!("Taxonomy record {}: ", i)))?;
            seen_classes.insert(s_class);

            let entry = TaxonomyEntry {
                m_class: record[m_class_col].clone(),
                s_class,
            };
            if entries.insert(mtype.clone(), entry).is_some() {
                return CmnError::err(format!("Taxonomy lists mtype '{}' \
                    more than once.", mtype));
            }
        }

        if seen_classes.len() < 2 {
            return CmnError::err(format!("Taxonomy sClass values are \
                different than expected. Expected: {{EXC, INH}}. Found: \
                {:?}.", seen_classes.iter().map(|c| c.to_string())
                    .collect::<Vec<_>>()));
        }

        Ok(TaxonomyScheme { entries })
    }

    /// Mtypes in table order.
    pub fn mtypes(&self) -> &[String] {
        self.entries.keys()
    }

    pub fn synapse_class(&self, mtype: &str) -> Option<SynapseClass> {
        self.entries.by_key(&mtype.to_string()).map(|e| e.s_class)
    }

    pub fn morph_class(&self, mtype: &str) -> Option<&str> {
        self.entries.by_key(&mtype.to_string()).map(|e| e.m_class.as_str())
    }

    /// Mtypes of `class`, in table order.
    pub fn mtypes_of_class(&self, class: SynapseClass) -> Vec<&str> {
        self.entries.iter()
            .filter(|&(_, e)| e.s_class == class)
            .map(|(m, _)| m.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
