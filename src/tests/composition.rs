//! Taxonomy validation, composition ratios, and the composition-based
//! allocator.

use alloc::CompositionBasedAllocator;
use scheme::{CompositionEntry, CompositionScheme, CompositionRatios,
    TaxonomyScheme, TaxonomyTable};
use super::testbed;

fn taxonomy_table(records: Vec<Vec<&str>>) -> TaxonomyTable {
    TaxonomyTable::new(
        vec!["mtype".to_string(), "mClass".to_string(), "sClass".to_string()],
        records.into_iter()
            .map(|r| r.into_iter().map(|v| v.to_string()).collect())
            .collect(),
    )
}

fn define_taxonomy() -> TaxonomyScheme {
    TaxonomyScheme::new(&taxonomy_table(vec![
        vec!["TPC", "PYR", "EXC"],
        vec!["UPC", "PYR", "EXC"],
        vec!["CHC", "INT", "INH"],
    ])).unwrap()
}

fn define_composition() -> CompositionScheme {
    CompositionScheme::new(vec![
        CompositionEntry::new(30.0, "layer_2", "TPC"),
        CompositionEntry::new(10.0, "layer_2", "UPC"),
        CompositionEntry::new(5.0, "layer_2", "CHC"),
    ]).unwrap()
}

#[test]
fn ratios_sum_to_one_per_layer() {
    let ratios = CompositionRatios::new(&define_taxonomy(),
        &define_composition()).unwrap();

    // Inhibitory entries are outside the composition path.
    assert_eq!(ratios.mtypes().to_vec(), vec!["TPC".to_string(), "UPC".to_string()]);

    let sum: f32 = ratios.mtypes().iter()
        .map(|m| ratios.ratio(m).unwrap().1)
        .sum();
    assert!((sum - 1.0).abs() < 1.0e-5);
    assert!((ratios.ratio("TPC").unwrap().1 - 0.75).abs() < 1.0e-5);
}

#[test]
fn single_mtype_with_ratio_one_reproduces_the_total() {
    testbed::init_logging();
    let taxonomy = TaxonomyScheme::new(&taxonomy_table(vec![
        vec!["TPC", "PYR", "EXC"],
        vec!["CHC", "INT", "INH"],
    ])).unwrap();
    let composition = CompositionScheme::new(vec![
        CompositionEntry::new(12.5, "layer_2", "TPC"),
        CompositionEntry::new(3.0, "layer_2", "CHC"),
    ]).unwrap();
    let ratios = CompositionRatios::new(&taxonomy, &composition).unwrap();

    let layer_map = testbed::define_layer_map();
    let excitatory = testbed::seeded_field(23);
    let allocator = CompositionBasedAllocator::new(&layer_map, &ratios);
    let output = allocator.allocate(&excitatory).unwrap();

    assert_eq!(output.len(), 1);
    let tpc = output.by_mtype("TPC").unwrap().data();
    let layer_2 = layer_map.layer_id("layer_2").unwrap();

    for (vx, &layer) in layer_map.voxel_layers().iter().enumerate() {
        if layer == Some(layer_2) {
            // Ratio 1.0: bit-identical to the input on the layer mask.
            assert_eq!(tpc[vx], excitatory.data()[vx]);
        } else {
            assert_eq!(tpc[vx], 0.0);
        }
    }
}

#[test]
fn taxonomy_missing_the_sclass_column_is_fatal() {
    let table = TaxonomyTable::new(
        vec!["mtype".to_string(), "mClass".to_string()],
        vec![vec!["TPC".to_string(), "PYR".to_string()]],
    );
    assert!(TaxonomyScheme::new(&table).is_err());
}

#[test]
fn taxonomy_with_unknown_sclass_values_is_fatal() {
    assert!(TaxonomyScheme::new(&taxonomy_table(vec![
        vec!["TPC", "PYR", "EXCITATORY"],
        vec!["CHC", "INT", "INH"],
    ])).is_err());
}

#[test]
fn taxonomy_with_a_single_sclass_is_fatal() {
    assert!(TaxonomyScheme::new(&taxonomy_table(vec![
        vec!["TPC", "PYR", "EXC"],
        vec!["UPC", "PYR", "EXC"],
    ])).is_err());
}

#[test]
fn negative_composition_density_is_fatal() {
    assert!(CompositionScheme::new(vec![
        CompositionEntry::new(-4.0, "layer_2", "TPC"),
    ]).is_err());
}

#[test]
fn mtype_set_mismatch_is_fatal() {
    let taxonomy = TaxonomyScheme::new(&taxonomy_table(vec![
        vec!["A", "PYR", "EXC"],
        vec!["B", "INT", "INH"],
    ])).unwrap();
    let composition = CompositionScheme::new(vec![
        CompositionEntry::new(1.0, "layer_2", "A"),
        CompositionEntry::new(2.0, "layer_2", "C"),
    ]).unwrap();

    let err = CompositionRatios::new(&taxonomy, &composition).unwrap_err();
    let message = format!("{}", err);
    assert!(message.contains("\"B\""));
    assert!(message.contains("\"C\""));
}

#[test]
fn zero_layer_total_is_fatal() {
    let taxonomy = TaxonomyScheme::new(&taxonomy_table(vec![
        vec!["TPC", "PYR", "EXC"],
        vec!["CHC", "INT", "INH"],
    ])).unwrap();
    let composition = CompositionScheme::new(vec![
        CompositionEntry::new(0.0, "layer_2", "TPC"),
        CompositionEntry::new(3.0, "layer_2", "CHC"),
    ]).unwrap();

    assert!(CompositionRatios::new(&taxonomy, &composition).is_err());
}

#[test]
fn all_zero_excitatory_field_is_fatal() {
    let ratios = CompositionRatios::new(&define_taxonomy(),
        &define_composition()).unwrap();
    let layer_map = testbed::define_layer_map();
    let zeros = testbed::uniform_field(0.0);

    let allocator = CompositionBasedAllocator::new(&layer_map, &ratios);
    assert!(allocator.allocate(&zeros).is_err());
}

#[test]
fn unresolvable_composition_layer_is_fatal() {
    let taxonomy = TaxonomyScheme::new(&taxonomy_table(vec![
        vec!["TPC", "PYR", "EXC"],
        vec!["CHC", "INT", "INH"],
    ])).unwrap();
    let composition = CompositionScheme::new(vec![
        CompositionEntry::new(5.0, "layer_9", "TPC"),
        CompositionEntry::new(3.0, "layer_9", "CHC"),
    ]).unwrap();
    let ratios = CompositionRatios::new(&taxonomy, &composition).unwrap();

    let layer_map = testbed::define_layer_map();
    let excitatory = testbed::uniform_field(1.0);
    let allocator = CompositionBasedAllocator::new(&layer_map, &ratios);
    assert!(allocator.allocate(&excitatory).is_err());
}
