use platescope_core::wells::{well_label, WellLabels};
use platescope_core::CoreError;
use protocol::WellRecord;

#[test]
fn spot_labels_match_convention() {
    assert_eq!(well_label(0, 0).expect("label"), "A01");
    assert_eq!(well_label(25, 0).expect("label"), "Z01");
    assert_eq!(well_label(0, 11).expect("label"), "A12");
}

#[test]
fn labels_are_total_over_plate_geometry() {
    for row in 0..26u32 {
        for column in 0..99u32 {
            let label = well_label(row, column).expect("label");
            let letter = (b'A' + row as u8) as char;
            assert!(label.starts_with(letter));
            assert_eq!(label[1..].parse::<u32>().expect("number"), column + 1);
            assert!(label.len() >= 3);
        }
    }
}

#[test]
fn row_beyond_z_is_rejected() {
    assert!(matches!(
        well_label(26, 0),
        Err(CoreError::InvalidWellRow { row: 26 })
    ));
}

#[test]
fn label_map_covers_every_well() {
    let wells = vec![
        WellRecord {
            id: 10,
            row: 0,
            column: 0,
        },
        WellRecord {
            id: 11,
            row: 1,
            column: 1,
        },
    ];
    let labels = WellLabels::from_wells(&wells).expect("labels");
    assert_eq!(labels.len(), 2);
    assert_eq!(labels.get(10).expect("label"), "A01");
    assert_eq!(labels.get(11).expect("label"), "B02");
}

#[test]
fn unknown_well_id_fails_lookup() {
    let labels = WellLabels::from_wells(&[]).expect("labels");
    assert!(matches!(
        labels.get(42),
        Err(CoreError::MissingWellLabel { well: 42 })
    ));
}
