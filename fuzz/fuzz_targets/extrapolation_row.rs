#![no_main]

use arbitrary::Arbitrary;
use gbs_integrate::ExtrapolationTable;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct RowsInput {
    dimension: u8,
    values: Vec<f64>,
}

fuzz_target!(|input: RowsInput| {
    let dimension = usize::from(input.dimension % 8) + 1;
    let mut table = ExtrapolationTable::with_capacity(12);
    for raw in input.values.chunks_exact(dimension).take(12) {
        let _ = table.push_row(raw.to_vec());
        let n = table.rows();
        assert_eq!(table.row(n).map(<[Vec<f64>]>::len), Some(n));
        assert_eq!(table.best().map(<[f64]>::len), Some(dimension));
    }
});
