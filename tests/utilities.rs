use std::error::Error;

use approx_eq::assert_approx_eq;
use fuzz_stream::{record::Record, snapshot::SnapshotRow};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use regex::Regex;
use serde_json::json;

#[allow(unused)]
pub(crate) const OUT_PATTERN: &str = r#"^\{"clock":[0-9]+,"clusters":\[(\{"id":[0-9]+,"prototype":\[[-+0-9.e]*,[-+0-9.e]*\],"radius":(null|[-+0-9.e]*),"n":[0-9]+,"m":[-+0-9.e]*,"ssd":[-+0-9.e]*,"cf":\[[-+0-9.e]*,[-+0-9.e]*\]\},?)*\]\}$"#;

/// Centers of the three gaussian blobs the sample stream is drawn from.
#[allow(unused)]
pub(crate) const CENTERS: [(f64, f64, &str); 3] = [(0., 0., "a"), (40., 0., "b"), (0., 40., "c")];

#[allow(unused)]
pub(crate) fn assert_results(result: &[String]) {
    let re = Regex::new(OUT_PATTERN).unwrap();
    assert!(result.iter().all(|r| re.is_match(r)));
}

/// Checks the sufficient statistics invariants of a snapshot row.
#[allow(unused)]
pub(crate) fn assert_row(row: &SnapshotRow) {
    assert!(row.n >= 1);
    assert!(row.m > 0.);
    assert!(row.ssd >= 0.);
    assert!(row.ssd.is_finite());
    for (x, cf) in row.prototype.iter().zip(&row.cf) {
        assert!(x.is_finite());
        if *cf != 0. {
            assert_approx_eq!(*x, cf / row.m, 1E-9);
        }
    }
}

/// A labeled stream drawn from three well separated gaussian blobs, in a fixed order.
#[allow(unused)]
pub fn get_records(count: usize) -> Vec<Record> {
    let normal = Normal::new(0.0, 1.5).unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(9787043385113690);
    (0..count)
        .map(|i| {
            let (x, y, label) = CENTERS[i % CENTERS.len()];
            let point = vec![x + normal.sample(&mut rng), y + normal.sample(&mut rng)];
            Record::new(point, label)
        })
        .collect()
}

#[allow(unused)]
pub fn get_record_iter(count: usize) -> impl Iterator<Item = Result<String, Box<dyn Error>>> {
    get_records(count)
        .into_iter()
        .map(|r| -> Result<String, Box<dyn Error>> {
            Ok(json!({"point": r.point, "label": r.label}).to_string())
        })
}
