use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::{processor::StreamProcessor, space::RealPoint};

/// One live cluster, as exposed to callers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub id: u64,
    pub prototype: RealPoint,
    /// dispersion, or distance to the nearest other prototype for singletons
    pub radius: f64,
    pub n: u64,
    pub m: f64,
    pub ssd: f64,
    pub cf: RealPoint,
}

/// The live clusters at some logical time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub clock: u64,
    pub clusters: Vec<SnapshotRow>,
}

impl From<&StreamProcessor> for Snapshot {
    fn from(processor: &StreamProcessor) -> Self {
        let clusters = processor
            .regions()
            .into_iter()
            .zip(processor.clusters())
            .map(|(region, (id, c))| SnapshotRow {
                id: id.value(),
                prototype: region.prototype,
                radius: region.radius,
                n: c.n(),
                m: c.m(),
                ssd: c.ssd(),
                cf: c.cf().clone(),
            })
            .collect();
        Snapshot {
            clock: processor.clock(),
            clusters,
        }
    }
}

/// Tab separated table, one row per cluster.
impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "id\tprototype\tradius\tN\tM\tSSD\tCF")?;
        for row in &self.clusters {
            writeln!(
                f,
                "{}\t{:?}\t{}\t{}\t{}\t{}\t{:?}",
                row.id, row.prototype, row.radius, row.n, row.m, row.ssd, row.cf
            )?;
        }
        Ok(())
    }
}
