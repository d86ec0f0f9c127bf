use std::{
    error::Error,
    io,
    sync::mpsc::{Receiver, Sender},
};

use tracing::{debug, warn};

use crate::{
    processor::{Counters, StreamProcessor},
    record::Record,
    snapshot::Snapshot,
};

/// Reads records line by line, feeds them to a processor and writes back a snapshot per record.
pub struct Streamer<In, Out> {
    records: In,
    write: Out,
}

impl<In, Out, Err> Streamer<In, Out>
where
    In: Iterator<Item = Result<String, Err>>,
    Out: FnMut(String) -> Result<(), Box<dyn Error>>,
    Err: Into<Box<dyn Error>>,
{
    pub fn new(records: In, write: Out) -> Self {
        Self { records, write }
    }

    /// Consumes the whole input. Blank lines are skipped, and so are records the processor
    /// rejects. Read, parse and write failures end the stream.
    ///
    /// When the processor is instrumented, records are retained so that purity can be computed
    /// at the end of the stream, and the final counters are returned.
    pub fn run(
        mut streamer: Streamer<In, Out>,
        processor: &mut StreamProcessor,
    ) -> Result<Option<Counters>, Box<dyn Error>> {
        let keep = processor.counters().is_some();
        let mut history = vec![];
        for input in streamer.records {
            let line = input.map_err(|e| -> Box<dyn Error> { e.into() })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(&line)?;
            let step = match processor.step(&record.point) {
                Ok(step) => step,
                Err(reason) => {
                    warn!(%reason, clock = processor.clock(), "record rejected");
                    continue;
                }
            };
            debug!(?step, "record processed");
            let output = serde_json::to_string(&Snapshot::from(&*processor))?;
            (streamer.write)(output)?;
            if keep {
                history.push(record);
            }
        }
        Ok(processor.finish(&history).cloned())
    }
}

/// Standard input records and standard output snapshots.
pub fn stdio() -> (
    impl Iterator<Item = Result<String, io::Error>>,
    impl FnMut(String) -> Result<(), Box<dyn Error>>,
) {
    let records = io::stdin().lines();
    let write = |snapshot: String| -> Result<(), Box<dyn Error>> {
        println!("{}", snapshot);
        Ok(())
    };
    (records, write)
}

/// Channel records and channel snapshots.
pub fn channels(
    records: Receiver<String>,
    snapshots: Sender<String>,
) -> (
    impl Iterator<Item = Result<String, Box<dyn Error>>>,
    impl FnMut(String) -> Result<(), Box<dyn Error>>,
) {
    let records = records
        .into_iter()
        .map(|r| -> Result<String, Box<dyn Error>> { Ok(r) });
    let write = move |snapshot: String| -> Result<(), Box<dyn Error>> {
        snapshots.send(snapshot)?;
        Ok(())
    };
    (records, write)
}
