use std::error::Error;

use clap::Parser;
use fuzz_stream::{
    config::Config,
    processor::StreamProcessor,
    service::service,
    snapshot::Snapshot,
    streamer::{self, Streamer},
};
use tracing_subscriber::EnvFilter;

/// Summarizes a stream of points read as JSON lines with fuzzy micro-clusters.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Clusters created unconditionally before outlier detection starts
    #[clap(long, default_value_t = 5)]
    min_fc: usize,
    /// Maximum number of live clusters
    #[clap(long, default_value_t = 200)]
    max_fc: usize,
    /// Similarity above which two clusters are merged
    #[clap(long, default_value_t = 1.)]
    threshold: f64,
    /// Fuzziness of membership assignment, greater than 1
    #[clap(long, default_value_t = 2.)]
    fuzziness: f64,
    /// Count creations, evictions, absorptions and merges, and report purity at the end
    #[clap(long)]
    instrument: bool,
    /// Print only the final snapshot, as a table
    #[clap(long)]
    summary: bool,
    /// Serve websockets instead of reading standard input
    #[clap(long)]
    service: bool,
    /// Websocket server address
    #[clap(long, default_value = "127.0.0.1:9001")]
    address: String,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            min_fc: self.min_fc,
            max_fc: self.max_fc,
            threshold: self.threshold,
            fuzziness: self.fuzziness,
            instrument: self.instrument,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let mut processor = StreamProcessor::new(args.config())?;
    // counters and purity are reported through tracing when the stream ends
    if args.service {
        let (records, write) = service(&args.address);
        Streamer::run(Streamer::new(records, write), &mut processor)?;
    } else if args.summary {
        let (records, _) = streamer::stdio();
        let write = |_: String| -> Result<(), Box<dyn Error>> { Ok(()) };
        Streamer::run(Streamer::new(records, write), &mut processor)?;
        print!("{}", Snapshot::from(&processor));
    } else {
        let (records, write) = streamer::stdio();
        Streamer::run(Streamer::new(records, write), &mut processor)?;
    }
    Ok(())
}
