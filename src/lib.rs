//! Online summarization of an unbounded stream of points with fuzzy micro-clusters.
//!
//! A [`processor::StreamProcessor`] ingests points one at a time and maintains a bounded set of
//! [`cluster::MicroCluster`]s, each holding the sufficient statistics of a dense region of the stream.
//! ```
//! use fuzz_stream::{config::Config, processor::StreamProcessor, snapshot::Snapshot};
//!
//! let mut processor = StreamProcessor::new(Config { min_fc: 2, ..Config::default() }).unwrap();
//! for p in [[0., 0.], [10., 0.], [1., 0.]] {
//!     processor.step(&p).unwrap();
//! }
//! let snapshot = Snapshot::from(&processor);
//! assert_eq!(2, snapshot.clusters.len());
//! assert!(snapshot.clusters.iter().all(|c| c.n == 2));
//! ```

pub mod space;
pub mod cluster;
pub mod membership;
pub mod processor;
pub mod purity;
pub mod snapshot;
pub mod record;
pub mod config;
pub mod error;
pub mod streamer;
pub mod service;
