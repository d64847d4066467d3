//! # Detour-rank
//!
//! Ranks candidate addresses by the detour they add to a fixed start→end
//! route, using a road distance-matrix service.
//!
//! Candidates are measured in chunks of [`ChunkSize`] addresses, one service
//! call per chunk, and results are stitched back in input order. Failed
//! chunks and unreadable cells become missing distances instead of errors.
//!
//! ```no_run
//! use detour_rank::{rank_file, GoogleMapsClient, RankConfig, RankOptions, ServiceConfig};
//!
//! # async fn run() -> detour_rank::Result<()> {
//! let config = RankConfig::new("Start St 1", "End Ave 9", "stops.csv");
//! let client = GoogleMapsClient::new(ServiceConfig::from_env())?;
//! let summary = rank_file(&config, client, RankOptions::default()).await?;
//! println!("{}", summary.output_path.display());
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::batch::{
    chunk_count, chunk_ranges, run_batched, ChunkSize, Concat, ProgressCallback, Reassembly,
    StackColumns, DEFAULT_CHUNK_SIZE,
};
pub use crate::core::engine::{DistanceEngine, EndpointPair, END_COLUMN, START_COLUMN};
pub use crate::core::error::{Error, Result};
pub use crate::core::matrix::{Distance, DistanceMatrix};
pub use crate::core::pipeline::{rank_file, RankConfig, RankOptions, RankSummary};
pub use crate::core::ranking::{
    rank, RankedRow, RankedTable, COMBINED_DISTANCE, DISTANCE_FROM_END, DISTANCE_FROM_START,
};
pub use crate::core::service::{
    DistanceMatrixReply, DistanceService, GoogleMapsClient, ServiceConfig, API_KEY_ENV,
};
pub use crate::core::table::{sorted_output_path, AddressTable, ADDRESS_COLUMN};
