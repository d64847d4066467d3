//! End-to-end ranking run: read table, measure, rank, write

use std::path::PathBuf;

use log::info;

use crate::core::batch::{ChunkSize, ProgressCallback};
use crate::core::engine::{DistanceEngine, EndpointPair};
use crate::core::error::Result;
use crate::core::ranking::rank;
use crate::core::service::DistanceService;
use crate::core::table::{sorted_output_path, AddressTable};

/// Settings for one ranking run
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Start and end of the base route
    pub endpoints: EndpointPair,

    /// Addresses per distance-matrix call
    pub chunk_size: ChunkSize,

    /// CSV file with an `address` column
    pub input_path: PathBuf,
}

impl RankConfig {
    pub fn new(
        start_address: impl Into<String>,
        end_address: impl Into<String>,
        input_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            endpoints: EndpointPair::new(start_address, end_address),
            chunk_size: ChunkSize::default(),
            input_path: input_path.into(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Where the ranked table is written
    pub fn output_path(&self) -> PathBuf {
        sorted_output_path(&self.input_path)
    }
}

/// Optional hooks for a ranking run
#[derive(Default)]
pub struct RankOptions {
    /// Called with `(chunks_done, chunks_total)` after every service call
    pub progress: Option<ProgressCallback>,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RankSummary {
    pub output_path: PathBuf,

    /// Rows written
    pub rows: usize,

    /// Rows written without a combined distance
    pub unranked: usize,
}

/// Rank the addresses in `config.input_path` and write `<stem>_sorted.<ext>`.
///
/// Input problems fail before the service is called. Transport errors from
/// `service` abort the run; service-reported failures only leave gaps.
pub async fn rank_file<S: DistanceService>(
    config: &RankConfig,
    service: S,
    options: RankOptions,
) -> Result<RankSummary> {
    let table = AddressTable::read_csv(&config.input_path)?;
    let addresses = table.addresses()?;

    let mut engine = DistanceEngine::new(service, config.endpoints.clone(), config.chunk_size);
    if let Some(progress) = options.progress {
        engine = engine.with_progress(progress);
    }

    let distances = engine.compute_distances(&addresses).await?;
    let ranked = rank(&table, &distances)?;

    let output_path = config.output_path();
    ranked.write_csv(&output_path)?;
    info!("Wrote {} ranked rows to {}", ranked.len(), output_path.display());

    Ok(RankSummary {
        output_path,
        rows: ranked.len(),
        unranked: ranked.unranked_count(),
    })
}
