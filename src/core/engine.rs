//! Batched distance queries against a fixed pair of route endpoints
//!
//! The engine measures every candidate address against the route's start and
//! end. Candidates are sent in chunks, one service call per chunk, and the
//! chunk results are stitched into an N×2 matrix whose rows follow the input
//! order. Service-side failures degrade to missing cells; only transport
//! errors abort the run.

use log::{info, warn};

use crate::core::batch::{chunk_count, run_batched, ChunkSize, ProgressCallback, StackColumns};
use crate::core::error::{Error, Result};
use crate::core::matrix::DistanceMatrix;
use crate::core::service::DistanceService;

/// Column of the result matrix holding distances from the route start
pub const START_COLUMN: usize = 0;

/// Column of the result matrix holding distances from the route end
pub const END_COLUMN: usize = 1;

/// The fixed start and end of the base route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPair {
    pub start: String,
    pub end: String,
}

impl EndpointPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Origins for a distance-matrix request, start first
    pub fn as_origins(&self) -> [String; 2] {
        [self.start.clone(), self.end.clone()]
    }
}

/// Computes start/end distances for lists of candidate addresses
pub struct DistanceEngine<S> {
    service: S,
    endpoints: EndpointPair,
    chunk_size: ChunkSize,
    progress: Option<ProgressCallback>,
}

impl<S: DistanceService> DistanceEngine<S> {
    pub fn new(service: S, endpoints: EndpointPair, chunk_size: ChunkSize) -> Self {
        Self {
            service,
            endpoints,
            chunk_size,
            progress: None,
        }
    }

    /// Report `(chunks_done, chunks_total)` after every chunk
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Distances from the route start and end to every address.
    ///
    /// Returns an N×2 matrix: row `i` is `addresses[i]`, column
    /// [`START_COLUMN`] the distance from the start, column [`END_COLUMN`]
    /// from the end. Makes exactly `ceil(N / chunk_size)` service calls.
    pub async fn compute_distances(&self, addresses: &[String]) -> Result<DistanceMatrix> {
        if addresses.is_empty() {
            return Err(Error::Configuration("address list is empty".to_string()));
        }

        info!(
            "Measuring {} addresses in {} chunks of up to {}",
            addresses.len(),
            chunk_count(addresses.len(), self.chunk_size),
            self.chunk_size.get()
        );

        let by_endpoint = run_batched(
            addresses,
            self.chunk_size,
            &StackColumns,
            self.progress.as_ref(),
            |chunk| self.query_chunk(chunk),
        )
        .await?;

        let distances = by_endpoint.transpose();
        let missing = distances.missing_count();
        if missing > 0 {
            warn!(
                "{missing} of {} distances could not be determined",
                distances.nrows() * distances.ncols()
            );
        } else {
            info!("All {} distances resolved", distances.nrows() * distances.ncols());
        }

        Ok(distances)
    }

    /// One service call: a 2×K block, rows are endpoints, columns the chunk's addresses
    async fn query_chunk(&self, chunk: &[String]) -> Result<DistanceMatrix> {
        let origins = self.endpoints.as_origins();
        let mut block = DistanceMatrix::missing(origins.len(), chunk.len());

        let reply = self.service.query(&origins, chunk).await?;

        if !reply.is_ok() {
            warn!(
                "Distance matrix call failed with status {}{}; {} addresses left without distances",
                reply.status().unwrap_or("<none>"),
                reply
                    .error_message()
                    .map(|m| format!(" ({m})"))
                    .unwrap_or_default(),
                chunk.len()
            );
            return Ok(block);
        }

        if reply.contradicts_shape(origins.len(), chunk.len()) {
            warn!(
                "Distance matrix reply does not match the {}x{} request; {} addresses left without distances",
                origins.len(),
                chunk.len(),
                chunk.len()
            );
            return Ok(block);
        }

        for (i, origin) in origins.iter().enumerate() {
            for (j, destination) in chunk.iter().enumerate() {
                match reply.distance(i, j) {
                    Some(meters) => block.set(i, j, Some(meters)),
                    None => warn!("Could not find distance between `{origin}` and `{destination}`"),
                }
            }
        }

        Ok(block)
    }
}
