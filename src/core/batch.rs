//! Chunked execution of list-to-list operations
//!
//! [`run_batched`] splits its input into contiguous chunks, awaits the
//! per-chunk call for each one in order, and hands the chunk results to an
//! explicit [`Reassembly`] strategy that stitches them back together.

use std::future::Future;
use std::ops::Range;
use std::sync::Arc;

use log::debug;

use crate::core::error::{Error, Result};
use crate::core::matrix::DistanceMatrix;

/// Default number of items per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// Progress callback: `(chunks_done, chunks_total)`
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Number of items sent per call. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize(usize);

impl ChunkSize {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::Configuration(
                "chunk size must be a positive integer".to_string(),
            ));
        }
        Ok(Self(size))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self(DEFAULT_CHUNK_SIZE)
    }
}

/// Number of chunks needed to cover `len` items
pub fn chunk_count(len: usize, size: ChunkSize) -> usize {
    len.div_ceil(size.get())
}

/// Contiguous index ranges covering `0..len`, each at most `size` long
pub fn chunk_ranges(len: usize, size: ChunkSize) -> impl Iterator<Item = Range<usize>> {
    let size = size.get();
    (0..len).step_by(size).map(move |start| start..(start + size).min(len))
}

/// How per-chunk results are combined into one output
pub trait Reassembly<C> {
    type Output;

    fn reassemble(&self, chunks: Vec<C>) -> Result<Self::Output>;
}

/// Appends list results end to end
#[derive(Debug, Clone, Copy, Default)]
pub struct Concat;

impl<T> Reassembly<Vec<T>> for Concat {
    type Output = Vec<T>;

    fn reassemble(&self, chunks: Vec<Vec<T>>) -> Result<Vec<T>> {
        Ok(chunks.into_iter().flatten().collect())
    }
}

/// Joins matrix blocks column-wise, so the chunked dimension is the column axis
#[derive(Debug, Clone, Copy, Default)]
pub struct StackColumns;

impl Reassembly<DistanceMatrix> for StackColumns {
    type Output = DistanceMatrix;

    fn reassemble(&self, chunks: Vec<DistanceMatrix>) -> Result<DistanceMatrix> {
        DistanceMatrix::hstack(chunks)
    }
}

/// Run `call` once per chunk of `items`, sequentially, and reassemble the results.
///
/// An error from any call stops the run and is returned as-is; chunks are
/// never retried. `progress` fires after every completed chunk.
pub async fn run_batched<'a, T, C, R, F, Fut>(
    items: &'a [T],
    chunk_size: ChunkSize,
    reassembly: &R,
    progress: Option<&ProgressCallback>,
    mut call: F,
) -> Result<R::Output>
where
    R: Reassembly<C>,
    F: FnMut(&'a [T]) -> Fut,
    Fut: Future<Output = Result<C>>,
{
    let total = chunk_count(items.len(), chunk_size);
    let mut results = Vec::with_capacity(total);

    for (index, range) in chunk_ranges(items.len(), chunk_size).enumerate() {
        debug!("chunk {}/{}: items {}..{}", index + 1, total, range.start, range.end);
        results.push(call(&items[range]).await?);

        if let Some(progress) = progress {
            progress(index + 1, total);
        }
    }

    reassembly.reassemble(results)
}
