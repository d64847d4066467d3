//! CLI-specific progress handling for detour-rank
//!
//! Shows one tick per distance-matrix call.

use std::io::{self, Write};
use std::sync::Arc;

use detour_rank::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

/// Creates a progress bar counting completed chunks
pub fn create_progress_bar(total_chunks: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_chunks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} chunks ({percent}%) ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    );
    pb
}

/// Stderr writer that hides the progress bar while a log line is printed
pub struct SuspendedStderr {
    pb: ProgressBar,
}

impl Write for SuspendedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pb.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.pb.suspend(|| io::stderr().flush())
    }
}

/// Progress bar driven by the engine's chunk callback
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_chunks: u64, message: &str) -> Self {
        let pb = create_progress_bar(total_chunks);

        // Print initial message to stderr
        eprintln!("{}", message);

        Self { pb }
    }

    /// Log target that keeps warnings off the bar's line
    pub fn log_target(&self) -> env_logger::Target {
        env_logger::Target::Pipe(Box::new(SuspendedStderr { pb: self.pb.clone() }))
    }

    /// Callback for the engine: moves the bar and finishes it on the last chunk
    pub fn callback(&self) -> ProgressCallback {
        let pb = self.pb.clone();
        Arc::new(move |done, total| {
            if pb.length().unwrap_or(0) != total as u64 {
                pb.set_length(total as u64);
            }
            pb.set_position(done as u64);
            if done >= total {
                pb.finish_with_message("done");
            }
        })
    }
}
