//! Final run summary.
//!
//! Pure presentation; whatever portion of the run completed is reported.

use tracing::info;

use crate::migration::processor::RunStatistics;

/// Render the end-of-run summary.
pub fn render(stats: &RunStatistics) {
    info!("======================================");
    info!("  Goal classification migration done");
    info!("======================================");
    info!("Entries processed:        {}", stats.total);
    info!("Mapped to goals:          {}", stats.mapped);
    info!("Left unmapped:            {}", stats.unmapped);
    info!("Progress records created: {}", stats.progress_created);
    info!("Errors:                   {}", stats.errors);
    info!("======================================");
}
