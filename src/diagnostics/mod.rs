pub mod metrics;
pub mod sink;

pub use metrics::FrameMetrics;
pub use sink::{DiagnosticLevel, DiagnosticRecord, DiagnosticsSink, MemorySink, TracingSink};
