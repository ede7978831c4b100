//! Service layer orchestrating models and processors

pub mod analysis;
pub mod clipping;
pub mod export;
pub mod recognition;

pub use analysis::{AnalysisOutcome, AnalysisService};
pub use clipping::{ClipReport, ClipRequest, ClippingService};
pub use export::{ExportFormat, ExportOptions, ExportService};
pub use recognition::{RecognitionOptions, RecognitionService};
