pub mod markdown;
pub mod pipeline;

pub use pipeline::{ARCHIVE_NAME, ExportArchive, ExportPipeline};
