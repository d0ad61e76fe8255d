pub mod filesystem;
pub mod metrics;
pub mod resource;

pub use filesystem::FilesystemResourceProvider;
pub use metrics::{FontError, FontHandle, FontMetrics, FontNames, GlyphBounds, OutlineSink};
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, ResourceBytes};
