//! Training-dataset domain: partition ratios, class distributions, and the
//! exported archive on disk.

pub mod archive;
pub mod distribution;
pub mod partition;

pub use archive::{ArchiveError, EXPORT_ARCHIVE_NAME};
pub use distribution::{ClassCount, ClassDistribution};
pub use partition::{DEFAULT_CUTS, PartitionRatio};
