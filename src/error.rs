//! Error taxonomy for the placement engine.
//!
//! Only configuration mismatches are errors: a missing or malformed
//! reference-pose resource, a background index with no entry, or a
//! failing occlusion log. Retry exhaustion and slot-allocation
//! failures are expected outcomes of the randomized search and are
//! absorbed by the engine, observable through the iteration report.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("failed to read reference poses from {}", .path.display())]
    ReferencePoseRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed reference pose resource {}", .path.display())]
    ReferencePoseParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("reference pose key {key:?} is not a background index")]
    ReferencePoseKey { key: String },

    #[error("no reference pose for background index {background_index}")]
    MissingReferencePose { background_index: u32 },

    #[error("occlusion log write failed")]
    OcclusionLog(#[source] io::Error),
}
