//! Reference pose resource: the rigid-body frame of the support
//! surface, one entry per background index.
//!
//! Loaded once per run on the first placement request. A missing or
//! malformed resource aborts the run, since no later iteration can
//! proceed without it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::PlaceError;
use crate::geom::{Quat, Vec3};

/// Support-surface pose for one background index.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ReferencePose {
    pub rotation: Quat,
    pub translation: Vec3,
}

/// All reference poses for a run, keyed by background index.
#[derive(Debug)]
pub struct ReferencePoseTable {
    poses: HashMap<u32, ReferencePose>,
}

impl ReferencePoseTable {
    /// Parse the JSON resource mapping string background indices to
    /// `{"rotation": {x,y,z,w}, "translation": {x,y,z}}`.
    pub fn load(path: &Path) -> Result<Self, PlaceError> {
        let text = fs::read_to_string(path).map_err(|source| PlaceError::ReferencePoseRead {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: HashMap<String, ReferencePose> =
            serde_json::from_str(&text).map_err(|source| PlaceError::ReferencePoseParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut poses = HashMap::with_capacity(raw.len());
        for (key, pose) in raw {
            let index: u32 = key
                .parse()
                .map_err(|_| PlaceError::ReferencePoseKey { key: key.clone() })?;
            poses.insert(index, pose);
        }

        Ok(Self { poses })
    }

    /// Pose for a background index. A miss is a configuration
    /// mismatch between the resource and the run parameters.
    pub fn get(&self, background_index: u32) -> Result<&ReferencePose, PlaceError> {
        self.poses
            .get(&background_index)
            .ok_or(PlaceError::MissingReferencePose { background_index })
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}
