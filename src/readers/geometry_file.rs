//! Reader for JSON core geometry files
//!
//! Any field left out of the file takes the PB-FHR Mk1 default, so a file only
//! needs the values that differ.
//!
//! ```json
//! {
//!     "n_fz": 6,
//!     "h_active": 3.5
//! }
//! ```

// internal modules
use crate::geometry::CoreGeometry;
use crate::utils::*;

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// external crates
use anyhow::{Context, Result};
use log::debug;

/// A simple reader for a JSON geometry file
#[derive(Debug, Default)]
pub struct GeometryFileReader;

impl GeometryFileReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Deserialise and validate the geometry at `path`
    pub fn parse(&self, path: &Path) -> Result<CoreGeometry> {
        let file = File::open(path).with_context(|| f!("Could not open {}", path.display()))?;
        let geometry: CoreGeometry = serde_json::from_reader(BufReader::new(file))
            .with_context(|| f!("Invalid geometry in {}", path.display()))?;

        geometry.validate()?;
        debug!("Read geometry from {}", path.display());
        Ok(geometry)
    }
}
