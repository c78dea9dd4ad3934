#![doc(hidden)]
//! Library of readers for the small input files used by the tools

// internal modules
use crate::geometry::CoreGeometry;

// standard library
use std::path::Path;

// external crates
use anyhow::Result;

// files under the readers module
mod geometry_file;
mod names_file;
pub mod parsers;

// inline important reader types for a nice API
#[doc(inline)]
pub use crate::readers::geometry_file::GeometryFileReader;

#[doc(inline)]
pub use crate::readers::names_file::NamesFileReader;

/// Read a core geometry from a JSON file
///
/// Returns a result containing the validated [CoreGeometry]. Fields missing
/// from the file take the Mk1 defaults.
///
/// - `path` - Path to the JSON file, can be [&str], [String], [Path], etc...
///
/// Example
/// ```ignore
/// let core: CoreGeometry = pbfhr::read_geometry_file("path/to/core.json")?;
/// ```
pub fn read_geometry_file<P: AsRef<Path>>(path: P) -> Result<CoreGeometry> {
    let path: &Path = Path::new(path.as_ref());
    GeometryFileReader::new().parse(path)
}

/// Read a list of variable names from a text file
///
/// Returns a result containing the names in file order. Lines starting with
/// `#` are comments, and names are separated by whitespace or commas.
///
/// - `path` - Path to the names file, can be [&str], [String], [Path], etc...
///
/// Example
/// ```ignore
/// let names: Vec<String> = pbfhr::read_names_file("path/to/names.txt")?;
/// ```
pub fn read_names_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path: &Path = Path::new(path.as_ref());
    NamesFileReader::new().parse(path)
}
