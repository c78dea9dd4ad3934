// internal modules
use crate::readers::parsers;
use crate::utils::*;

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

// external crates
use anyhow::{Context, Result};
use log::{debug, trace};

/// A simple reader for a list of variable names
///
/// The file is interpreted with the following rules for a line:
///
/// | Example line               | Interpretation            |
/// | -------------------------- | ------------------------- |
/// | Starts with `#`            | comment                   |
/// | `power volPower`           | two names                 |
/// | `flux1g, flux1g_err`       | two names                 |
/// | `keff # comment`           | one name, trailing comment |
///
/// Order is preserved and duplicates are kept, as the order of names only
/// decides the order of the generated blocks.
#[derive(Debug, Default)]
pub struct NamesFileReader;

impl NamesFileReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Parses all variable names from a file
    pub fn parse(&self, path: &Path) -> Result<Vec<String>> {
        let file = File::open(path).with_context(|| f!("Could not open {}", path.display()))?;
        let names = self.parse_reader(BufReader::new(file))?;
        debug!("Found {} variable names in {}", names.len(), path.display());
        Ok(names)
    }

    /// Parses all variable names from any buffered source
    pub fn parse_reader<R: Read>(&self, reader: BufReader<R>) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim(); // shadow needed to get around borrow

            // skip empty lines
            if line.is_empty() {
                continue;
            }

            // skip over any comment lines
            if parsers::is_names_file_comment(line) {
                trace!("[Comment] {line}");
                continue;
            }

            // the parser always succeeds, possibly with no names at all
            if let Ok((_, found)) = parsers::variable_names(line) {
                trace!("[Names] {found:?}");
                names.extend(found.into_iter().map(String::from));
            }
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_in_order() {
        let content = "\
# reference solution variables
power volPower

flux1g, flux1g_err   # group 1
keff
";
        let names = NamesFileReader::new()
            .parse_reader(BufReader::new(content.as_bytes()))
            .unwrap();
        assert_eq!(names, vec!["power", "volPower", "flux1g", "flux1g_err", "keff"]);
    }

    #[test]
    fn empty_file() {
        let names = NamesFileReader::new()
            .parse_reader(BufReader::new("".as_bytes()))
            .unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn missing_file() {
        let result = NamesFileReader::new().parse(Path::new("/not/a/real/names.txt"));
        assert!(result.is_err());
    }
}
