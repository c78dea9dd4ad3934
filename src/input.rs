//! Solver input blocks for reference solution data
//!
//! Generates the `[AuxVariables]`, `[AuxKernels]` and `[UserObjects]` blocks
//! needed to pass a reference solution through to the solver, one block per
//! variable. Every variable is read from the mesh output file by a
//! `SolutionUserObject`, copied onto an elemental auxiliary variable by a
//! `SolutionAux` kernel at the start of each timestep.
//!
//! The free functions use the standard settings:
//!
//! ```rust
//! # use pbfhr::input::aux_variables;
//! let text = aux_variables(&["keff"]);
//! assert_eq!(
//!     text,
//!     "[./auxVar_keff]\n  block = '1 2 3'\n  family = MONOMIAL\n  order = CONSTANT\n[../]\n\n"
//! );
//! ```
//!
//! An [InputGenerator] allows the block list, mesh file and so on to be
//! changed, and for each section to be wrapped in its top level header.
//!
//! Names are not checked in any way. Whatever is given is substituted into the
//! templates as-is.

// internal modules
use crate::utils::*;

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::debug;

/// Variables passed through from the reference solution by default
pub const DEFAULT_VARIABLES: [&str; 12] = [
    "power",
    "volPower",
    "flux1g",
    "flux1g_err",
    "flux2g",
    "flux2g_err",
    "flux3g",
    "flux3g_err",
    "flux4g",
    "flux4g_err",
    "keff",
    "stdkeff",
];

/// Mesh output file holding the reference solution
pub const DEFAULT_MESH_FILE: &str = "output_cyl.e";

/// Sections of the solver input that can be generated
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Section {
    AuxVariables,
    AuxKernels,
    UserObjects,
}

impl Section {
    /// All sections, in the order the solver input expects them
    pub const ALL: [Section; 3] = [Self::AuxVariables, Self::AuxKernels, Self::UserObjects];

    /// Top level header name, e.g. `AuxVariables`
    pub fn header(&self) -> &'static str {
        match self {
            Self::AuxVariables => "AuxVariables",
            Self::AuxKernels => "AuxKernels",
            Self::UserObjects => "UserObjects",
        }
    }
}

/// Auxiliary variable blocks for every name using the default settings
pub fn aux_variables<S: AsRef<str>>(names: &[S]) -> String {
    InputGenerator::default().aux_variables(names)
}

/// Auxiliary kernel blocks for every name using the default settings
pub fn aux_kernels<S: AsRef<str>>(names: &[S]) -> String {
    InputGenerator::default().aux_kernels(names)
}

/// User object blocks for every name using the default settings
pub fn user_objects<S: AsRef<str>>(names: &[S]) -> String {
    InputGenerator::default().user_objects(names)
}

/// Configurable generator for the solver input blocks
///
/// Defaults reproduce the standard blocks exactly:
///
/// | Setting      | Default          |
/// | ------------ | ---------------- |
/// | `block`      | `1 2 3`          |
/// | `mesh_file`  | `output_cyl.e`   |
/// | `timestep`   | `1`              |
/// | `execute_on` | `timestep_begin` |
/// | `sections`   | all three        |
/// | `wrap`       | `false`          |
#[derive(Debug, Clone, PartialEq)]
pub struct InputGenerator {
    /// Mesh blocks the auxiliary variables and kernels are restricted to
    pub block: String,
    /// Mesh file the reference solution is read from
    pub mesh_file: String,
    /// Timestep of the reference solution to read
    pub timestep: u32,
    /// When the auxiliary kernels are executed
    pub execute_on: String,
    /// Sections to generate, in output order
    pub sections: Vec<Section>,
    /// Wrap each section in its top level `[Header] ... []`
    pub wrap: bool,
}

impl Default for InputGenerator {
    fn default() -> Self {
        Self {
            block: String::from("1 2 3"),
            mesh_file: String::from(DEFAULT_MESH_FILE),
            timestep: 1,
            execute_on: String::from("timestep_begin"),
            sections: Section::ALL.to_vec(),
            wrap: false,
        }
    }
}

impl InputGenerator {
    pub fn new() -> Self {
        Default::default()
    }

    /// One auxiliary variable block per name
    pub fn aux_variables<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut s = String::new();
        for name in names {
            let name = name.as_ref();
            s += &f!("[./auxVar_{name}]\n");
            s += &f!("  block = '{}'\n", self.block);
            s += "  family = MONOMIAL\n";
            s += "  order = CONSTANT\n";
            s += "[../]\n\n";
        }
        s
    }

    /// One `SolutionAux` kernel block per name
    pub fn aux_kernels<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut s = String::new();
        for name in names {
            let name = name.as_ref();
            s += &f!("[./auxKernel_{name}]\n");
            s += "  type = SolutionAux\n";
            s += &f!("  variable = auxVar_{name}\n");
            s += &f!("  block = '{}'\n", self.block);
            s += &f!("  solution = {name}UO\n");
            s += &f!("  execute_on = {}\n", self.execute_on);
            s += "[../]\n\n";
        }
        s
    }

    /// One `SolutionUserObject` block per name
    pub fn user_objects<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut s = String::new();
        for name in names {
            let name = name.as_ref();
            s += &f!("[./{name}UO]\n");
            s += "  type = SolutionUserObject\n";
            s += &f!("  mesh = {}\n", self.mesh_file);
            s += &f!("  system_variables = '{name}'\n");
            s += &f!("  timestep = {}\n", self.timestep);
            s += "[../]\n\n";
        }
        s
    }

    /// Blocks for a single section, wrapped if requested
    pub fn section<S: AsRef<str>>(&self, section: Section, names: &[S]) -> String {
        let blocks = match section {
            Section::AuxVariables => self.aux_variables(names),
            Section::AuxKernels => self.aux_kernels(names),
            Section::UserObjects => self.user_objects(names),
        };

        match self.wrap {
            true => f!("[{}]\n{blocks}[]\n\n", section.header()),
            false => blocks,
        }
    }

    /// Generate file content as a string
    ///
    /// Sections are emitted in the order given by `sections`.
    pub fn file_content<S: AsRef<str>>(&self, names: &[S]) -> String {
        self.sections
            .iter()
            .map(|section| self.section(*section, names))
            .collect()
    }

    /// Stream every selected section to a writer
    pub fn write_to<W: Write, S: AsRef<str>>(&self, writer: &mut W, names: &[S]) -> Result<()> {
        for section in &self.sections {
            debug!("Writing {} blocks for {} variables", section.header(), names.len());
            writer.write_all(self.section(*section, names).as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write every selected section to a file at `path`
    pub fn write<P: AsRef<Path>, S: AsRef<str>>(&self, path: P, names: &[S]) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| f!("Could not create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, names)
    }
}
