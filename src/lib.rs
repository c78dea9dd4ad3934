//! # The Pbfhr crate
//!
//! Small tools for setting up pebble-bed fluoride-salt-cooled high-temperature
//! reactor (PB-FHR) simulations
//!
//! ## Installation
//!
//! Direct install from the repository:
//!
//! ```shell
//! cargo install --path .
//! ```
//!
//! ## Overview
//!
//! The crate contains two independent command line tools. Neither does any
//! physics, they only prepare files for the multiphysics solver.
//!
//! | Command line | Description                                               |
//! | ------------ | --------------------------------------------------------- |
//! | `pbmesh`     | Build a coarse PB-FHR Mk1 core mesh as a VTK file         |
//! | `inputgen`   | Emit AuxVariables, AuxKernels, and UserObjects input text |
//!
//! All tools are fully documented with detailed `--help` messages, including
//! examples for common use cases.
//!
//! ### Core regions
//!
//! The core is composed of concentric cylindrical shells, stacked outwards
//! from the central reflector.
//!
//! | Region                                   | Block id |
//! | ---------------------------------------- | -------- |
//! | [Region::FuelPebbles](crate::mesh::Region)      | 1 |
//! | [Region::GraphitePebbles](crate::mesh::Region)  | 2 |
//! | [Region::CentralReflector](crate::mesh::Region) | 3 |
//! | [Region::OuterReflector](crate::mesh::Region)   | 3 |
//! | [Region::DefuelChute](crate::mesh::Region)      | 4 |
//! | [Region::RefuelChute](crate::mesh::Region)      | 5 |
//!
//! ## Advanced use
//!
//! The library is more flexible than the command line tools. For example, the
//! default core can be built and written in a couple of lines:
//!
//! ```rust, no_run
//! use pbfhr::geometry::CoreGeometry;
//! use pbfhr::mesh::{build_mesh, MeshOptions, OutputOptions};
//!
//! let core = CoreGeometry::default();
//! let summary = build_mesh(
//!     "pbfhr.vtu",
//!     MeshOptions::default(),
//!     OutputOptions::default(),
//!     |builder| core.compose(builder),
//! ).unwrap();
//! ```
//!
//! and the solver input blocks generated for any list of variables:
//!
//! ```rust
//! use pbfhr::input::{InputGenerator, DEFAULT_VARIABLES};
//!
//! let text = InputGenerator::new().file_content(&DEFAULT_VARIABLES);
//! assert!(text.contains("[./keffUO]"));
//! ```
//!
//! As an overview:
//! - The [geometry] module holds the core dimensions and lays out the shells.
//! - The [mesh] module composes shells and discretises them into cells.
//! - The [vtk] module converts cell meshes to VTK formats.
//! - The [input] module formats the solver input blocks.
//!
//! In the background, `vtkio` writes the VTK files, `nom` parses variable name
//! lists, `serde_json` reads geometry files, and `clap` is used for the command
//! line interfaces.

// Public facing modules
pub mod geometry;
pub mod input;
pub mod mesh;
pub mod utils;
pub mod vtk;

// note that docs are hidden to prevent confusing the current simple API
pub mod readers;

// Re-exports of useful data structures
#[doc(inline)]
pub use crate::readers::{read_geometry_file, read_names_file};
