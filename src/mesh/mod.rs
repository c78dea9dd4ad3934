//! Core mesh library
//!
//! # Overview
//!
//! Module for composing a reactor core out of concentric cylindrical shells and
//! turning them into an unstructured mesh file.
//!
//! Shells are described by the [Shell] type, tagged with the [Region] of the
//! core they fill. A [MeshBuilder] collects shells, and on
//! [teardown](MeshBuilder::teardown) discretises them into a [CellMesh] and
//! writes the VTK file.
//!
//! # Quickstart
//!
//! ```rust, no_run
//! use pbfhr::mesh::{build_mesh, MeshOptions, OutputOptions, Region};
//!
//! // Central column with a single ring of fuel around it
//! let summary = build_mesh(
//!     "column.vtu",
//!     MeshOptions::default(),
//!     OutputOptions::default(),
//!     |builder| {
//!         builder.add_cyl(Region::CentralReflector, 0.5, 4.0)?;
//!         builder.add_cyl(Region::FuelPebbles(1), 1.5, 4.0)
//!     },
//! ).unwrap();
//!
//! println!("{summary}");
//! ```
//!
//! The full PB-FHR layout is available through
//! [CoreGeometry::compose](crate::geometry::CoreGeometry::compose).

// Split into subfiles for development, but anything important is re-exported
mod builder;
mod cells;
mod shell;

// inline important the mesh-related modules for a nice public API
#[doc(inline)]
pub use crate::mesh::builder::{build_mesh, MeshBuilder, MeshSummary, OutputOptions};

#[doc(inline)]
pub use crate::mesh::cells::{
    Cell, CellKind, CellMesh, MeshOptions, MAX_MESH_SIZE, MAX_RESOLUTION, MIN_CELL_SIZE,
};

#[doc(inline)]
pub use crate::mesh::shell::{Region, Shell};
