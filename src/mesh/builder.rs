//! Scoped construction of a shell mesh and its output file
//!
//! A [MeshBuilder] owns everything needed to produce one mesh file. Shells are
//! stacked outwards with [MeshBuilder::add_cyl] and the file is only written
//! by [MeshBuilder::teardown], which consumes the builder. The [build_mesh]
//! helper wraps the whole lifecycle so a failure part way through composing
//! the shells never leaves a half-written file behind.

// internal modules
use crate::mesh::{CellKind, CellMesh, MeshOptions, Region, Shell};
use crate::utils::*;
use crate::vtk::{write_vtk, CellMeshToVtkBuilder, VtkFormat};

// standard library
use std::path::{Path, PathBuf};

// external crates
use anyhow::{bail, Result};
use log::{debug, info, warn};
use vtkio::model::ByteOrder;
use vtkio::xml::Compressor;

/// Everything needed to write a mesh once it has been composed
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// VTK file format
    pub format: VtkFormat,
    /// Byte ordering of binary data
    pub byte_order: ByteOrder,
    /// Compression for XML formats
    pub compressor: Compressor,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: VtkFormat::Xml,
            byte_order: ByteOrder::BigEndian,
            compressor: Compressor::LZMA,
        }
    }
}

/// Summary of a written mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSummary {
    /// Path of the file written
    pub path: PathBuf,
    /// Number of shells in the mesh
    pub shells: usize,
    /// Number of hexahedral cells
    pub hexahedra: usize,
    /// Number of wedge cells
    pub wedges: usize,
    /// Number of points
    pub points: usize,
    /// Total volume of all cells (m3)
    pub volume: f64,
}

impl std::fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Mesh written to {}\n", self.path.display());
        s += &f!("  shells : {}\n", self.shells);
        s += &f!(
            "  cells  : {} ({} hexahedra, {} wedges)\n",
            self.hexahedra + self.wedges,
            self.hexahedra,
            self.wedges
        );
        s += &f!("  points : {}\n", self.points);
        s += &f!("  volume : {} m3", self.volume.sci(5, 2));
        write!(f, "{s}")
    }
}

/// Radial stack that [MeshBuilder::add_cyl] appends to
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Cursor {
    /// Base height of the stack
    z_min: f64,
    /// Current outermost radius of the stack
    radius: f64,
}

/// Handle on a mesh under construction
///
/// Acquired with [MeshBuilder::setup] and released with
/// [MeshBuilder::teardown]. Dropping a builder that still holds shells without
/// tearing it down discards them and logs a warning.
///
/// ```rust
/// # use pbfhr::mesh::{MeshBuilder, MeshOptions, OutputOptions, Region};
/// let mut builder = MeshBuilder::setup(
///     "column.vtu",
///     MeshOptions::default(),
///     OutputOptions::default(),
/// ).unwrap();
///
/// builder.add_cyl(Region::CentralReflector, 0.5, 4.0).unwrap();
/// builder.add_cyl(Region::FuelPebbles(1), 1.5, 4.0).unwrap();
///
/// // radii must keep moving outwards
/// assert!(builder.add_cyl(Region::GraphitePebbles, 1.0, 4.0).is_err());
/// assert_eq!(builder.shells().len(), 2);
/// # builder.discard();
/// ```
#[derive(Debug)]
pub struct MeshBuilder {
    path: PathBuf,
    mesh_options: MeshOptions,
    output_options: OutputOptions,
    shells: Vec<Shell>,
    cursor: Cursor,
    released: bool,
}

impl MeshBuilder {
    /// Acquire a builder for the mesh file at `path`
    ///
    /// Fails if the options cannot produce a valid mesh, or if the directory
    /// the file would be written to does not exist.
    pub fn setup<P: AsRef<Path>>(
        path: P,
        mesh_options: MeshOptions,
        output_options: OutputOptions,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        mesh_options.validate()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Output directory {} does not exist", parent.display());
            }
        }

        debug!("Mesh builder acquired for {}", path.display());
        Ok(Self {
            path,
            mesh_options,
            output_options,
            shells: Vec::new(),
            cursor: Cursor::default(),
            released: false,
        })
    }

    /// Start a new radial stack at height `z_min` and radius `r_inner`
    pub fn layer(&mut self, z_min: f64, r_inner: f64) -> Result<()> {
        if !z_min.is_finite() || !r_inner.is_finite() || r_inner < 0.0 {
            bail!("Invalid layer origin z = {z_min}, r = {r_inner}");
        }
        self.cursor = Cursor {
            z_min,
            radius: r_inner,
        };
        Ok(())
    }

    /// Append a cylindrical shell of outer radius `r` and height `h`
    ///
    /// The shell runs from the current stack radius out to `r`, and from the
    /// stack base up to the base plus `h`. The stack radius then moves out to
    /// `r` ready for the next shell.
    pub fn add_cyl(&mut self, region: Region, r: f64, h: f64) -> Result<()> {
        if !r.is_finite() || r <= 0.0 {
            bail!("Radius of the {region} must be positive, found {r}");
        }
        if !h.is_finite() || h <= 0.0 {
            bail!("Height of the {region} must be positive, found {h}");
        }
        if r <= self.cursor.radius {
            bail!(
                "Radius {r} of the {region} must exceed the current stack radius {}",
                self.cursor.radius
            );
        }

        self.add_shell(Shell {
            region,
            r_inner: self.cursor.radius,
            r_outer: r,
            z_min: self.cursor.z_min,
            height: h,
        })?;
        self.cursor.radius = r;
        Ok(())
    }

    /// Append an explicit shell, independent of the current stack
    pub fn add_shell(&mut self, shell: Shell) -> Result<()> {
        shell.validate()?;
        debug!("Adding {}: {shell}", shell.region);
        self.shells.push(shell);
        Ok(())
    }

    /// Shells added so far
    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    /// Path the mesh will be written to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discretise the current shells without writing anything
    pub fn discretise(&self) -> Result<CellMesh> {
        CellMesh::from_shells(&self.shells, &self.mesh_options)
    }

    /// Finalise the mesh, write it to file, and release the builder
    pub fn teardown(mut self) -> Result<MeshSummary> {
        // released whatever the outcome, errors are returned to the caller
        self.released = true;

        if self.shells.is_empty() {
            bail!("No shells were added to {}", self.path.display());
        }

        let mesh = self.discretise()?;

        info!("Converting mesh to VTK object");
        let convertor = CellMeshToVtkBuilder::new()
            .byte_order(self.output_options.byte_order)
            .build();
        let vtk = convertor.convert(&mesh)?;

        info!("Writing VTK to {}", self.path.display());
        write_vtk(
            vtk,
            &self.path,
            self.output_options.format,
            self.output_options.compressor,
        )?;

        Ok(MeshSummary {
            path: self.path.clone(),
            shells: mesh.shells.len(),
            hexahedra: mesh.count(CellKind::Hexahedron),
            wedges: mesh.count(CellKind::Wedge),
            points: mesh.points.len(),
            volume: mesh.volume(),
        })
    }

    /// Release the builder without writing anything
    pub fn discard(mut self) {
        debug!("Discarding {} shells", self.shells.len());
        self.released = true;
    }
}

impl Drop for MeshBuilder {
    fn drop(&mut self) {
        if !self.released && !self.shells.is_empty() {
            warn!(
                "Mesh builder for {} dropped without teardown, {} shells discarded",
                self.path.display(),
                self.shells.len()
            );
        }
    }
}

/// Compose and write a mesh in one scoped call
///
/// The builder is acquired, handed to `compose`, and torn down only if
/// `compose` succeeds. On failure nothing is written and the error is
/// returned as-is.
///
/// ```rust, no_run
/// # use pbfhr::mesh::{build_mesh, MeshOptions, OutputOptions, Region};
/// let summary = build_mesh(
///     "column.vtu",
///     MeshOptions::default(),
///     OutputOptions::default(),
///     |builder| builder.add_cyl(Region::CentralReflector, 0.5, 4.0),
/// ).unwrap();
/// ```
pub fn build_mesh<P, F>(
    path: P,
    mesh_options: MeshOptions,
    output_options: OutputOptions,
    compose: F,
) -> Result<MeshSummary>
where
    P: AsRef<Path>,
    F: FnOnce(&mut MeshBuilder) -> Result<()>,
{
    let mut builder = MeshBuilder::setup(path, mesh_options, output_options)?;
    match compose(&mut builder) {
        Ok(()) => builder.teardown(),
        Err(e) => {
            builder.discard();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MAX_RESOLUTION;
    use rstest::rstest;

    fn builder() -> MeshBuilder {
        MeshBuilder::setup(
            "unused.vtu",
            MeshOptions::default(),
            OutputOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn add_cyl_stacks_outwards() {
        let mut b = builder();
        b.add_cyl(Region::CentralReflector, 0.5, 4.0).unwrap();
        b.add_cyl(Region::FuelPebbles(1), 1.5, 4.0).unwrap();

        let shells = b.shells();
        assert_eq!(shells[0].r_inner, 0.0);
        assert_eq!(shells[1].r_inner, 0.5);
        assert_eq!(shells[1].r_outer, 1.5);
        b.discard();
    }

    #[test]
    fn layer_moves_the_stack() {
        let mut b = builder();
        b.layer(-0.5, 0.5).unwrap();
        b.add_cyl(Region::DefuelChute, 1.55, 0.5).unwrap();

        let shell = b.shells()[0];
        assert_eq!(shell.z_min, -0.5);
        assert_eq!(shell.z_max(), 0.0);
        assert_eq!(shell.r_inner, 0.5);
        b.discard();
    }

    #[rstest]
    #[case::zero_radius(0.0, 1.0)]
    #[case::negative_radius(-1.0, 1.0)]
    #[case::zero_height(1.0, 0.0)]
    #[case::negative_height(1.0, -2.0)]
    #[case::nan_height(1.0, f64::NAN)]
    fn add_cyl_rejects_non_positive(#[case] r: f64, #[case] h: f64) {
        let mut b = builder();
        assert!(b.add_cyl(Region::OuterReflector, r, h).is_err());
        assert!(b.shells().is_empty());
    }

    #[test]
    fn setup_rejects_missing_directory() {
        let result = MeshBuilder::setup(
            "/definitely/not/a/real/dir/mesh.vtu",
            MeshOptions::default(),
            OutputOptions::default(),
        );
        assert!(result.is_err());
    }

    #[rstest]
    #[case::low_resolution(1, 0.25, 0.5)]
    #[case::huge_resolution(usize::MAX, 0.25, 0.5)]
    #[case::tiny_radial_cells(24, 1e-300, 0.5)]
    #[case::tiny_axial_cells(24, 0.25, 1e-300)]
    fn setup_rejects_bad_options(
        #[case] resolution: usize,
        #[case] max_dr: f64,
        #[case] max_dz: f64,
    ) {
        let options = MeshOptions {
            resolution,
            max_dr,
            max_dz,
            ..Default::default()
        };
        assert!(MeshBuilder::setup("mesh.vtu", options, OutputOptions::default()).is_err());
    }

    #[test]
    fn oversized_mesh_writes_nothing() {
        let path = TempPath::new("oversized.vtu");
        let options = MeshOptions {
            resolution: MAX_RESOLUTION,
            max_dr: 1e-3,
            max_dz: 1e-3,
            ..Default::default()
        };

        let result = build_mesh(&path, options, OutputOptions::default(), |b| {
            b.add_cyl(Region::CentralReflector, 1.0, 1.0)
        });

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn failed_compose_writes_nothing() {
        let path = TempPath::new("failed_compose.vtu");

        let result = build_mesh(
            &path,
            MeshOptions::default(),
            OutputOptions::default(),
            |b| {
                b.add_cyl(Region::CentralReflector, 0.5, 1.0)?;
                b.add_cyl(Region::FuelPebbles(1), 0.25, 1.0)
            },
        );

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn empty_teardown_fails() {
        assert!(builder().teardown().is_err());
    }

    #[test]
    fn teardown_writes_legacy_file() {
        let path = TempPath::new("teardown.vtk");
        let output = OutputOptions {
            format: VtkFormat::LegacyAscii,
            ..Default::default()
        };
        let mesh_options = MeshOptions {
            resolution: 4,
            max_dr: 1.0,
            max_dz: 1.0,
            ..Default::default()
        };

        let summary = build_mesh(&path, mesh_options, output, |b| {
            b.add_cyl(Region::CentralReflector, 0.5, 1.0)?;
            b.add_cyl(Region::OuterReflector, 1.0, 1.0)
        })
        .unwrap();

        assert!(path.exists());
        assert_eq!(summary.shells, 2);
        assert_eq!(summary.wedges, 4);
        assert_eq!(summary.hexahedra, 4);
        assert_eq!(summary.points, 10 + 16);
    }
}
