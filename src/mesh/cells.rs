//! Discretisation of cylindrical shells into unstructured cells
//!
//! There is no native cylindrical cell type in VTK, so every shell is broken
//! into straight-edged segments. The number of theta segments is controlled by
//! the `resolution`, and radial/axial divisions by maximum cell sizes.
//!
//! Cells away from the axis are hexahedra. Cells touching the axis collapse
//! their inner edge onto a single point and become wedges.

// internal modules
use crate::mesh::{Region, Shell};
use crate::utils::*;

// standard library
use std::f64::consts::TAU;

// external crates
use anyhow::{bail, Result};
use itertools::iproduct;
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, trace};

/// Largest number of theta segments accepted
pub const MAX_RESOLUTION: usize = 100_000;

/// Smallest radial or axial cell size accepted (m)
pub const MIN_CELL_SIZE: f64 = 1e-6;

/// Largest number of points or cells a mesh may hold
///
/// Point indices are written to VTK as `u32`, so this must stay below
/// `u32::MAX`.
pub const MAX_MESH_SIZE: usize = 50_000_000;

/// Controls on how finely shells are split into cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshOptions {
    /// Number of theta segments around every ring
    pub resolution: usize,
    /// Maximum radial cell size (m)
    pub max_dr: f64,
    /// Maximum axial cell size (m)
    pub max_dz: f64,
    /// Do not print the progress bar while discretising
    pub disable_progress: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            resolution: 24,
            max_dr: 0.25,
            max_dz: 0.5,
            disable_progress: true,
        }
    }
}

impl MeshOptions {
    /// Reject settings that would produce a degenerate mesh
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 3 {
            bail!(
                "Resolution must be at least 3 theta segments, found {}",
                self.resolution
            );
        }
        if self.resolution > MAX_RESOLUTION {
            bail!(
                "Resolution must be at most {MAX_RESOLUTION} theta segments, found {}",
                self.resolution
            );
        }
        for (name, value) in [("max_dr", self.max_dr), ("max_dz", self.max_dz)] {
            if !value.is_finite() || value <= 0.0 {
                bail!("Cell size {name} must be positive, found {value}");
            }
            if value < MIN_CELL_SIZE {
                bail!("Cell size {name} must be at least {MIN_CELL_SIZE} m, found {value}");
            }
        }
        Ok(())
    }

    /// Upper bound on the (cells, points) needed to discretise `shells`
    ///
    /// Counted in floating point so absurd inputs cannot overflow.
    ///
    /// ```rust
    /// # use pbfhr::mesh::{MeshOptions, Region, Shell};
    /// let shell = Shell {
    ///     region: Region::OuterReflector,
    ///     r_inner: 1.0,
    ///     r_outer: 2.0,
    ///     z_min: 0.0,
    ///     height: 1.0,
    /// };
    /// let options = MeshOptions { resolution: 8, max_dr: 0.5, max_dz: 0.5, ..Default::default() };
    /// assert_eq!(options.estimate(&[shell]), (32.0, 72.0));
    /// ```
    pub fn estimate(&self, shells: &[Shell]) -> (f64, f64) {
        let n_t = self.resolution as f64;
        shells.iter().fold((0.0, 0.0), |(cells, points), shell| {
            let n_r = divisions(shell.thickness(), self.max_dr) as f64;
            let n_z = divisions(shell.height, self.max_dz) as f64;
            (
                cells + n_r * n_t * n_z,
                points + (n_r + 1.0) * n_t * (n_z + 1.0),
            )
        })
    }
}

/// VTK cell shapes used by the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// 8 vertices, bottom face then top face
    Hexahedron,
    /// 6 vertices, bottom triangle then top triangle
    Wedge,
}

/// A single cell, referencing points in the parent [CellMesh]
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Shape of the cell
    pub kind: CellKind,
    /// Indices into [CellMesh::points], in VTK ordering
    pub vertices: Vec<usize>,
    /// Index of the shell this cell was cut from
    pub shell: usize,
    /// Volume of the straight-edged cell
    pub volume: f64,
}

/// Unstructured representation of a set of shells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellMesh {
    /// Cartesian coordinates of every vertex
    pub points: Vec<[f64; 3]>,
    /// Every cell of every shell, in shell order
    pub cells: Vec<Cell>,
    /// The shells that were discretised, indexed by [Cell::shell]
    pub shells: Vec<Shell>,
}

impl CellMesh {
    /// Discretise a list of shells
    ///
    /// ```rust
    /// # use pbfhr::mesh::{CellMesh, MeshOptions, Region, Shell};
    /// let shell = Shell {
    ///     region: Region::CentralReflector,
    ///     r_inner: 0.0,
    ///     r_outer: 1.0,
    ///     z_min: 0.0,
    ///     height: 1.0,
    /// };
    /// let options = MeshOptions { resolution: 4, max_dr: 2.0, max_dz: 2.0, ..Default::default() };
    /// let mesh = CellMesh::from_shells(&[shell], &options).unwrap();
    ///
    /// // 4 wedges around the axis, 2 axis points and 2 rings of 4
    /// assert_eq!(mesh.cells.len(), 4);
    /// assert_eq!(mesh.points.len(), 10);
    /// ```
    pub fn from_shells(shells: &[Shell], options: &MeshOptions) -> Result<Self> {
        options.validate()?;

        let (n_cells, n_points) = options.estimate(shells);
        if n_cells.max(n_points) > MAX_MESH_SIZE as f64 {
            bail!(
                "Mesh would need {} cells and {} points, the limit is {MAX_MESH_SIZE}",
                n_cells.sci(3, 2),
                n_points.sci(3, 2)
            );
        }

        let mut mesh = Self::default();
        let mut progress_bar = init_progress_bar(shells.len(), options.disable_progress)?;

        for shell in shells {
            shell.validate()?;
            mesh.push_shell(shell, options);
            progress_bar.update(1)?;
        }

        if !options.disable_progress {
            eprintln!()
        };

        debug!(
            "Discretised {} shells into {} cells and {} points",
            mesh.shells.len(),
            mesh.cells.len(),
            mesh.points.len()
        );
        Ok(mesh)
    }

    /// Sum of all cell volumes
    pub fn volume(&self) -> f64 {
        self.cells.iter().map(|c| c.volume).sum()
    }

    /// Number of cells of a given shape
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// Region of the shell a cell belongs to
    pub fn region(&self, cell: &Cell) -> Region {
        self.shells[cell.shell].region
    }

    fn push_shell(&mut self, shell: &Shell, options: &MeshOptions) {
        let shell_index = self.shells.len();
        self.shells.push(*shell);

        let n_t = options.resolution;
        let n_r = divisions(shell.thickness(), options.max_dr);
        let n_z = divisions(shell.height, options.max_dz);
        trace!("Shell {shell_index}: {n_r}x{n_t}x{n_z} (r, theta, z) for {shell}");

        let radii: Vec<f64> = (0..=n_r)
            .map(|i| shell.r_inner + shell.thickness() * i as f64 / n_r as f64)
            .collect();
        let heights: Vec<f64> = (0..=n_z)
            .map(|i| shell.z_min + shell.height * i as f64 / n_z as f64)
            .collect();
        let d_theta = TAU / n_t as f64;

        // index of the first point of every ring, axis rings hold one point
        let mut rings = vec![vec![0; n_r + 1]; n_z + 1];
        for (iz, &z) in heights.iter().enumerate() {
            for (ir, &r) in radii.iter().enumerate() {
                rings[iz][ir] = self.points.len();
                if r == 0.0 {
                    self.points.push([0.0, 0.0, z]);
                    continue;
                }
                for it in 0..n_t {
                    let theta = it as f64 * d_theta;
                    self.points.push([r * theta.cos(), r * theta.sin(), z]);
                }
            }
        }

        let point = |iz: usize, ir: usize, it: usize| -> usize {
            match radii[ir] == 0.0 {
                true => rings[iz][ir],
                false => rings[iz][ir] + it % n_t,
            }
        };

        for (iz, ir, it) in iproduct!(0..n_z, 0..n_r, 0..n_t) {
            let (r0, r1) = (radii[ir], radii[ir + 1]);
            let h = heights[iz + 1] - heights[iz];
            let volume = 0.5 * d_theta.sin() * (r1 * r1 - r0 * r0) * h;

            let cell = match r0 == 0.0 {
                // base triangle must point away from the top face
                true => Cell {
                    kind: CellKind::Wedge,
                    vertices: vec![
                        point(iz, ir, it),
                        point(iz, ir + 1, it + 1),
                        point(iz, ir + 1, it),
                        point(iz + 1, ir, it),
                        point(iz + 1, ir + 1, it + 1),
                        point(iz + 1, ir + 1, it),
                    ],
                    shell: shell_index,
                    volume,
                },
                false => Cell {
                    kind: CellKind::Hexahedron,
                    vertices: vec![
                        point(iz, ir, it),
                        point(iz, ir + 1, it),
                        point(iz, ir + 1, it + 1),
                        point(iz, ir, it + 1),
                        point(iz + 1, ir, it),
                        point(iz + 1, ir + 1, it),
                        point(iz + 1, ir + 1, it + 1),
                        point(iz + 1, ir, it + 1),
                    ],
                    shell: shell_index,
                    volume,
                },
            };
            self.cells.push(cell);
        }
    }
}

/// Initialise the progress bar, if wanted
fn init_progress_bar(total: usize, disable: bool) -> Result<Bar> {
    BarBuilder::default()
        .total(total)
        .delay(0.0)
        .unit(" shells")
        .disable(disable)
        .build()
        .map_err(|e| anyhow::anyhow!("Unable to build progress bar: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn options(resolution: usize, max_dr: f64, max_dz: f64) -> MeshOptions {
        MeshOptions {
            resolution,
            max_dr,
            max_dz,
            disable_progress: true,
        }
    }

    fn annulus(r_inner: f64, r_outer: f64, height: f64) -> Shell {
        Shell {
            region: Region::OuterReflector,
            r_inner,
            r_outer,
            z_min: -0.5,
            height,
        }
    }

    #[test]
    fn solid_cylinder_is_wedges() {
        let mesh = CellMesh::from_shells(&[annulus(0.0, 1.0, 1.0)], &options(4, 5.0, 5.0)).unwrap();
        assert_eq!(mesh.count(CellKind::Wedge), 4);
        assert_eq!(mesh.count(CellKind::Hexahedron), 0);
        assert_eq!(mesh.points.len(), 10);
        assert!(mesh.cells.iter().all(|c| c.vertices.len() == 6));
    }

    #[test]
    fn annulus_is_hexahedra() {
        let mesh = CellMesh::from_shells(&[annulus(1.0, 2.0, 1.0)], &options(8, 0.5, 0.5)).unwrap();
        // 2 radial x 8 theta x 2 axial
        assert_eq!(mesh.count(CellKind::Hexahedron), 32);
        assert_eq!(mesh.count(CellKind::Wedge), 0);
        // 3 rings of 8 at 3 heights
        assert_eq!(mesh.points.len(), 72);
        assert!(mesh.cells.iter().all(|c| c.vertices.len() == 8));
    }

    #[test]
    fn solid_cylinder_mixes_wedges_and_hexahedra() {
        let mesh = CellMesh::from_shells(&[annulus(0.0, 1.0, 1.0)], &options(6, 0.5, 1.0)).unwrap();
        assert_eq!(mesh.count(CellKind::Wedge), 6);
        assert_eq!(mesh.count(CellKind::Hexahedron), 6);
        // axis point + 2 rings of 6, at 2 heights
        assert_eq!(mesh.points.len(), 26);
    }

    #[rstest]
    #[case(4)]
    #[case(24)]
    #[case(360)]
    fn volume_matches_polygon(#[case] resolution: usize) {
        let shell = annulus(0.5, 1.5, 4.0);
        let mesh = CellMesh::from_shells(&[shell], &options(resolution, 0.25, 0.5)).unwrap();
        let n = resolution as f64;
        let polygon_area = 0.5 * n * (TAU / n).sin() * (1.5f64.powi(2) - 0.5f64.powi(2));
        assert!((mesh.volume() - polygon_area * 4.0).abs() < 1e-9);
        assert!(mesh.volume() < shell.volume());
    }

    #[test]
    fn points_stay_inside_shell() {
        let shell = annulus(0.5, 1.5, 4.0);
        let mesh = CellMesh::from_shells(&[shell], &options(12, 0.25, 0.5)).unwrap();
        for [x, y, z] in &mesh.points {
            let r = (x * x + y * y).sqrt();
            assert!(r >= shell.r_inner - 1e-12 && r <= shell.r_outer + 1e-12);
            assert!(*z >= shell.z_min - 1e-12 && *z <= shell.z_max() + 1e-12);
        }
    }

    #[test]
    fn cells_reference_their_shell() {
        let shells = [annulus(0.0, 0.5, 1.0), annulus(0.5, 1.0, 1.0)];
        let mesh = CellMesh::from_shells(&shells, &options(4, 1.0, 1.0)).unwrap();
        assert_eq!(mesh.cells[0].shell, 0);
        assert_eq!(mesh.cells.last().unwrap().shell, 1);
        assert!(mesh
            .cells
            .iter()
            .flat_map(|c| c.vertices.iter())
            .all(|&v| v < mesh.points.len()));
    }

    #[rstest]
    #[case(2, 0.5, 0.5)]
    #[case(8, 0.0, 0.5)]
    #[case(8, 0.5, f64::INFINITY)]
    #[case(8, 1e-300, 0.5)]
    #[case(8, 0.5, 1e-300)]
    #[case(usize::MAX, 0.5, 0.5)]
    fn bad_options_rejected(#[case] resolution: usize, #[case] max_dr: f64, #[case] max_dz: f64) {
        let result = CellMesh::from_shells(
            &[annulus(0.0, 1.0, 1.0)],
            &options(resolution, max_dr, max_dz),
        );
        assert!(result.is_err());
    }

    #[test]
    fn oversized_mesh_rejected() {
        let options = options(MAX_RESOLUTION, 1e-3, 1e-3);
        assert!(options.validate().is_ok());

        let shells = [annulus(0.0, 1.0, 1.0)];
        let (n_cells, _) = options.estimate(&shells);
        assert!(n_cells > MAX_MESH_SIZE as f64);
        assert!(CellMesh::from_shells(&shells, &options).is_err());
    }
}
