//! Geometry parameters of the PB-FHR Mk1 core
//!
//! All dimensions are in metres. The defaults describe the coarse Mk1 core,
//! and any of them may be overridden from a JSON file through
//! [read_geometry_file](crate::readers::read_geometry_file).
//!
//! ```rust
//! # use pbfhr::geometry::CoreGeometry;
//! let core = CoreGeometry::default();
//! assert_eq!(core.r_or_inner(), 1.55);
//! assert_eq!(core.r_or_outer(), 2.55);
//! ```

// internal modules
use crate::mesh::{MeshBuilder, Region};
use crate::utils::*;

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Radial and axial dimensions of the core
///
/// Regions are stacked outwards from the central reflector: fuel pebbles,
/// graphite pebbles, then the outer reflector. The defuelling and refuelling
/// chutes sit below and above the active region.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoreGeometry {
    /// Radius of central reflector [m]
    pub r_cr: f64,
    /// Number of radial zones in fuel region
    pub n_fz: usize,
    /// Thickness of fuel pebble layer [m]
    pub t_fp: f64,
    /// Thickness of graphite pebble layer [m]
    pub t_gp: f64,
    /// Thickness of outer reflector [m]
    pub t_or: f64,
    /// Height of active fuel region [m]
    pub h_active: f64,
    /// Height of defuelling chute [m]
    pub h_defuel: f64,
    /// Height of refuelling chute [m]
    pub h_refuel: f64,
}

impl Default for CoreGeometry {
    fn default() -> Self {
        Self {
            r_cr: 0.5,
            n_fz: 4,
            t_fp: 1.0,
            t_gp: 0.05,
            t_or: 1.0,
            h_active: 4.0,
            h_defuel: 0.5,
            h_refuel: 0.5,
        }
    }
}

impl CoreGeometry {
    /// Inner radius of outer reflector [m]
    pub fn r_or_inner(&self) -> f64 {
        self.r_cr + self.t_fp + self.t_gp
    }

    /// Outer radius of outer reflector [m]
    pub fn r_or_outer(&self) -> f64 {
        self.r_or_inner() + self.t_or
    }

    /// Height from the bottom of the defuelling chute to the top of the
    /// refuelling chute [m]
    pub fn total_height(&self) -> f64 {
        self.h_defuel + self.h_active + self.h_refuel
    }

    /// Reject dimensions that cannot describe a physical core
    pub fn validate(&self) -> Result<()> {
        let dimensions = [
            ("r_cr", self.r_cr),
            ("t_fp", self.t_fp),
            ("t_gp", self.t_gp),
            ("t_or", self.t_or),
            ("h_active", self.h_active),
            ("h_defuel", self.h_defuel),
            ("h_refuel", self.h_refuel),
        ];

        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                bail!("Geometry parameter {name} must be positive, found {value}");
            }
        }

        if self.n_fz == 0 {
            bail!("At least one radial fuel zone is required");
        }

        Ok(())
    }

    /// Write the geometry to `path` as pretty printed JSON
    ///
    /// The output reads back through
    /// [read_geometry_file](crate::readers::read_geometry_file).
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| f!("Could not create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .flush()
            .with_context(|| f!("Could not write {}", path.display()))?;
        debug!("Wrote geometry to {}", path.display());
        Ok(())
    }

    /// Lay the core out as concentric shells on a [MeshBuilder]
    ///
    /// z = 0 is the bottom of the active region. The central and outer
    /// reflectors span the full height including both chutes, while the
    /// pebble bed regions only cover the active height.
    pub fn compose(&self, builder: &mut MeshBuilder) -> Result<()> {
        self.validate()?;
        debug!("Composing core shells:\n{self}");

        // central reflector over the full height
        builder.layer(-self.h_defuel, 0.0)?;
        builder.add_cyl(Region::CentralReflector, self.r_cr, self.total_height())?;

        // pebble bed over the active height, fuel split into equal zones
        builder.layer(0.0, self.r_cr)?;
        for zone in 1..=self.n_fz {
            let r = self.r_cr + self.t_fp * zone as f64 / self.n_fz as f64;
            builder.add_cyl(Region::FuelPebbles(zone), r, self.h_active)?;
        }
        builder.add_cyl(Region::GraphitePebbles, self.r_or_inner(), self.h_active)?;

        // outer reflector over the full height
        builder.layer(-self.h_defuel, self.r_or_inner())?;
        builder.add_cyl(Region::OuterReflector, self.r_or_outer(), self.total_height())?;

        // chutes below and above the pebble bed
        builder.layer(-self.h_defuel, self.r_cr)?;
        builder.add_cyl(Region::DefuelChute, self.r_or_inner(), self.h_defuel)?;

        builder.layer(self.h_active, self.r_cr)?;
        builder.add_cyl(Region::RefuelChute, self.r_or_inner(), self.h_refuel)?;

        Ok(())
    }
}

impl std::fmt::Display for CoreGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "CoreGeometry {\n".to_string();
        s += &f!("    central reflector radius: {} m\n", self.r_cr);
        s += &f!("    fuel zones: {}\n", self.n_fz);
        s += &f!("    fuel pebble layer: {} m\n", self.t_fp);
        s += &f!("    graphite pebble layer: {} m\n", self.t_gp);
        s += &f!("    outer reflector: {} m\n", self.t_or);
        s += &f!("    outer reflector inner radius: {} m\n", self.r_or_inner());
        s += &f!("    outer reflector outer radius: {} m\n", self.r_or_outer());
        s += &f!("    active height: {} m\n", self.h_active);
        s += &f!("    defuelling chute: {} m\n", self.h_defuel);
        s += &f!("    refuelling chute: {} m\n}}", self.h_refuel);
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshOptions, OutputOptions, Shell};
    use rstest::rstest;

    fn composed(core: &CoreGeometry) -> Result<Vec<Shell>> {
        let mut builder =
            MeshBuilder::setup("core.vtu", MeshOptions::default(), OutputOptions::default())?;
        let result = core.compose(&mut builder);
        let shells = builder.shells().to_vec();
        builder.discard();
        result.map(|_| shells)
    }

    #[test]
    fn derived_radii_are_exact() {
        let core = CoreGeometry::default();
        assert_eq!(core.r_or_inner(), core.r_cr + core.t_fp + core.t_gp);
        assert_eq!(core.r_or_outer(), core.r_or_inner() + core.t_or);
        assert_eq!(core.r_or_inner(), 1.55);
        assert_eq!(core.r_or_outer(), 2.55);
        assert_eq!(core.total_height(), 5.0);
    }

    #[test]
    fn default_core_shells() {
        let core = CoreGeometry::default();
        let shells = composed(&core).unwrap();
        assert_eq!(shells.len(), core.n_fz + 5);

        let fuel: Vec<&Shell> = shells
            .iter()
            .filter(|s| matches!(s.region, Region::FuelPebbles(_)))
            .collect();
        assert_eq!(fuel.len(), 4);
        assert_eq!(fuel[0].r_inner, 0.5);
        assert_eq!(fuel[3].r_outer, 1.5);
        assert!(fuel.iter().all(|s| s.z_min == 0.0 && s.height == 4.0));
    }

    #[test]
    fn reflectors_span_full_height() {
        let shells = composed(&CoreGeometry::default()).unwrap();
        for shell in shells.iter().filter(|s| s.region.block_id() == 3) {
            assert_eq!(shell.z_min, -0.5);
            assert_eq!(shell.z_max(), 4.5);
        }
    }

    #[test]
    fn chutes_cap_the_pebble_bed() {
        let core = CoreGeometry::default();
        let shells = composed(&core).unwrap();

        let defuel = shells.iter().find(|s| s.region == Region::DefuelChute).unwrap();
        assert_eq!((defuel.z_min, defuel.z_max()), (-0.5, 0.0));
        assert_eq!((defuel.r_inner, defuel.r_outer), (0.5, core.r_or_inner()));

        let refuel = shells.iter().find(|s| s.region == Region::RefuelChute).unwrap();
        assert_eq!((refuel.z_min, refuel.z_max()), (4.0, 4.5));
    }

    #[test]
    fn shells_fill_the_cylinder() {
        let core = CoreGeometry::default();
        let shells = composed(&core).unwrap();
        let total: f64 = shells.iter().map(|s| s.volume()).sum();
        let expected = std::f64::consts::PI * core.r_or_outer().powi(2) * core.total_height();
        assert!((total - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case::no_fuel_zones(CoreGeometry { n_fz: 0, ..Default::default() })]
    #[case::no_chute(CoreGeometry { h_defuel: 0.0, ..Default::default() })]
    #[case::negative_reflector(CoreGeometry { t_or: -1.0, ..Default::default() })]
    #[case::nan_radius(CoreGeometry { r_cr: f64::NAN, ..Default::default() })]
    fn invalid_geometry(#[case] core: CoreGeometry) {
        assert!(core.validate().is_err());
        assert!(composed(&core).is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let core: CoreGeometry = serde_json::from_str(r#"{ "n_fz": 2, "h_active": 3.0 }"#).unwrap();
        assert_eq!(core.n_fz, 2);
        assert_eq!(core.h_active, 3.0);
        assert_eq!(core.r_cr, 0.5);
        assert_eq!(composed(&core).unwrap().len(), 7);
    }

    #[test]
    fn json_written_reads_back() {
        let path = TempPath::new("geometry_dump.json");
        let core = CoreGeometry {
            n_fz: 6,
            t_or: 0.75,
            ..Default::default()
        };
        core.write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.trim_end().ends_with('}'));
        assert_eq!(crate::read_geometry_file(&*path).unwrap(), core);
    }

    #[test]
    fn write_json_rejects_missing_directory() {
        let path = Path::new("/definitely/not/a/real/dir/core.json");
        assert!(CoreGeometry::default().write_json(path).is_err());
    }
}
