//! Cylindrical shells and the core regions they belong to

// internal modules
use crate::utils::*;

// external crates
use anyhow::{bail, Result};

/// Named region of the core that a [Shell] fills
///
/// Every region maps onto a block id in the solver input. Blocks 1, 2 and 3
/// are the pebble bed and reflectors, which is why the generated auxiliary
/// variables are restricted to `block = '1 2 3'`.
///
/// | Region              | Block id |
/// | ------------------- | -------- |
/// | `FuelPebbles(zone)` | 1        |
/// | `GraphitePebbles`   | 2        |
/// | `CentralReflector`  | 3        |
/// | `OuterReflector`    | 3        |
/// | `DefuelChute`       | 4        |
/// | `RefuelChute`       | 5        |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Graphite column at the centre of the core
    CentralReflector,
    /// Radial fuel zone of the pebble bed, numbered outwards from 1
    FuelPebbles(usize),
    /// Layer of graphite pebbles around the fuel
    GraphitePebbles,
    /// Graphite annulus bounding the core
    OuterReflector,
    /// Chute below the active region
    DefuelChute,
    /// Chute above the active region
    RefuelChute,
}

impl Region {
    /// Block id used for this region in the solver input
    ///
    /// ```rust
    /// # use pbfhr::mesh::Region;
    /// assert_eq!(Region::FuelPebbles(3).block_id(), 1);
    /// assert_eq!(Region::OuterReflector.block_id(), 3);
    /// ```
    pub const fn block_id(&self) -> i32 {
        match self {
            Self::FuelPebbles(_) => 1,
            Self::GraphitePebbles => 2,
            Self::CentralReflector | Self::OuterReflector => 3,
            Self::DefuelChute => 4,
            Self::RefuelChute => 5,
        }
    }

    /// Fuel zone number, or 0 for anything that is not fuel
    pub const fn zone(&self) -> usize {
        match self {
            Self::FuelPebbles(zone) => *zone,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::CentralReflector => write!(f, "central reflector"),
            Self::FuelPebbles(zone) => write!(f, "fuel pebbles (zone {zone})"),
            Self::GraphitePebbles => write!(f, "graphite pebbles"),
            Self::OuterReflector => write!(f, "outer reflector"),
            Self::DefuelChute => write!(f, "defuelling chute"),
            Self::RefuelChute => write!(f, "refuelling chute"),
        }
    }
}

/// Annular cylinder aligned with the z axis
///
/// Covers `r_inner <= r <= r_outer` and `z_min <= z <= z_min + height`. A
/// solid cylinder simply has `r_inner = 0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shell {
    /// Region of the core this shell belongs to
    pub region: Region,
    /// Inner radius (m)
    pub r_inner: f64,
    /// Outer radius (m)
    pub r_outer: f64,
    /// Height of the bottom face (m)
    pub z_min: f64,
    /// Axial extent (m)
    pub height: f64,
}

impl Shell {
    /// Radial thickness of the shell
    pub fn thickness(&self) -> f64 {
        self.r_outer - self.r_inner
    }

    /// Height of the top face
    pub fn z_max(&self) -> f64 {
        self.z_min + self.height
    }

    /// Exact volume of the annulus
    ///
    /// ```rust
    /// # use pbfhr::mesh::{Region, Shell};
    /// let shell = Shell {
    ///     region: Region::CentralReflector,
    ///     r_inner: 0.0,
    ///     r_outer: 1.0,
    ///     z_min: 0.0,
    ///     height: 2.0,
    /// };
    /// assert!((shell.volume() - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    /// ```
    pub fn volume(&self) -> f64 {
        std::f64::consts::PI * (self.r_outer.powi(2) - self.r_inner.powi(2)) * self.height
    }

    /// Check the shell describes a real, non-empty annulus
    pub fn validate(&self) -> Result<()> {
        let values = [self.r_inner, self.r_outer, self.z_min, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            bail!("Non-finite dimension in {} shell: {self}", self.region);
        }
        if self.r_inner < 0.0 {
            bail!("Inner radius must not be negative, found {}", self.r_inner);
        }
        if self.r_outer <= self.r_inner {
            bail!(
                "Outer radius {} must exceed inner radius {} for the {}",
                self.r_outer,
                self.r_inner,
                self.region
            );
        }
        if self.height <= 0.0 {
            bail!("Height must be positive, found {}", self.height);
        }
        Ok(())
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "r = [{}, {}], z = [{}, {}]",
            self.r_inner.sci(3, 2),
            self.r_outer.sci(3, 2),
            self.z_min.sci(3, 2),
            self.z_max().sci(3, 2),
        )
    }
}
