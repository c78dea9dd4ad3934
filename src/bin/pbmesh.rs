//! Command line generation of the PB-FHR core mesh
//!
//! Builds a coarse PB-FHR Mk1 core out of concentric cylindrical shells and
//! writes it to a VTK unstructured grid.
//!
//! # Usage
//!
//! ```text
//! Usage: pbmesh [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, and any important behaviour.
//!
//! ## Geometry options
//!
//! ### > How to change the core dimensions
//!
//! By default the Mk1 dimensions are used. Any of them can be overridden with
//! a JSON file, and anything missing from the file keeps its default.
//!
//! ```bash
//! # Write out the defaults to start from
//! pbmesh --dump-config core.json
//!
//! # Build the mesh from the edited file
//! pbmesh --config core.json
//! ```
//!
//! ### > How to refine the mesh
//!
//! Cylinders are approximated by straight edge segments, so the number of
//! theta segments can be increased to round them off. Radial and axial cell
//! sizes are capped separately.
//!
//! ```bash
//! # 72 theta segments, cells no larger than 0.1 m radially or 0.25 m axially
//! pbmesh --resolution 72 --max-dr 0.1 --max-dz 0.25
//! ```
//!
//! ## VTK options
//!
//! ### > How to change the output file name
//!
//! The default file prefix is `pbfhr`, and the extension matches the format.
//!
//! ```bash
//! # Output as legacy binary to `coarse.vtk`
//! pbmesh --output coarse --format legacy-binary
//! ```
//!
//! ### > How to specify compression and byte order
//!
//! ```bash
//! pbmesh --compressor zlib --endian little-endian
//! ```

// standard libraries
use std::path::PathBuf;

// crate modules
use pbfhr::geometry::CoreGeometry;
use pbfhr::mesh::{build_mesh, MeshOptions, OutputOptions};
use pbfhr::read_geometry_file;
use pbfhr::utils::*;
use pbfhr::vtk::VtkFormat;

// external crates
use anyhow::Result;
use clap::{arg, Parser, ValueEnum};
use log::*;
use vtkio::model::ByteOrder;
use vtkio::xml::Compressor;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make Info the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    // Get the core geometry
    let geometry = try_geometry_read(&cli)?;
    debug!("{geometry}");

    if let Some(path) = &cli.dump_config {
        info!("Writing geometry to {}", path.display());
        return geometry.write_json(path);
    }

    info!(
        "Outer reflector radii: {} m to {} m",
        geometry.r_or_inner(),
        geometry.r_or_outer()
    );

    // decide the extension for them because people won't read the --help
    let path = get_output_path(&cli);

    // Compose the shells, discretise, and write in one scoped call
    let summary = build_mesh(
        &path,
        mesh_options_init(&cli),
        output_options_init(&cli),
        |builder| geometry.compose(builder),
    )?;

    info!("{summary}");
    Ok(())
}

#[allow(rustdoc::invalid_rust_codeblocks)]
/// Generate a coarse PB-FHR core mesh in VTK formats
///
/// Examples
/// --------
///
///  Typical use:
///     $ pbmesh -o my_core
///
///  Use custom core dimensions:
///     $ pbmesh --config core.json
///
///  Write the default dimensions to edit:
///     $ pbmesh --dump-config core.json
///
///  Refine the mesh:
///     $ pbmesh --resolution 72 --max-dr 0.1 --max-dz 0.25
///
///  Output legacy in ascii format:
///     $ pbmesh --format legacy-ascii
///
/// Notes
/// -----
///
/// z = 0 is the bottom of the active region. The central and outer
/// reflectors span both chutes as well as the active height.
///
/// Cells carry block_id, shell, zone, and volume cell data. Block ids
/// are 1 fuel, 2 graphite pebbles, 3 reflectors, 4 defuelling chute,
/// and 5 refuelling chute.
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    before_help(banner("Pbfhr :: Core Mesh")),
    after_help("Typical use: pbmesh -o my_core \n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("pbmesh [options]")
)]
struct Cli {
    // * Optional
    /// Path to a JSON geometry file
    ///
    /// Any dimension missing from the file keeps the Mk1 default.
    #[arg(help_heading("Geometry options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    config: Option<PathBuf>,

    /// Write the geometry to a JSON file and exit
    ///
    /// Useful as a starting point for a custom --config file. Includes any
    /// values read with --config.
    #[arg(help_heading("Geometry options"))]
    #[arg(long)]
    #[arg(value_name = "path")]
    dump_config: Option<PathBuf>,

    /// Number of theta segments around each ring
    ///
    /// Cylinders are approximated to straight edge segments so increasing
    /// this rounds off the mesh. Must be at least 3.
    #[arg(help_heading("Mesh options"))]
    #[arg(short, long)]
    #[arg(default_value_t = 24)]
    #[arg(value_name = "res")]
    resolution: usize,

    /// Maximum radial cell size (m)
    #[arg(help_heading("Mesh options"))]
    #[arg(long)]
    #[arg(default_value_t = 0.25)]
    #[arg(value_name = "size")]
    max_dr: f64,

    /// Maximum axial cell size (m)
    #[arg(help_heading("Mesh options"))]
    #[arg(long)]
    #[arg(default_value_t = 0.5)]
    #[arg(value_name = "size")]
    max_dz: f64,

    /// Name of output file (excl. extension)
    ///
    /// Defaults to `pbfhr`, and will automatically append the correct
    /// extension.
    #[arg(help_heading("Vtk options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    output: Option<String>,

    /// VTK output format
    ///
    /// Available visual toolkit file formats:
    ///     > xml (default)
    ///     > legacy-ascii
    ///     > legacy-binary
    #[arg(help_heading("Vtk options"))]
    #[arg(short, long, value_enum)]
    #[arg(hide_default_value(true))]
    #[arg(default_value_t = VtkFormat::Xml)]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "format")]
    format: VtkFormat,

    /// Byte ordering
    ///
    /// Visit only reads big endian, most sytems are little endian.
    /// Defaults to big endian for convenience over performance.
    ///     > big-endian (default)
    ///     > little-endian
    #[arg(help_heading("Vtk options"))]
    #[arg(long, value_enum)]
    #[arg(hide_default_value(true))]
    #[arg(default_value_t = CliByteOrder::BigEndian)]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "endian")]
    endian: CliByteOrder,

    /// Compression method for xml
    ///
    /// Generally just use LZMA but other options are available.
    ///     > lzma (default)
    ///     > lz4
    ///     > zlib
    ///     > none
    #[arg(long, value_enum)]
    #[arg(help_heading("Vtk options"))]
    #[arg(hide_default_value(true))]
    #[arg(default_value_t = CliCompressor::LZMA)]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "compressor")]
    compressor: CliCompressor,

    // * Flags
    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long)]
    #[arg(action = clap::ArgAction::Count)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

// Wrapper for byte order used by vtkio
#[doc(hidden)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliByteOrder {
    BigEndian,
    LittleEndian,
}

// Wrapper for compression strategy used by vtkio
#[doc(hidden)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliCompressor {
    LZ4,
    ZLib,
    LZMA,
    None,
}

#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) {
    stderrlog::new()
        .modules(vec![
            module_path!(),
            "pbfhr::geometry",
            "pbfhr::mesh",
            "pbfhr::readers",
            "pbfhr::vtk",
        ])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
        .unwrap();
}

#[doc(hidden)]
fn try_geometry_read(cli: &Cli) -> Result<CoreGeometry> {
    match &cli.config {
        Some(path) => {
            info!("Reading {}", path.display());
            read_geometry_file(path)
        }
        None => {
            debug!("Using default Mk1 geometry");
            Ok(CoreGeometry::default())
        }
    }
}

#[doc(hidden)]
fn mesh_options_init(cli: &Cli) -> MeshOptions {
    MeshOptions {
        resolution: cli.resolution,
        max_dr: cli.max_dr,
        max_dz: cli.max_dz,
        disable_progress: cli.quiet || cli.verbose > 1,
    }
}

#[doc(hidden)]
fn output_options_init(cli: &Cli) -> OutputOptions {
    OutputOptions {
        format: cli.format,
        byte_order: match cli.endian {
            CliByteOrder::LittleEndian => ByteOrder::LittleEndian,
            CliByteOrder::BigEndian => ByteOrder::BigEndian,
        },
        compressor: match cli.compressor {
            CliCompressor::LZMA => Compressor::LZMA,
            CliCompressor::LZ4 => Compressor::LZ4,
            CliCompressor::ZLib => Compressor::ZLib,
            CliCompressor::None => Compressor::None,
        },
    }
}

#[doc(hidden)]
fn get_output_path(cli: &Cli) -> String {
    let name = cli.output.clone().unwrap_or(String::from("pbfhr"));
    let path = f!("{}.{}", name, cli.format.extension());
    debug!("Set output path to {path}");
    path
}
