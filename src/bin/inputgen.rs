//! Command line generation of solver input blocks
//!
//! Emits the `AuxVariables`, `AuxKernels`, and `UserObjects` blocks needed to
//! read a reference solution from a mesh file and expose it as elemental
//! auxiliary variables, one set of blocks per variable.
//!
//! # Usage
//!
//! ```text
//! Usage: inputgen [options]
//! ```
//!
//! With no options the standard list of variables is written to stdout, ready
//! to be redirected into an input file.
//!
//! ```bash
//! inputgen > blocks.i
//! ```
//!
//! ## Variable options
//!
//! ### > How to choose the variables
//!
//! ```bash
//! # Variables given directly
//! inputgen --vars power keff
//!
//! # Variables from a file, one or more per line, '#' for comments
//! inputgen --file names.txt
//! ```
//!
//! ### > How to see the default variables
//!
//! ```bash
//! inputgen --list
//! ```
//!
//! ## Block options
//!
//! ### > How to generate only some sections
//!
//! ```bash
//! # Only the user objects, wrapped in the [UserObjects] header
//! inputgen --sections user-objects --wrap
//! ```
//!
//! ### > How to change the reference solution
//!
//! ```bash
//! inputgen --mesh-file reference.e --timestep 4
//! ```

// standard libraries
use std::io::Write;

// crate modules
use pbfhr::input::{InputGenerator, Section, DEFAULT_MESH_FILE, DEFAULT_VARIABLES};
use pbfhr::read_names_file;
use pbfhr::utils::*;

// external crates
use anyhow::Result;
use clap::{arg, Parser};
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    if cli.list {
        println!("{}", textwrap::fill(&DEFAULT_VARIABLES.join(" "), 70));
        return Ok(());
    }

    let names = collect_names(&cli)?;
    if names.is_empty() {
        warn!("No variable names found, nothing will be generated");
    }

    let generator = generator_init(&cli);

    match &cli.output {
        Some(path) => {
            info!("Writing {} variables to {path}", names.len());
            generator.write(path, &names)?;
        }
        None => {
            debug!("Writing {} variables to stdout", names.len());
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            generator.write_to(&mut handle, &names)?;
            handle.flush()?;
        }
    }

    Ok(())
}

#[allow(rustdoc::invalid_rust_codeblocks)]
/// Generate AuxVariables, AuxKernels, and UserObjects input blocks
///
/// Examples
/// --------
///
///  Typical use:
///     $ inputgen > blocks.i
///
///  Choose the variables:
///     $ inputgen --vars power flux1g keff
///     $ inputgen --file names.txt
///
///  Only generate some sections:
///     $ inputgen --sections aux-variables aux-kernels
///
///  Wrap each section in its top level header:
///     $ inputgen --wrap -o blocks.i
///
/// Notes
/// -----
///
/// Variable names are not checked, whatever is given is written into
/// the blocks as-is.
///
/// Sections are always written in the order given to --sections.
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    before_help(banner("Pbfhr :: Input Generator")),
    after_help("Typical use: inputgen > blocks.i \n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("inputgen [options]")
)]
struct Cli {
    // * Optional
    /// Variable name(s) to generate blocks for
    ///
    /// Defaults to the standard reference solution variables (see --list).
    #[arg(help_heading("Variable options"))]
    #[arg(long)]
    #[arg(value_parser, num_args = 1.., value_delimiter = ' ')]
    #[clap(required = false)]
    #[arg(conflicts_with = "file")]
    #[arg(value_name = "list")]
    vars: Vec<String>,

    /// File of variable names
    ///
    /// Names are separated by whitespace or commas, and anything after a
    /// '#' is a comment.
    #[arg(help_heading("Variable options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    file: Option<String>,

    /// Print the default variable names and exit
    #[arg(help_heading("Variable options"))]
    #[arg(short, long)]
    list: bool,

    /// Section(s) to generate, in order
    ///
    /// Available sections:
    ///     > aux-variables
    ///     > aux-kernels
    ///     > user-objects
    /// Defaults to all three in the order above.
    #[arg(help_heading("Block options"))]
    #[arg(short, long, value_enum)]
    #[arg(num_args = 1.., value_delimiter = ' ')]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "list")]
    sections: Vec<Section>,

    /// Mesh blocks for variables and kernels
    #[arg(help_heading("Block options"))]
    #[arg(short, long)]
    #[arg(default_value = "1 2 3")]
    #[arg(value_name = "ids")]
    block: String,

    /// Mesh file holding the reference solution
    #[arg(help_heading("Block options"))]
    #[arg(short, long)]
    #[arg(default_value = DEFAULT_MESH_FILE)]
    #[arg(value_name = "path")]
    mesh_file: String,

    /// Timestep of the reference solution
    #[arg(help_heading("Block options"))]
    #[arg(short, long)]
    #[arg(default_value_t = 1)]
    #[arg(value_name = "step")]
    timestep: u32,

    /// When the auxiliary kernels execute
    #[arg(help_heading("Block options"))]
    #[arg(short, long)]
    #[arg(default_value = "timestep_begin")]
    #[arg(value_name = "flag")]
    execute_on: String,

    /// Wrap each section in its top level [Header] ... []
    #[arg(help_heading("Block options"))]
    #[arg(short, long)]
    wrap: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    #[arg(value_name = "path")]
    output: Option<String>,

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

/// Sets up logging at runtime to allow for multiple verbosity levels
#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) {
    stderrlog::new()
        .modules(vec![module_path!(), "pbfhr::input", "pbfhr::readers"])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
        .unwrap();
}

#[doc(hidden)]
fn collect_names(cli: &Cli) -> Result<Vec<String>> {
    if let Some(path) = &cli.file {
        info!("Reading variable names from {path}");
        return read_names_file(path);
    }

    if cli.vars.is_empty() {
        debug!("Using the default variable names");
        Ok(DEFAULT_VARIABLES.iter().map(|s| s.to_string()).collect())
    } else {
        Ok(cli.vars.clone())
    }
}

#[doc(hidden)]
fn generator_init(cli: &Cli) -> InputGenerator {
    let sections = match cli.sections.is_empty() {
        true => Section::ALL.to_vec(),
        false => cli.sections.clone(),
    };

    InputGenerator {
        block: cli.block.clone(),
        mesh_file: cli.mesh_file.clone(),
        timestep: cli.timestep,
        execute_on: cli.execute_on.clone(),
        sections,
        wrap: cli.wrap,
    }
}
