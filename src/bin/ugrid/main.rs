//! ugrid CLI - UGRID netCDF mesh inspection tool.
//!
//! Usage: ugrid <COMMAND> <INPUT> [OUTPUT]
//!
//! Run `ugrid --help` for available commands.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use ugrid::io;
use ugrid::prelude::UgridError;

#[derive(Parser)]
#[command(name = "ugrid")]
#[command(author, version, about = "UGRID mesh CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,

        /// Show metadata and data set attributes
        #[arg(long)]
        attributes: bool,
    },

    /// Validate a mesh file and report every violation found
    Validate {
        /// Input mesh file
        input: PathBuf,
    },

    /// Load a mesh and rewrite it in canonical form (0-based, row-major)
    Rewrite {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Derive and store the unique undirected edges
        #[arg(long)]
        with_edges: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input, attributes } => {
            cmd_info(&input, attributes)?;
        }

        Commands::Validate { input } => {
            cmd_validate(&input)?;
        }

        Commands::Rewrite { input, output, with_edges } => {
            cmd_rewrite(&input, &output, with_edges)?;
        }
    }

    Ok(())
}

fn cmd_info(input: &PathBuf, show_attributes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Nodes: {} ({}D)", mesh.num_nodes(), mesh.dim());
    println!("Faces: {}", mesh.num_faces());
    match mesh.supplied_edges() {
        Some(edges) => println!("Edges: {} (stored)", edges.len()),
        None => println!("Edges: none stored"),
    }

    if !mesh.boundaries().is_empty() {
        let total: usize = mesh.boundaries().values().map(Vec::len).sum();
        println!("Boundary edges: {}", total);
    }

    if let Ok((min, max)) = mesh.bounding_box() {
        if mesh.dim() == 3 {
            println!(
                "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
                min.x, min.y, min.z, max.x, max.y, max.z
            );
        } else {
            println!("Bounding box: ({:.3}, {:.3}) to ({:.3}, {:.3})", min.x, min.y, max.x, max.y);
        }
    }

    if !mesh.data().is_empty() {
        println!("Data sets:");
        for data in mesh.data().values() {
            println!("  {} ({}, {} values)", data.name, data.location.as_str(), data.values.len());
            if show_attributes {
                for (key, value) in &data.attributes {
                    println!("    {}: {}", key, value);
                }
            }
        }
    }

    if show_attributes && !mesh.metadata().is_empty() {
        println!("Metadata:");
        for (key, value) in mesh.metadata() {
            println!("  {}: {}", key, value);
        }
    }

    Ok(())
}

fn cmd_validate(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    // Loading already validates; unpack a validation failure into one
    // line per violation so they are easy to act on.
    match io::load(input) {
        Ok(mesh) => {
            println!(
                "{}: OK ({} nodes, {} faces)",
                input.display(),
                mesh.num_nodes(),
                mesh.num_faces()
            );
            Ok(())
        }
        Err(UgridError::Validation(violations)) => {
            eprintln!("{}: {} violation(s)", input.display(), violations.len());
            for violation in &violations {
                eprintln!("  {}", violation);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_rewrite(
    input: &PathBuf,
    output: &PathBuf,
    with_edges: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = io::load(input)?;

    println!("Loaded: {} nodes, {} faces", mesh.num_nodes(), mesh.num_faces());

    if with_edges && mesh.supplied_edges().is_none() {
        let edges: Vec<[usize; 2]> = mesh.derive_edges().to_vec();
        println!("Derived {} edges", edges.len());
        mesh.set_edges(edges)?;
    }

    let start = Instant::now();
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), start.elapsed());

    Ok(())
}
