use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pietc::runtime::{run_blocks, ConsoleIo};
use pietc::{asm, emit, visualize, BlockGraph, CodelGrid, ProgramGraph, ResolveConfig};

#[derive(Parser, Debug)]
#[command(name = "pietc", version, about = "Piet compiler and interpreter")]
struct Args {
    /// Program image (PNG), `.pas` assembly listing or `.codel` ASCII grid
    input: PathBuf,

    /// Codel size in pixels; 0 auto-detects
    #[arg(short, long, default_value_t = 1)]
    codel_size: u32,

    /// Worker threads for region resolution; 0 uses one per CPU
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Print the compiled program as Rust source instead of running it
    #[arg(long)]
    emit: bool,

    /// Print the basic-block graph as JSON instead of running it
    #[arg(long)]
    dump_blocks: bool,

    /// Render the codel grid to stderr before anything else
    #[arg(long)]
    show_grid: bool,
}

enum Source {
    Grid(CodelGrid),
    Listing(ProgramGraph),
}

fn load(path: &Path, codel_size: u32) -> Result<Source> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match extension.as_str() {
        "pas" => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading listing {}", path.display()))?;
            Ok(Source::Listing(asm::assemble(&source)?))
        }
        "codel" | "txt" => {
            let art = fs::read_to_string(path)
                .with_context(|| format!("reading grid {}", path.display()))?;
            Ok(Source::Grid(CodelGrid::from_ascii(&art)?))
        }
        _ => {
            let image = image::open(path)
                .with_context(|| format!("decoding image {}", path.display()))?
                .to_rgb8();
            Ok(Source::Grid(CodelGrid::from_image(&image, codel_size)?))
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = if args.threads == 0 {
        ResolveConfig::default()
    } else {
        ResolveConfig {
            threads: args.threads,
        }
    };

    let blocks = match load(&args.input, args.codel_size)? {
        Source::Grid(grid) => {
            if args.show_grid {
                eprint!("{}", visualize::render_ansi(&grid));
            }
            pietc::compile_with(&grid, &config)?
        }
        Source::Listing(program) => BlockGraph::from_graph(&program),
    };
    info!(blocks = blocks.len(), "compile completed");

    if args.dump_blocks {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }
    if args.emit {
        print!("{}", emit::emit_rust(&blocks));
        return Ok(());
    }

    let mut io = ConsoleIo::console();
    run_blocks(&blocks, &mut io);
    Ok(())
}
