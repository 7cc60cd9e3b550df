//! # Pietc - a Piet compiler and interpreter
//!
//! A compiler and interpreter for the [Piet] esoteric programming language,
//! whose programs are images: grids of colored codels. Pietc partitions the
//! grid into same-color regions, resolves how control slides between them,
//! decodes the color transitions into stack-machine instructions and
//! regroups the resulting control-flow graph into basic blocks, which it
//! either interprets directly or renders as standalone Rust source.
//!
//! [Piet]: https://www.dangermouse.net/esoteric/piet.html
//!
//! ## Features
//!
//! - ✅ **Full codel pipeline** - flood fill, boundary search, instruction
//!   decoding, basic-block extraction
//! - ⚡ **Parallel region resolution** - rayon workers over a shared
//!   write-once search cache
//! - 🔤 **Assembly front-end** - a line-oriented textual notation producing
//!   the same instruction graph
//! - 🧪 **Buffered I/O capability** - run programs against in-memory
//!   streams in tests and harnesses
//!
//! ## Quick Start
//!
//! Compile a codel grid (here via the ASCII notation; images work the same
//! way through [`CodelGrid::from_image`]) and run it:
//!
//! ```rust
//! use pietc::runtime::{run_blocks, BufferIo};
//! use pietc::{compile, CodelGrid};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // red region of 2 pushes 2, yellow prints it, the dark red region
//! // dead-ends into an enclosed white pocket and halts
//! let grid = CodelGrid::from_ascii(
//!     "RRY1.#\n\
//!      ####.#",
//! )?;
//! let blocks = compile(&grid)?;
//!
//! let mut io = BufferIo::buffer("");
//! run_blocks(&blocks, &mut io);
//! assert_eq!(io.output().as_slice(), b"2");
//! # Ok(())
//! # }
//! ```
//!
//! ### Assembly notation
//!
//! The textual front-end builds the same instruction graph, bypassing the
//! image stages:
//!
//! ```rust
//! use pietc::runtime::{run_graph, BufferIo};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let program = pietc::asm::assemble(
//!     "PUSH 72   # 'H'
//!      OUTC
//!      PUSH 105  # 'i'
//!      OUTC
//!      HALT",
//! )?;
//!
//! let mut io = BufferIo::buffer("");
//! run_graph(&program, &mut io);
//! assert_eq!(io.output().as_slice(), b"Hi");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! image/ASCII → CodelGrid → RegionMap → RegionGraph → ProgramGraph → BlockGraph
//!                                                                      │
//!                                                     interpret ←──────┴──────→ emit Rust
//! ```
//!
//! ### Main Components
//!
//! - [`CodelGrid`] - the rectangular table of classified colors
//! - [`RegionMap`] - flood-fill partition into maximal same-color regions
//! - [`RegionGraph`] - per-region directional adjacency via the boundary
//!   search (memoized, cycle-safe, parallelizable)
//! - [`ProgramGraph`] - arena of instruction nodes decoded from color
//!   transitions
//! - [`BlockGraph`] - maximal straight-line blocks with fused push/discard
//!   runs
//! - [`runtime`] - the stack machine, I/O capability and interpreters
//!
//! ## Error Handling
//!
//! Malformed program images never fail: unrecognized pixels become
//! obstructions, enclosed traversals halt. Only the assembly front-end
//! rejects input:
//!
//! ```rust
//! let err = pietc::asm::assemble("PUHS 3").unwrap_err();
//! assert!(err.to_string().contains("Unknown mnemonic"));
//! ```

// Module declarations
/// Version of the pietc crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod asm;
pub mod codel;
pub mod emit;
pub mod error;
pub mod program;
pub mod region;
pub mod runtime;
pub mod visualize;

// Re-export main types
pub use codel::{Brightness, Color, CodelGrid, Hue};
pub use error::{Error, Result};
pub use program::{BasicBlock, BlockGraph, Opcode, ProgramGraph};
pub use region::{RegionGraph, RegionMap, ResolveConfig};

/// Compiles a codel grid all the way to its basic-block graph with the
/// default configuration
pub fn compile(grid: &CodelGrid) -> Result<BlockGraph> {
    compile_with(grid, &ResolveConfig::default())
}

/// Compiles a codel grid all the way to its basic-block graph
pub fn compile_with(grid: &CodelGrid, config: &ResolveConfig) -> Result<BlockGraph> {
    let regions = RegionGraph::build_with(grid, config)?;
    let program = ProgramGraph::from_regions(&regions);
    Ok(BlockGraph::from_graph(&program))
}
