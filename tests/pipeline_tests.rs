//! End-to-end pipeline tests: grid in, behavior out.

use pietc::runtime::{run_blocks, run_graph, BufferIo};
use pietc::{compile, CodelGrid, Opcode, ProgramGraph, RegionGraph};

fn grid(art: &str) -> CodelGrid {
    CodelGrid::from_ascii(art).expect("valid grid")
}

#[test]
fn single_codel_program_halts_silently() {
    let blocks = compile(&grid("R")).unwrap();
    let mut io = BufferIo::buffer("");
    run_blocks(&blocks, &mut io);
    assert!(io.output().is_empty());
}

#[test]
fn all_achromatic_grid_halts_silently() {
    let blocks = compile(&grid("..#\n#..")).unwrap();
    assert_eq!(blocks.len(), 1);
    let mut io = BufferIo::buffer("");
    run_blocks(&blocks, &mut io);
    assert!(io.output().is_empty());
}

#[test]
fn push_edge_pushes_the_source_cell_count() {
    // red (4 cells) -> yellow is hue +1, brightness 0: push
    let regions = RegionGraph::build(&grid(
        "RRY\n\
         RRY",
    ))
    .unwrap();
    let program = ProgramGraph::from_regions(&regions);
    let entry = program.node(program.entry());
    assert_eq!(entry.op, Opcode::Push);
    assert_eq!(entry.arg, pietc::program::Arg::Value(4));
    // and the edge proceeds to the second region's node set
    match entry.succ {
        pietc::program::Succ::One(next) => assert_eq!(next / 8, 1),
        other => panic!("push should have one successor, got {other:?}"),
    }
}

#[test]
fn push_print_halt_program_runs_to_completion() {
    // red pushes 2, yellow prints it, the dark red region dead-ends into
    // an enclosed white pocket
    let art = "RRY1.#\n\
               ####.#";
    let blocks = compile(&grid(art)).unwrap();
    let mut io = BufferIo::buffer("");
    run_blocks(&blocks, &mut io);
    assert_eq!(io.output().as_slice(), b"2");

    // the unconsolidated graph behaves identically
    let regions = RegionGraph::build(&grid(art)).unwrap();
    let program = ProgramGraph::from_regions(&regions);
    let mut io = BufferIo::buffer("");
    run_graph(&program, &mut io);
    assert_eq!(io.output().as_slice(), b"2");
}

#[test]
fn unknown_pixels_block_like_black() {
    // with ? treated as an obstruction the red region has no exit at all
    let blocks = compile(&grid(
        "?R?\n\
         ?R?\n\
         ???",
    ))
    .unwrap();
    let mut io = BufferIo::buffer("");
    run_blocks(&blocks, &mut io);
    assert!(io.output().is_empty());
}

#[test]
fn white_slide_emits_no_instruction() {
    // red slides across white into yellow: a silent transition, no push
    let regions = RegionGraph::build(&grid("R.Y")).unwrap();
    let program = ProgramGraph::from_regions(&regions);
    let entry = program.node(program.entry());
    assert_eq!(entry.op, Opcode::Nop);
}
