//! Example sampling quadrilateral cuts across many seeds.
//!
//! This example shows how to:
//! - Cut an image into jittered quadrilateral pieces with a `PartitionConfig`
//! - Sample many seeds in parallel
//! - Pick the seed whose smallest piece is largest (the most even cut)
//!
//! # Usage
//!
//! ```sh
//! cargo run --example sample_layouts
//! ```
//!
//! Choose the grid and sampling budget:
//!
//! ```sh
//! cargo run --example sample_layouts -- --cols 6 --rows 4 --max-tries 5000
//! ```
//!
//! Try a stronger jitter:
//!
//! ```sh
//! cargo run --example sample_layouts -- --jitter 0.4
//! ```

use std::process;

use clap::Parser;
use jigsaw_core::{GridSize, geom::polygon_area};
use jigsaw_generator::{Partition, PartitionConfig, PieceMode, ShapeSeed};
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of columns.
    #[arg(long, default_value_t = 4)]
    cols: u16,

    /// Number of rows.
    #[arg(long, default_value_t = 4)]
    rows: u16,

    /// Puzzle width in pixels.
    #[arg(long, default_value_t = 680)]
    width: u32,

    /// Puzzle height in pixels.
    #[arg(long, default_value_t = 460)]
    height: u32,

    /// Lattice jitter as a fraction of the cell size.
    #[arg(long, default_value_t = 0.28)]
    jitter: f32,

    /// Seeds to sample.
    #[arg(long, value_name = "COUNT", default_value_t = 1_000)]
    max_tries: u32,
}

fn main() {
    let args = Args::parse();
    if args.max_tries == 0 {
        eprintln!("--max-tries must be at least 1.");
        process::exit(1);
    }

    let config = PartitionConfig::new(
        args.width,
        args.height,
        GridSize::new(args.cols, args.rows),
        PieceMode::Quad,
    )
    .with_quad_jitter_ratio(args.jitter);

    let best = (0..args.max_tries)
        .into_par_iter()
        .map(|value| {
            let seed = ShapeSeed::new(value);
            let partition = Partition::generate(&config, seed);
            (seed, min_area(&partition), partition)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1));

    let Some((seed, area, partition)) = best else {
        eprintln!("No layout was sampled.");
        process::exit(1);
    };

    let cell_area = partition.cell_width() * partition.cell_height();
    println!("Seed:");
    println!("  {seed}");
    println!();
    println!("Selection:");
    println!("  Max tries: {}", args.max_tries);
    println!("  Smallest piece: {area:.1} px² ({:.0}% of a cell)", area / cell_area * 100.0);
    println!();
    println!("Pieces:");
    for piece in partition.pieces() {
        println!(
            "  {} anchor=({:.0}, {:.0}) size={}x{} area={:.1}",
            piece.grid_pos,
            piece.anchor.x,
            piece.anchor.y,
            piece.width,
            piece.height,
            polygon_area(&piece.outline),
        );
    }
}

fn min_area(partition: &Partition) -> f32 {
    partition
        .pieces()
        .iter()
        .map(|piece| polygon_area(&piece.outline))
        .fold(f32::INFINITY, f32::min)
}
