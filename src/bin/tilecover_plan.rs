//! Cover planner binary: decomposes a saved tilemap and prints the covers in
//! visiting order.
//!
//! Usage: cargo run --release --bin tilecover-plan -- --map <PATH> [OPTIONS]
//!
//! Options:
//!   --map <PATH>      Tilemap snapshot (JSON) to read
//!   --vertical        Prefer tall covers (stair runs)
//!   --start <X,Y,Z>   Start the route at the cover nearest this cell
//!   --seed <SEED>     Seed for growth jitter and the 2-opt start order
//!   --closed          Plan a round trip back to the first cover
//!
//! Output: one line per cover, `tile x y z w h d`.

use std::path::PathBuf;
use std::process::ExitCode;

use tilecover::core::{Error, Position, Result, logging};
use tilecover::decompose::{CoverShape, DecomposeConfig, decompose_tilemap};
use tilecover::grid::Tilemap;
use tilecover::route::{PlannerConfig, RoutePlanner};

fn main() -> ExitCode {
    logging::init();

    match run(&std::env::args().collect::<Vec<_>>()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let map = parse_str_arg(args, "--map")
        .map(PathBuf::from)
        .ok_or_else(|| Error::InvalidArgument("--map <PATH> is required".into()))?;
    let start = parse_str_arg(args, "--start").map(|s| parse_position(&s)).transpose()?;
    let seed = parse_u64_arg(args, "--seed")?;
    let closed = has_flag(args, "--closed");

    let decompose_config = DecomposeConfig {
        shape: if has_flag(args, "--vertical") {
            CoverShape::Vertical
        } else {
            CoverShape::Balanced
        },
        seed,
    };
    let planner = RoutePlanner::new(PlannerConfig { closed, seed, ..Default::default() });

    let tilemap = Tilemap::load(&map)?;
    let covers = decompose_tilemap(&tilemap, &decompose_config);
    log::info!("{}: {} covers", map.display(), covers.len());

    for cover in planner.plan_seeded(&covers, start) {
        let [x, y, z, w, h, d] = cover.qube.to_array();
        println!("{} {} {} {} {} {} {}", cover.tile, x, y, z, w, h, d);
    }
    Ok(())
}

fn parse_position(s: &str) -> Result<Position> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::InvalidArgument(format!("bad position '{}'", s)))?;
    match parts[..] {
        [x, y, z] => Ok(Position::new(x, y, z)),
        _ => Err(Error::InvalidArgument(format!("position '{}' needs three coordinates", s))),
    }
}

fn parse_u64_arg(args: &[String], flag: &str) -> Result<Option<u64>> {
    parse_str_arg(args, flag)
        .map(|s| {
            s.parse().map_err(|_| {
                Error::InvalidArgument(format!("{} expects an integer, got '{}'", flag, s))
            })
        })
        .transpose()
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
