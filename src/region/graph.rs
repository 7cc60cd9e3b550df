//! Region adjacency graph: for every region and every (direction, chooser)
//! state, the region reached by sliding from the region's boundary extremum
//! through white cells, around black cells and grid edges.
//!
//! The boundary search is memoized in a shared write-once cache keyed by
//! (position, direction, chooser). The result of a walk is a pure function
//! of its starting tuple, so concurrent workers racing to fill a cell always
//! store identical values; a worker that misses the cache performs its own
//! walk rather than waiting.

use super::bounds::{region_bounds, Bounds};
use super::fill::{RegionId, RegionMap, DX, DY};
use crate::codel::{Color, CodelGrid};
use crate::error::{Error, Result};
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Outcome of one boundary walk.
///
/// `target: None` is the halt sentinel: `crossed` distinguishes a walk
/// trapped in an enclosed white pocket (`true`) from a plain dead end
/// (`false`). With a target present, `crossed` marks that the very first
/// step entered it, which is what makes the edge an instruction rather than
/// a silent white slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    /// Region entered, or `None` when the walk halts
    pub target: Option<RegionId>,
    /// Direction state on arrival
    pub dp: usize,
    /// Chooser state on arrival
    pub cc: usize,
    /// First-step flag (cyclic flag when `target` is `None`)
    pub crossed: bool,
}

/// One region: color, cell count and the 8-slot adjacency table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Uniform color of the region
    pub color: Color,
    /// Number of cells, the operand of a push edge out of this region
    pub size: usize,
    exits: [Exit; 8],
}

impl Region {
    /// Adjacency slot for (direction, chooser)
    pub fn exit(&self, dp: usize, cc: usize) -> Exit {
        debug_assert!(dp < 4 && cc < 2);
        self.exits[dp * 2 + cc]
    }
}

/// Configuration for parallel region resolution
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Worker count (default: one per CPU); 1 forces a sequential build
    pub threads: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig {
            threads: num_cpus::get(),
        }
    }
}

/// The region adjacency graph. Region 0 is the entry region (the first one
/// discovered by the row-major scan).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGraph {
    regions: Vec<Region>,
}

type SearchCache = DashMap<u64, Exit>;

impl RegionGraph {
    /// Builds the graph from a grid with the default configuration
    pub fn build(grid: &CodelGrid) -> Result<Self> {
        Self::build_with(grid, &ResolveConfig::default())
    }

    /// Builds the graph from a grid with an explicit configuration
    pub fn build_with(grid: &CodelGrid, config: &ResolveConfig) -> Result<Self> {
        let map = RegionMap::build(grid);
        Self::from_map(&map, config)
    }

    /// Builds the graph from an existing region map. The eight walks of
    /// each region are independent of every other region's walks except
    /// through the shared memo cache, so regions resolve in parallel.
    pub fn from_map(map: &RegionMap, config: &ResolveConfig) -> Result<Self> {
        let bounds = region_bounds(map);
        let cache: SearchCache = DashMap::new();
        let count = map.region_count();
        let all_exits: Vec<[Exit; 8]> = if count <= 1 || config.threads <= 1 {
            (0..count)
                .map(|id| resolve_region(map, &bounds[id], &cache))
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.threads.min(count))
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            pool.install(|| {
                (0..count)
                    .into_par_iter()
                    .map(|id| resolve_region(map, &bounds[id], &cache))
                    .collect()
            })
        };
        let regions = all_exits
            .into_iter()
            .enumerate()
            .map(|(id, exits)| Region {
                color: map.color(id),
                size: map.size(id),
                exits,
            })
            .collect::<Vec<_>>();
        debug!(
            regions = regions.len(),
            cached = cache.len(),
            "region graph built"
        );
        Ok(RegionGraph { regions })
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when the grid had no colored cells
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region by id
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id]
    }

    /// Iterates regions in id order
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }
}

/// Resolves the 8 canonical boundary walks of one region
fn resolve_region(map: &RegionMap, bounds: &Bounds, cache: &SearchCache) -> [Exit; 8] {
    let mut exits = [Exit {
        target: None,
        dp: 0,
        cc: 0,
        crossed: false,
    }; 8];
    for dp in 0..4 {
        for cc in 0..2 {
            let (x, y) = bounds.extremum(dp, cc);
            exits[dp * 2 + cc] = search(map, cache, x as i64, y as i64, dp, cc);
        }
    }
    exits
}

fn cache_key(map: &RegionMap, x: i64, y: i64, dp: usize, cc: usize) -> u64 {
    ((y as u64 * map.width() as u64 + x as u64) << 3) | ((dp as u64) << 1) | cc as u64
}

/// Walks outward from (x, y) heading `dp` with chooser `cc` until a region
/// is entered or the walk halts.
///
/// Every tuple visited by the walk funnels into the same terminal result,
/// so the whole trail is written to the cache; a later walk reaching any of
/// those tuples short-circuits. Revisiting a tuple within one walk means
/// the surrounding white area has no exit, which resolves the entire trail
/// to the cyclic halt.
fn search(
    map: &RegionMap,
    cache: &SearchCache,
    mut x: i64,
    mut y: i64,
    mut dp: usize,
    mut cc: usize,
) -> Exit {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut first = true;
    loop {
        let key = cache_key(map, x, y, dp, cc);
        if let Some(hit) = cache.get(&key) {
            let res = *hit;
            drop(hit);
            backfill(cache, &seen, res);
            return res;
        }
        if !seen.insert(key) {
            let res = Exit {
                target: None,
                dp,
                cc,
                crossed: true,
            };
            backfill(cache, &seen, res);
            return res;
        }
        let nx = x + DX[dp];
        let ny = y + DY[dp];
        let blocked = nx < 0
            || ny < 0
            || nx >= map.width() as i64
            || ny >= map.height() as i64
            || map.is_obstruction(nx as usize, ny as usize);
        if blocked {
            if map.is_white(x as usize, y as usize) {
                cc = 1 - cc;
                dp = (dp + 1) % 4;
            } else {
                let res = Exit {
                    target: None,
                    dp,
                    cc,
                    crossed: false,
                };
                backfill(cache, &seen, res);
                return res;
            }
        } else if let Some(id) = map.id_at(nx as usize, ny as usize) {
            let res = Exit {
                target: Some(id),
                dp,
                cc,
                crossed: first,
            };
            backfill(cache, &seen, res);
            return res;
        } else {
            x = nx;
            y = ny;
        }
        first = false;
    }
}

fn backfill(cache: &SearchCache, seen: &HashSet<u64>, res: Exit) {
    for &key in seen {
        cache.insert(key, res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codel::CodelGrid;

    fn graph(art: &str) -> RegionGraph {
        RegionGraph::build(&CodelGrid::from_ascii(art).unwrap()).unwrap()
    }

    #[test]
    fn direct_neighbors_cross_on_first_step() {
        let g = graph("RB");
        let exit = g.region(0).exit(0, 0);
        assert_eq!(exit.target, Some(1));
        assert_eq!(exit.dp, 0);
        assert!(exit.crossed);
        // and back from blue heading left
        let back = g.region(1).exit(2, 0);
        assert_eq!(back.target, Some(0));
        assert!(back.crossed);
    }

    #[test]
    fn white_slide_clears_the_crossed_flag() {
        let g = graph("R..B");
        let exit = g.region(0).exit(0, 0);
        assert_eq!(exit.target, Some(1));
        assert!(!exit.crossed);
    }

    #[test]
    fn grid_edge_and_black_are_dead_ends() {
        let g = graph(
            "R#\n\
             ##",
        );
        for dp in 0..4 {
            for cc in 0..2 {
                let exit = g.region(0).exit(dp, cc);
                assert_eq!(exit.target, None);
                assert!(!exit.crossed, "dp={dp} cc={cc} should be a dead end");
            }
        }
    }

    #[test]
    fn unknown_cells_obstruct_instead_of_sliding() {
        let g = graph("R?B");
        let exit = g.region(0).exit(0, 0);
        assert_eq!(exit.target, None);
        assert!(!exit.crossed);
    }

    #[test]
    fn enclosed_pocket_resolves_cyclic() {
        let g = graph(
            "R.#\n\
             #.#\n\
             #.#",
        );
        let exit = g.region(0).exit(0, 0);
        assert_eq!(exit.target, None);
        assert!(exit.crossed, "pocket walk should be cyclic, not a dead end");
    }

    #[test]
    fn every_pocket_tuple_resolves_cyclic() {
        // white pocket with no colored neighbor at all
        let grid = CodelGrid::from_ascii(
            "####\n\
             #..#\n\
             ####",
        )
        .unwrap();
        let map = RegionMap::build(&grid);
        let cache: SearchCache = DashMap::new();
        for x in [1i64, 2] {
            for dp in 0..4 {
                for cc in 0..2 {
                    let res = search(&map, &cache, x, 1, dp, cc);
                    assert_eq!(res.target, None, "({x},{dp},{cc})");
                    assert!(res.crossed, "({x},{dp},{cc})");
                }
            }
        }
    }

    #[test]
    fn cache_result_is_start_order_independent() {
        let art = "R...\n\
                   ....\n\
                   ...B";
        let sequential = RegionGraph::build_with(
            &CodelGrid::from_ascii(art).unwrap(),
            &ResolveConfig { threads: 1 },
        )
        .unwrap();
        for threads in [2, 4, 8] {
            let parallel = RegionGraph::build_with(
                &CodelGrid::from_ascii(art).unwrap(),
                &ResolveConfig { threads },
            )
            .unwrap();
            assert_eq!(sequential, parallel);
        }
    }
}
