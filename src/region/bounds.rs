//! Per-region boundary extrema: the farthest cells in each of the four
//! directions, with the min/max range of the tied cells along the
//! perpendicular axis for chooser tie-breaking.

use super::fill::RegionMap;

/// Min/max of the coordinates tied at a directional extreme
#[derive(Debug, Clone, Copy)]
pub struct Extent {
    pub min: usize,
    pub max: usize,
}

impl Extent {
    fn update(&mut self, v: usize) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    fn reset(&mut self, v: usize) {
        self.min = v;
        self.max = v;
    }
}

/// Boundary extrema of one region
#[derive(Debug, Clone)]
pub struct Bounds {
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
    top_x: Extent,
    bottom_x: Extent,
    left_y: Extent,
    right_y: Extent,
}

impl Bounds {
    fn new(width: usize, height: usize) -> Self {
        Bounds {
            top: height - 1,
            bottom: 0,
            left: width - 1,
            right: 0,
            top_x: Extent {
                min: width - 1,
                max: 0,
            },
            bottom_x: Extent {
                min: width - 1,
                max: 0,
            },
            left_y: Extent {
                min: height - 1,
                max: 0,
            },
            right_y: Extent {
                min: height - 1,
                max: 0,
            },
        }
    }

    fn update(&mut self, x: usize, y: usize) {
        if x > self.right {
            self.right = x;
            self.right_y.reset(y);
        } else if x == self.right {
            self.right_y.update(y);
        }
        if x < self.left {
            self.left = x;
            self.left_y.reset(y);
        } else if x == self.left {
            self.left_y.update(y);
        }
        if y > self.bottom {
            self.bottom = y;
            self.bottom_x.reset(x);
        } else if y == self.bottom {
            self.bottom_x.update(x);
        }
        if y < self.top {
            self.top = y;
            self.top_x.reset(x);
        } else if y == self.top {
            self.top_x.update(x);
        }
    }

    /// Starting cell for the boundary walk in direction `dp` with chooser
    /// `cc`: the farthest cell along `dp`, tie broken toward the chooser's
    /// side. Directions: 0 = right, 1 = down, 2 = left, 3 = up.
    pub fn extremum(&self, dp: usize, cc: usize) -> (usize, usize) {
        debug_assert!(dp < 4 && cc < 2);
        match (dp, cc) {
            (0, 0) => (self.right, self.right_y.min),
            (0, 1) => (self.right, self.right_y.max),
            (1, 0) => (self.bottom_x.max, self.bottom),
            (1, 1) => (self.bottom_x.min, self.bottom),
            (2, 0) => (self.left, self.left_y.max),
            (2, 1) => (self.left, self.left_y.min),
            (3, 0) => (self.top_x.min, self.top),
            (3, 1) => (self.top_x.max, self.top),
            _ => unreachable!(),
        }
    }
}

/// Computes bounds for every region in one row-major sweep
pub fn region_bounds(map: &RegionMap) -> Vec<Bounds> {
    let mut bounds = vec![Bounds::new(map.width(), map.height()); map.region_count()];
    for y in 0..map.height() {
        for x in 0..map.width() {
            if let Some(id) = map.id_at(x, y) {
                bounds[id].update(x, y);
            }
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codel::CodelGrid;

    #[test]
    fn extrema_of_an_l_shape() {
        // region 0 is the red L
        let grid = CodelGrid::from_ascii(
            "R..\n\
             R..\n\
             RRR",
        )
        .unwrap();
        let map = RegionMap::build(&grid);
        let bounds = region_bounds(&map);
        let b = &bounds[0];
        // rightmost column is x=2, only at y=2
        assert_eq!(b.extremum(0, 0), (2, 2));
        assert_eq!(b.extremum(0, 1), (2, 2));
        // bottom row y=2: chooser 0 takes the rightmost, 1 the leftmost
        assert_eq!(b.extremum(1, 0), (2, 2));
        assert_eq!(b.extremum(1, 1), (0, 2));
        // left column x=0: chooser 0 takes the bottommost, 1 the topmost
        assert_eq!(b.extremum(2, 0), (0, 2));
        assert_eq!(b.extremum(2, 1), (0, 0));
        // top row y=0: chooser 0 takes the leftmost, 1 the rightmost
        assert_eq!(b.extremum(3, 0), (0, 0));
        assert_eq!(b.extremum(3, 1), (0, 0));
    }
}
