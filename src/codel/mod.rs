//! Codel palette and grid: color classification and the rectangular table
//! of codels the compiler consumes.

mod color;
mod grid;

pub use color::{brightness_delta, hue_delta, Brightness, Color, Hue, BLACK, UNKNOWN, WHITE};
pub use grid::{detect_codel_size, CodelGrid};
