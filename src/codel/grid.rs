//! The codel grid: a rectangular, row-major table of classified colors,
//! built from a decoded image or from the one-character-per-codel ASCII
//! notation used by tests and the visualizer.

use super::color::{self, Brightness, Color, Hue};
use crate::error::{Error, Result};
use image::RgbImage;
use tracing::debug;

/// A rectangular grid of classified codel colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodelGrid {
    width: usize,
    height: usize,
    cells: Vec<Color>,
}

impl CodelGrid {
    /// Creates a grid from row-major cells. Fails on zero dimensions or a
    /// cell count that does not match.
    pub fn new(width: usize, height: usize, cells: Vec<Color>) -> Result<Self> {
        if width == 0 || height == 0 || cells.len() != width * height {
            return Err(Error::EmptyGrid);
        }
        Ok(CodelGrid {
            width,
            height,
            cells,
        })
    }

    /// Grid width in codels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in codels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at (x, y). Panics on out-of-range coordinates; traversals
    /// bounds-check before calling.
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.cells[y * self.width + x]
    }

    /// Builds the grid from a decoded image, sampling the top-left pixel of
    /// each codel-sized cell. A `codel_size` of 0 auto-detects the size.
    pub fn from_image(image: &RgbImage, codel_size: u32) -> Result<Self> {
        let codel_size = if codel_size == 0 {
            let detected = detect_codel_size(image);
            debug!(codel_size = detected, "auto-detected codel size");
            detected
        } else {
            codel_size
        };
        let width = (image.width() / codel_size) as usize;
        let height = (image.height() / codel_size) as usize;
        if width == 0 || height == 0 {
            return Err(Error::EmptyGrid);
        }
        let mut cells = Vec::with_capacity(width * height);
        for i in 0..height {
            for j in 0..width {
                let pixel = image.get_pixel(j as u32 * codel_size, i as u32 * codel_size);
                cells.push(Color::from_rgb(pixel[0], pixel[1], pixel[2]));
            }
        }
        CodelGrid::new(width, height, cells)
    }

    /// Parses the ASCII grid notation, one character per codel:
    ///
    /// - `.` white, `#` black, `?` unrecognized
    /// - `R Y G C B M` normal shades, `r y g c b m` light shades
    /// - `1`..`6` dark shades in the same hue order (red .. magenta)
    ///
    /// Rows are newline-separated and must all have the same width; blank
    /// lines are skipped.
    pub fn from_ascii(art: &str) -> Result<Self> {
        let mut rows: Vec<Vec<Color>> = Vec::new();
        for line in art.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                row.push(color_from_char(ch)?);
            }
            rows.push(row);
        }
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::RaggedGrid {
                    row: i,
                    got: row.len(),
                    expected: width,
                });
            }
        }
        let height = rows.len();
        CodelGrid::new(width, height, rows.into_iter().flatten().collect())
    }

    /// Renders the grid back into the ASCII notation accepted by
    /// [`CodelGrid::from_ascii`].
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(char_from_color(self.get(x, y)));
            }
            out.push('\n');
        }
        out
    }
}

fn color_from_char(ch: char) -> Result<Color> {
    let hue_at = |i: usize| {
        [
            Hue::Red,
            Hue::Yellow,
            Hue::Green,
            Hue::Cyan,
            Hue::Blue,
            Hue::Magenta,
        ][i]
    };
    let color = match ch {
        '.' => color::WHITE,
        '#' => color::BLACK,
        '?' => color::UNKNOWN,
        'R' | 'Y' | 'G' | 'C' | 'B' | 'M' => {
            let i = "RYGCBM".find(ch).unwrap();
            Color::new(hue_at(i), Brightness::Normal)
        }
        'r' | 'y' | 'g' | 'c' | 'b' | 'm' => {
            let i = "rygcbm".find(ch).unwrap();
            Color::new(hue_at(i), Brightness::Light)
        }
        '1'..='6' => {
            let i = ch as usize - '1' as usize;
            Color::new(hue_at(i), Brightness::Dark)
        }
        other => return Err(Error::UnknownCodelChar(other)),
    };
    Ok(color)
}

fn char_from_color(color: Color) -> char {
    if color.is_white() {
        return '.';
    }
    if color.is_black() {
        return '#';
    }
    let i = match color.hue.cycle_index() {
        Some(i) => i as usize,
        None => return '?',
    };
    match color.brightness {
        Brightness::Normal => "RYGCBM".as_bytes()[i] as char,
        Brightness::Light => "rygcbm".as_bytes()[i] as char,
        Brightness::Dark => "123456".as_bytes()[i] as char,
        _ => '?',
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Detects the codel size of an image as the GCD of all same-pixel run
/// lengths, scanned both horizontally and vertically.
pub fn detect_codel_size(image: &RgbImage) -> u32 {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return 1;
    }
    let mut minimum = gcd(width, height);
    let mut prev = *image.get_pixel(0, 0);
    let mut count = 0u32;
    for row in 0..height {
        for col in 0..width {
            let pixel = *image.get_pixel(col, row);
            if count > 0 && pixel != prev {
                minimum = gcd(minimum, count);
                count = 0;
            }
            count += 1;
            prev = pixel;
        }
    }
    count = 0;
    for col in 0..width {
        for row in 0..height {
            let pixel = *image.get_pixel(col, row);
            if count > 0 && pixel != prev {
                minimum = gcd(minimum, count);
                count = 0;
            }
            count += 1;
            prev = pixel;
        }
    }
    minimum.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trip() {
        let art = "Rr1\n.#?\nYGB\n";
        let grid = CodelGrid::from_ascii(art).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(0, 0), Color::new(Hue::Red, Brightness::Normal));
        assert_eq!(grid.get(2, 0), Color::new(Hue::Red, Brightness::Dark));
        assert!(grid.get(1, 1).is_black());
        assert_eq!(grid.to_ascii(), art);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = CodelGrid::from_ascii("RR\nR").unwrap_err();
        assert!(matches!(err, Error::RaggedGrid { row: 1, .. }));
    }

    #[test]
    fn empty_art_rejected() {
        assert!(matches!(
            CodelGrid::from_ascii("\n\n"),
            Err(Error::EmptyGrid)
        ));
    }

    #[test]
    fn detects_codel_size_from_uniform_blocks() {
        // 4x4 image of 2x2 codels
        let mut img = RgbImage::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                let c = if (x / 2 + y / 2) % 2 == 0 {
                    image::Rgb([0xFF, 0x00, 0x00])
                } else {
                    image::Rgb([0x00, 0x00, 0xFF])
                };
                img.put_pixel(x, y, c);
            }
        }
        assert_eq!(detect_codel_size(&img), 2);
        let grid = CodelGrid::from_image(&img, 0).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
    }
}
