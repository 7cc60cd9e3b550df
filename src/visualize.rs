//! Terminal visualization: renders a codel grid with ANSI background
//! colors for eyeballing region structure while debugging programs.

use crate::codel::{Brightness, CodelGrid, Hue};

const RESET: &str = "\x1b[0m";

fn ansi_codes(hue: Hue) -> Option<(u8, char)> {
    // background color and marker letter per hue
    match hue {
        Hue::Black => Some((40, 'K')),
        Hue::Red => Some((41, 'R')),
        Hue::Green => Some((42, 'G')),
        Hue::Yellow => Some((43, 'Y')),
        Hue::Blue => Some((44, 'B')),
        Hue::Magenta => Some((45, 'M')),
        Hue::Cyan => Some((46, 'C')),
        Hue::White => Some((47, 'W')),
        Hue::Unknown => None,
    }
}

fn foreground(brightness: Brightness) -> u8 {
    30 + match brightness {
        Brightness::White => 7,
        Brightness::Light => 6,
        Brightness::Normal => 3,
        Brightness::Dark => 1,
        Brightness::Black | Brightness::Unknown => 0,
    }
}

/// Renders the grid, one ANSI-colored marker per codel
pub fn render_ansi(grid: &CodelGrid) -> String {
    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let color = grid.get(x, y);
            match ansi_codes(color.hue) {
                Some((back, letter)) => {
                    let fore = foreground(color.brightness);
                    out.push_str(&format!("\x1b[{back};1m\x1b[{fore};1m{letter}{RESET}"));
                }
                None => out.push('?'),
            }
        }
        out.push('\n');
    }
    out
}
