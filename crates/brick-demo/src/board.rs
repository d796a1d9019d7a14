//! Static demo level.

use anyhow::{bail, Result};

use brick_render::gfx::GraphicsContext;
use brick_render::render::RectRenderer;

/// `#` brick, `=` plate, `-` stroke, `a`/`b` creatures, `h` heart, `.` empty.
pub const LEVEL: &str = "\
####################
#..................#
#..a.......h.....b.#
#....======........#
#..................#
#.......----.......#
#..b...........a...#
#..................#
#....h.....====....#
#..................#
####################";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Cell {
    Empty,
    Brick,
    Plate,
    Stroke,
    CreatureA,
    CreatureB,
    Heart,
}

impl Cell {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '.' => Cell::Empty,
            '#' => Cell::Brick,
            '=' => Cell::Plate,
            '-' => Cell::Stroke,
            'a' => Cell::CreatureA,
            'b' => Cell::CreatureB,
            'h' => Cell::Heart,
            _ => return None,
        })
    }
}

pub struct Board {
    width: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn parse(src: &str) -> Result<Self> {
        let rows: Vec<&str> = src.lines().filter(|l| !l.is_empty()).collect();
        let Some(width) = rows.first().map(|r| r.chars().count()) else {
            bail!("empty level");
        };

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                bail!("row {y} has {} cells, expected {width}", row.chars().count());
            }
            for (x, c) in row.chars().enumerate() {
                let Some(cell) = Cell::from_char(c) else {
                    bail!("unknown cell {c:?} at {x},{y}");
                };
                cells.push(cell);
            }
        }

        Ok(Self { width, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    /// Draws every cell plus the progress bar on the row below the board.
    pub fn draw<C: GraphicsContext>(&self, r: &mut RectRenderer<C>, percent: f32) {
        for (i, cell) in self.cells.iter().enumerate() {
            let col = (i % self.width) as i32;
            let row = (i / self.width) as i32;
            match cell {
                Cell::Empty => {}
                Cell::Brick => r.draw_brick(col, row),
                Cell::Plate => r.draw_plate(col, row),
                Cell::Stroke => r.draw_stroke(col, row),
                Cell::CreatureA => r.draw_creature_a(col, row),
                Cell::CreatureB => r.draw_creature_b(col, row),
                Cell::Heart => r.draw_heart(col, row),
            }
        }

        r.draw_progress(0, self.height() as i32, percent);
    }
}
