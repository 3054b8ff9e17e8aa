use crate::math::Point2;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

/// Virtual pixels covered by one terminal cell
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// One terminal character with its foreground color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::Reset,
    };

    pub const fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg }
    }
}

/// Character grid the scene is rasterized into before it is flushed
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Maps a screen-space point to fractional cell coordinates
pub fn to_cell_space(p: Point2) -> Point2 {
    Point2::new(p.x / CELL_WIDTH_PX, p.y / CELL_HEIGHT_PX)
}

/// Center of a terminal cell in screen space
pub fn cell_center(column: u16, row: u16) -> Point2 {
    Point2::new(
        (column as f64 + 0.5) * CELL_WIDTH_PX,
        (row as f64 + 0.5) * CELL_HEIGHT_PX,
    )
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes a cell, ignoring coordinates off the grid
    pub fn set(&mut self, x: isize, y: isize, cell: Cell) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = cell;
        }
    }

    /// Writes text left to right starting at a cell, clipped to the grid
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set((x + i) as isize, y as isize, Cell::new(ch, fg));
        }
    }

    /// Draws a segment between two screen-space points using Bresenham's
    /// algorithm. `width_px` thickens the line by stamping neighbor cells.
    pub fn draw_line(&mut self, from: Point2, to: Point2, width_px: f64, cell: Cell) {
        let half = if width_px.is_finite() {
            ((width_px / CELL_WIDTH_PX - 1.0) / 2.0).ceil().max(0.0) as isize
        } else {
            0
        };
        let margin = half as f64 + 1.0;
        let Some((a, b)) = clip_segment(
            to_cell_space(from),
            to_cell_space(to),
            -margin,
            -margin,
            self.width as f64 + margin,
            self.height as f64 + margin,
        ) else {
            return;
        };

        let (mut x0, mut y0, x1, y1) = (
            a.x.floor() as isize,
            a.y.floor() as isize,
            b.x.floor() as isize,
            b.y.floor() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            for oy in -half..=half {
                for ox in -half..=half {
                    self.set(x0 + ox, y0 + oy, cell);
                }
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Fills every cell whose center lies inside the circle; the cell
    /// holding the center is always filled so tiny circles stay visible
    pub fn fill_circle(&mut self, center: Point2, radius_px: f64, cell: Cell) {
        if !center.is_finite() || !radius_px.is_finite() {
            return;
        }
        let radius = radius_px.max(0.0);
        let min = to_cell_space(Point2::new(center.x - radius, center.y - radius));
        let max = to_cell_space(Point2::new(center.x + radius, center.y + radius));

        let min_x = min.x.floor().max(0.0) as usize;
        let min_y = min.y.floor().max(0.0) as usize;
        let max_x = max.x.ceil().min(self.width as f64 - 1.0);
        let max_y = max.y.ceil().min(self.height as f64 - 1.0);
        if max_x >= 0.0 && max_y >= 0.0 {
            for y in min_y..=max_y as usize {
                for x in min_x..=max_x as usize {
                    let p = cell_center(x as u16, y as u16);
                    if p.distance(center) <= radius {
                        self.set(x as isize, y as isize, cell);
                    }
                }
            }
        }

        let c = to_cell_space(center);
        self.set(c.x.floor() as isize, c.y.floor() as isize, cell);
    }

    /// Fills the axis-aligned rectangle spanned by two screen-space corners
    pub fn fill_rect(&mut self, min: Point2, max: Point2, cell: Cell) {
        if !min.is_finite() || !max.is_finite() {
            return;
        }
        let a = to_cell_space(min);
        let b = to_cell_space(max);
        let x0 = a.x.min(b.x).floor().max(0.0);
        let y0 = a.y.min(b.y).floor().max(0.0);
        let x1 = a.x.max(b.x).floor().min(self.width as f64 - 1.0);
        let y1 = a.y.max(b.y).floor().min(self.height as f64 - 1.0);
        if x1 < x0 || y1 < y0 {
            return;
        }
        for y in y0 as usize..=y1 as usize {
            for x in x0 as usize..=x1 as usize {
                self.set(x as isize, y as isize, cell);
            }
        }
    }

    /// Queues the whole grid to `out`; the caller flushes
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            queue!(out, MoveTo(0, y as u16))?;
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            let mut run = String::with_capacity(self.width);
            for cell in row {
                if current != Some(cell.fg) {
                    if !run.is_empty() {
                        queue!(out, Print(&run))?;
                        run.clear();
                    }
                    queue!(out, SetForegroundColor(cell.fg))?;
                    current = Some(cell.fg);
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                queue!(out, Print(&run))?;
            }
        }
        queue!(out, ResetColor)?;
        Ok(())
    }
}

/// Liang-Barsky clip of segment `a`-`b` against a rectangle
fn clip_segment(
    a: Point2,
    b: Point2,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
) -> Option<(Point2, Point2)> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-d.x, a.x - min_x),
        (d.x, max_x - a.x),
        (-d.y, a.y - min_y),
        (d.y, max_y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        None
    } else {
        Some((a + d * t0, a + d * t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARK: Cell = Cell::new('#', Color::White);

    fn px(column: f64, row: f64) -> Point2 {
        Point2::new(column * CELL_WIDTH_PX, row * CELL_HEIGHT_PX)
    }

    fn marked(canvas: &Canvas) -> usize {
        (0..canvas.height())
            .flat_map(|y| (0..canvas.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get(x, y) == Some(MARK))
            .count()
    }

    #[test]
    fn horizontal_line_covers_every_cell() {
        let mut canvas = Canvas::new(20, 5);
        canvas.draw_line(px(2.0, 2.0), px(12.0, 2.0), 1.0, MARK);
        for x in 2..=12 {
            assert_eq!(canvas.get(x, 2), Some(MARK));
        }
        assert_eq!(marked(&canvas), 11);
    }

    #[test]
    fn diagonal_line_hits_both_ends() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_line(px(0.0, 0.0), px(9.0, 9.0), 1.0, MARK);
        assert_eq!(canvas.get(0, 0), Some(MARK));
        assert_eq!(canvas.get(9, 9), Some(MARK));
    }

    #[test]
    fn wide_line_is_thicker() {
        let mut thin = Canvas::new(30, 10);
        thin.draw_line(px(2.0, 5.0), px(20.0, 5.0), 1.0, MARK);
        let mut thick = Canvas::new(30, 10);
        thick.draw_line(px(2.0, 5.0), px(20.0, 5.0), 4.0 * CELL_WIDTH_PX, MARK);
        assert!(marked(&thick) > marked(&thin));
    }

    #[test]
    fn far_offscreen_line_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_line(px(-1.0e9, 5.0), px(1.0e9, 5.0), 1.0, MARK);
        assert_eq!(marked(&canvas), 10);
        canvas.clear();
        canvas.draw_line(px(-1.0e9, -50.0), px(1.0e9, -50.0), 1.0, MARK);
        assert_eq!(marked(&canvas), 0);
    }

    #[test]
    fn non_finite_geometry_draws_nothing() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_line(Point2::new(f64::NAN, 0.0), px(5.0, 5.0), 1.0, MARK);
        canvas.fill_circle(Point2::new(f64::INFINITY, 0.0), 10.0, MARK);
        canvas.fill_rect(Point2::new(f64::NAN, 0.0), px(5.0, 5.0), MARK);
        assert_eq!(marked(&canvas), 0);
    }

    #[test]
    fn circle_fills_center_and_stays_round() {
        let mut canvas = Canvas::new(40, 20);
        let center = cell_center(20, 10);
        canvas.fill_circle(center, 3.0 * CELL_HEIGHT_PX, MARK);
        assert_eq!(canvas.get(20, 10), Some(MARK));
        assert_eq!(canvas.get(20, 13), Some(MARK));
        assert_eq!(canvas.get(26, 10), Some(MARK));
        assert_eq!(canvas.get(20, 15), Some(Cell::BLANK));
    }

    #[test]
    fn tiny_circle_still_marks_one_cell() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_circle(cell_center(3, 3), 0.5, MARK);
        assert_eq!(marked(&canvas), 1);
    }

    #[test]
    fn rect_and_text() {
        let mut canvas = Canvas::new(10, 4);
        canvas.fill_rect(px(1.0, 1.0), px(3.5, 2.5), MARK);
        assert_eq!(marked(&canvas), 6);
        canvas.draw_text(8, 0, "abc", Color::Green);
        assert_eq!(canvas.get(8, 0).map(|c| c.ch), Some('a'));
        assert_eq!(canvas.get(9, 0).map(|c| c.ch), Some('b'));
    }

    #[test]
    fn render_emits_every_row() {
        let mut canvas = Canvas::new(3, 2);
        canvas.draw_text(0, 0, "ab", Color::Red);
        canvas.draw_text(0, 1, "cd", Color::Red);
        let mut out = Vec::new();
        canvas.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ab"));
        assert!(text.contains("cd"));
    }
}
