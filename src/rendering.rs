use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute, queue,
    style::{Color, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::constants::PIXEL_SOLID;
use crate::geometry::{Model, Vector2D, transform_polygon, wrap_coordinate};

/// Anything the simulation can draw onto: a fixed-size grid of cells.
pub trait Surface {
    fn width(&self) -> u16;
    fn height(&self) -> u16;

    /// Paints every cell in `[x0, x1) × [y0, y1)`.
    fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, glyph: char, color: Color);

    fn draw(&mut self, x: i32, y: i32, glyph: char, color: Color);

    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color);

    // Bresenham
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, glyph: char, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut error = dx + dy;
        loop {
            self.draw(x, y, glyph, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x += step_x;
            }
            if doubled <= dx {
                error += dx;
                y += step_y;
            }
        }
    }

    fn clear(&mut self) {
        let (width, height) = (self.width() as i32, self.height() as i32);
        self.fill(0, 0, width, height, ' ', Color::Reset);
    }
}

/// Joins consecutive vertices and closes the loop back to the first one.
pub fn draw_closed_polygon(surface: &mut impl Surface, points: &[Vector2D], color: Color) {
    let count = points.len();
    if count == 0 {
        return;
    }
    for i in 0..=count {
        let from = points[i % count];
        let to = points[(i + 1) % count];
        surface.draw_line(from.x as i32, from.y as i32, to.x as i32, to.y as i32, PIXEL_SOLID, color);
    }
}

pub fn draw_wireframe(
    surface: &mut impl Surface,
    model: &Model,
    position: Vector2D,
    angle: f64,
    scale: f64,
    color: Color,
) {
    let points = transform_polygon(model, position.x, position.y, angle, scale);
    draw_closed_polygon(surface, &points, color);
}

// --- ScreenBuffer: headless stand-in for the terminal in debug runs ---
pub struct ScreenBuffer {
    rows: Vec<Vec<char>>,
    cursor: (u16, u16),
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            rows: vec![vec![' '; width as usize]; height as usize],
            cursor: (0, 0),
        }
    }

    /// Text at the cursor, advancing it; anything past the right edge is dropped.
    pub fn put_str(&mut self, text: &str) {
        let (mut x, y) = self.cursor;
        if let Some(row) = self.rows.get_mut(y as usize) {
            for c in text.chars() {
                if let Some(cell) = row.get_mut(x as usize) {
                    *cell = c;
                }
                x = x.saturating_add(1);
            }
        }
        self.cursor = (x, y);
    }

    pub fn row(&self, y: u16) -> String {
        self.rows.get(y as usize).map(|row| row.iter().collect()).unwrap_or_default()
    }

    pub fn blank(&mut self) {
        self.rows.iter_mut().for_each(|row| row.fill(' '));
        self.cursor = (0, 0);
    }

    pub fn log_frame(&self, frame: u64) {
        info!("--- Frame {} ---", frame);
        for row in &self.rows {
            info!("{}", row.iter().collect::<String>());
        }
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.cursor = (command.0, command.1);
                Ok(())
            },
        }
    }

    pub fn execute_color(&mut self, color: Color) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, SetForegroundColor(color)),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }

    /// Wipes the whole display and homes the cursor.
    pub fn blank_screen(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, Clear(ClearType::All), MoveTo(0, 0)),
            OutputTarget::ScreenBuffer(sb) => {
                sb.blank();
                Ok(())
            },
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // Ignore in debug mode
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => {
                sb.put_str(&String::from_utf8_lossy(buf));
                Ok(buf.len())
            },
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }
}

// --- GameGrid: the character framebuffer the simulation draws into ---
pub struct GameGrid {
    pub grid: Vec<Vec<(char, Color)>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![(' ', Color::Reset); width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char, color: Color) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = (c, color);
        }
    }

    #[cfg(test)]
    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        self.grid.get(y as usize).and_then(|row| row.get(x as usize)).map(|&(c, _)| c)
    }

    #[cfg(test)]
    pub fn row_text(&self, y: u16) -> String {
        self.grid[y as usize].iter().map(|&(c, _)| c).collect()
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            let mut current = Color::Reset;
            stdout.execute_color(current)?;
            let mut run = String::with_capacity(self.width as usize);
            for &(c, color) in &self.grid[y as usize] {
                if color != current && c != ' ' {
                    write!(stdout, "{}", run)?;
                    run.clear();
                    stdout.execute_color(color)?;
                    current = color;
                }
                run.push(c);
            }
            write!(stdout, "{}", run)?;
        }
        stdout.execute_other_command(ResetColor)?;
        stdout.flush()
    }

    pub fn copy_to(&self, sb: &mut ScreenBuffer) {
        for (target, source) in sb.rows.iter_mut().zip(&self.grid) {
            for (cell, &(c, _)) in target.iter_mut().zip(source) {
                *cell = c;
            }
        }
        sb.cursor = (0, 0);
    }
}

impl Surface for GameGrid {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, glyph: char, color: Color) {
        let x_range = x0.clamp(0, self.width as i32)..x1.clamp(0, self.width as i32);
        for y in y0.clamp(0, self.height as i32)..y1.clamp(0, self.height as i32) {
            for x in x_range.clone() {
                self.grid[y as usize][x as usize] = (glyph, color);
            }
        }
    }

    /// Plots one cell, wrapping it onto the torus first so outlines straddling an edge show on both sides.
    fn draw(&mut self, x: i32, y: i32, glyph: char, color: Color) {
        let x = wrap_coordinate(x as f64, self.width as f64);
        let y = wrap_coordinate(y as f64, self.height as f64);
        if x >= 0.0 && y >= 0.0 {
            self.set_char(x as u16, y as u16, glyph, color);
        }
    }

    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) {
        if y < 0 {
            return;
        }
        for (i, c) in text.chars().enumerate() {
            let column = x + i as i32;
            if column >= 0 {
                self.set_char(column as u16, y as u16, c, color);
            }
        }
    }
}
