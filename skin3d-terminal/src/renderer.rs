/// Half-block blitter for showing RGBA images in a terminal
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use image::{Rgba, RgbaImage};
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom.
const UPPER_HALF: char = '\u{2580}';
const LOWER_HALF: char = '\u{2584}';

/// Pixels with less alpha than this show the terminal background.
const ALPHA_CUTOFF: u8 = 128;

/// One terminal cell: two stacked pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub top: Option<[u8; 3]>,
    pub bottom: Option<[u8; 3]>,
}

/// Renders an image into a grid of half-block cells
pub struct HalfBlockRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl HalfBlockRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Scale `image` to fit the grid with nearest sampling, centred.
    pub fn blit(&mut self, image: &RgbaImage) {
        self.clear();
        let (iw, ih) = image.dimensions();
        let target_w = self.width as f64;
        let target_h = (self.height * 2) as f64;
        if iw == 0 || ih == 0 || target_w == 0.0 || target_h == 0.0 {
            return;
        }

        let scale = (target_w / f64::from(iw)).min(target_h / f64::from(ih));
        let dest_w = ((f64::from(iw) * scale).floor() as usize).max(1);
        let dest_h = ((f64::from(ih) * scale).floor() as usize).max(1);
        let offset_x = (self.width.saturating_sub(dest_w)) / 2;
        let offset_y = (self.height * 2).saturating_sub(dest_h) / 2;

        for dy in 0..dest_h {
            let sy = ((dy as f64 / scale) as u32).min(ih - 1);
            let py = offset_y + dy;
            for dx in 0..dest_w {
                let sx = ((dx as f64 / scale) as u32).min(iw - 1);
                let px = offset_x + dx;
                if px >= self.width || py >= self.height * 2 {
                    continue;
                }
                let color = visible(image.get_pixel(sx, sy));
                let cell = &mut self.cells[(py / 2) * self.width + px];
                if py % 2 == 0 {
                    cell.top = color;
                } else {
                    cell.bottom = color;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cell(x, y);
                match (cell.top, cell.bottom) {
                    (Some(top), Some(bottom)) => {
                        writer.queue(SetForegroundColor(rgb(top)))?;
                        writer.queue(SetBackgroundColor(rgb(bottom)))?;
                        writer.queue(Print(UPPER_HALF))?;
                    }
                    (Some(top), None) => {
                        writer.queue(SetForegroundColor(rgb(top)))?;
                        writer.queue(SetBackgroundColor(Color::Reset))?;
                        writer.queue(Print(UPPER_HALF))?;
                    }
                    (None, Some(bottom)) => {
                        writer.queue(SetForegroundColor(rgb(bottom)))?;
                        writer.queue(SetBackgroundColor(Color::Reset))?;
                        writer.queue(Print(LOWER_HALF))?;
                    }
                    (None, None) => {
                        writer.queue(ResetColor)?;
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn visible(pixel: &Rgba<u8>) -> Option<[u8; 3]> {
    (pixel[3] >= ALPHA_CUTOFF).then(|| [pixel[0], pixel[1], pixel[2]])
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}
