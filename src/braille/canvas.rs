/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell is a 2x4 dot grid; U+2800..U+28FF covers every
/// combination. Cells can also carry an ink slot so several colors can share
/// one canvas (the last ink written to a cell wins).
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    dots: Vec<u8>,
    ink: Vec<Option<u8>>,
}

/// A non-empty canvas cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
    pub glyph: char,
    pub ink: Option<u8>,
}

impl BrailleCanvas {
    /// Canvas of `width` x `height` characters, i.e. `width*2` x `height*4` dots
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![0; width * height],
            ink: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Dot layout inside one character:
    /// ```text
    /// (0,0) (1,0)   0x01 0x08
    /// (0,1) (1,1)   0x02 0x10
    /// (0,2) (1,2)   0x04 0x20
    /// (0,3) (1,3)   0x40 0x80
    /// ```
    #[inline(always)]
    fn dot_bit(x: usize, y: usize) -> u8 {
        const BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];
        BITS[x % 2][y % 4]
    }

    #[inline(always)]
    fn cell_index(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return None;
        }
        Some((cy * self.width + cx, Self::dot_bit(x, y)))
    }

    /// Set a dot; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if let Some((idx, bit)) = self.cell_index(x, y) {
            self.dots[idx] |= bit;
        }
    }

    /// Set a dot and mark its cell with an ink slot
    pub fn set_inked_pixel(&mut self, x: i32, y: i32, ink: u8) {
        if let Some((idx, bit)) = self.cell_index(x, y) {
            self.dots[idx] |= bit;
            self.ink[idx] = Some(ink);
        }
    }

    #[inline(always)]
    fn glyph(bits: u8) -> char {
        char::from_u32(0x2800 + bits as u32).unwrap_or(' ')
    }

    /// Non-empty cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.dots
            .iter()
            .enumerate()
            .filter(|(_, &bits)| bits != 0)
            .map(move |(idx, &bits)| Cell {
                col: idx % self.width,
                row: idx / self.width,
                glyph: Self::glyph(bits),
                ink: self.ink[idx],
            })
    }

    /// Convert the canvas to a string of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.dots
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|&b| Self::glyph(b)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.to_string(), "⠁"); // U+2801
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.to_string(), "⣿"); // U+28FF
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(-1, 0);
        canvas.set_pixel(4, 0);
        canvas.set_pixel(0, 4);
        assert_eq!(canvas.cells().count(), 0);
    }

    #[test]
    fn test_ink_last_writer_wins() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_inked_pixel(0, 0, 1);
        canvas.set_inked_pixel(1, 1, 3);
        canvas.set_pixel(2, 0);

        let cells: Vec<Cell> = canvas.cells().collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].glyph, '⠑'); // 0x01 | 0x10
        assert_eq!(cells[0].ink, Some(3));
        assert_eq!((cells[1].col, cells[1].ink), (1, None));
    }
}
