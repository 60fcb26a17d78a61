//! Greyscale framebuffer for the OLED display.

use crate::protocol::FRAME_SIZE;
use crate::{Error, Result, OLED_HEIGHT, OLED_WIDTH};

/// Total pixel count for the display.
pub const PIXEL_COUNT: usize = OLED_WIDTH as usize * OLED_HEIGHT as usize;

/// 8-bit greyscale framebuffer for the 256x64 display.
///
/// Pixels are kept at full 8-bit depth; [`Framebuffer::pack`] reduces
/// them to the device's 4-bit wire format at send time.
#[derive(Clone)]
pub struct Framebuffer {
    /// Pixel data, one byte per pixel, row-major.
    data: Vec<u8>,
    /// Width of the framebuffer.
    width: u16,
    /// Height of the framebuffer.
    height: u16,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Creates a new framebuffer initialized to black.
    pub fn new() -> Self {
        Self {
            data: vec![0; PIXEL_COUNT],
            width: OLED_WIDTH,
            height: OLED_HEIGHT,
        }
    }

    /// Creates a framebuffer with custom dimensions.
    ///
    /// Only 256x64 buffers can be packed for the device; other sizes
    /// are rejected by [`Framebuffer::pack`].
    pub fn with_dimensions(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            data: vec![0; size],
            width,
            height,
        }
    }

    /// Returns the width of the framebuffer.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Returns the height of the framebuffer.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns a reference to the raw pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the raw pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Clears the framebuffer to a solid grey level.
    pub fn clear(&mut self, level: u8) {
        self.data.fill(level);
    }

    /// Sets a pixel at the given coordinates.
    pub fn set_pixel(&mut self, x: u16, y: u16, level: u8) {
        if x < self.width && y < self.height {
            let idx = y as usize * self.width as usize + x as usize;
            self.data[idx] = level;
        }
    }

    /// Gets a pixel at the given coordinates.
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<u8> {
        if x < self.width && y < self.height {
            let idx = y as usize * self.width as usize + x as usize;
            Some(self.data[idx])
        } else {
            None
        }
    }

    /// Fills a rectangle with a solid grey level.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, level: u8) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_pixel(x + dx, y + dy, level);
            }
        }
    }

    /// Copies pixel data from an 8-bit greyscale slice.
    pub fn copy_from_gray8(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.data.len() {
            return Err(Error::FramebufferSize {
                expected: self.data.len(),
                actual: data.len(),
            });
        }
        self.data.copy_from_slice(data);
        Ok(())
    }

    /// Packs the framebuffer into the device's 4-bit wire format.
    ///
    /// Each sample is truncated to its top nibble (`>> 4`) and two
    /// horizontally adjacent samples share one byte, even column in
    /// the high nibble, odd column in the low nibble, row-major.
    /// Fails before packing unless the geometry yields exactly
    /// [`FRAME_SIZE`] bytes.
    pub fn pack(&self) -> Result<Vec<u8>> {
        let packed_len = self.data.len() / 2;
        if self.width % 2 != 0 || packed_len != FRAME_SIZE {
            return Err(Error::FramebufferSize {
                expected: FRAME_SIZE,
                actual: packed_len,
            });
        }

        let mut packed = Vec::with_capacity(FRAME_SIZE);
        for pair in self.data.chunks_exact(2) {
            packed.push((pair[0] >> 4) << 4 | (pair[1] >> 4));
        }
        Ok(packed)
    }
}
