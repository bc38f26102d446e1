use tamper_detector::image::PixelGrid;

/// Smooth diagonal gradient, useful as a "natural" scene stand-in.
pub fn gradient_grid(width: usize, height: usize, channels: usize) -> PixelGrid {
    assert!(width > 1 && height > 1, "gradient needs at least 2x2 pixels");
    let mut data = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        for x in 0..width {
            let base =
                0.5 * (x as f32 / (width - 1) as f32) + 0.5 * (y as f32 / (height - 1) as f32);
            for c in 0..channels {
                // Offset channels slightly so color grids are not gray.
                data.push((base + c as f32 * 0.05).min(1.0));
            }
        }
    }
    PixelGrid::from_samples(width, height, channels, data).expect("valid synthetic grid")
}

/// Axis-aligned tampered block.
#[derive(Clone, Copy, Debug)]
pub struct Block {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Block {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    pub fn area(&self) -> usize {
        self.w * self.h
    }
}

/// Copy of `original` with `block` overwritten by a flat bright splat.
pub fn tamper_block(original: &PixelGrid, block: Block) -> PixelGrid {
    assert!(block.x + block.w <= original.w && block.y + block.h <= original.h);
    let mut tampered = original.clone();
    for y in block.y..block.y + block.h {
        for x in block.x..block.x + block.w {
            let idx = tampered.idx(x, y);
            for c in 0..tampered.channels {
                tampered.data[idx + c] = if c == 0 { 0.95 } else { 0.05 };
            }
        }
    }
    tampered
}
