use edgestag::PixelBuffer;

fn rgb_from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> PixelBuffer {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let v = f(x, y);
            data.extend_from_slice(&[v, v, v]);
        }
    }
    PixelBuffer::from_raw(width, height, 3, data).expect("valid synthetic image")
}

/// Uniform gray image.
pub fn flat_rgb(width: usize, height: usize, value: u8) -> PixelBuffer {
    rgb_from_fn(width, height, |_, _| value)
}

/// Black left of `column`, white from `column` on.
pub fn vertical_step_rgb(width: usize, height: usize, column: usize) -> PixelBuffer {
    rgb_from_fn(width, height, |x, _| if x < column { 0 } else { 255 })
}

/// High-contrast checkerboard.
pub fn checkerboard_rgb(width: usize, height: usize, cell: usize) -> PixelBuffer {
    assert!(cell > 0, "cell size must be positive");
    rgb_from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) & 1 == 0 {
            32
        } else {
            220
        }
    })
}

/// Smooth shapes plus deterministic noise, so edges of many strengths exist.
pub fn textured_rgb(width: usize, height: usize, seed: u32) -> PixelBuffer {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let noise: Vec<u8> = (0..width * height)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 26) as u8
        })
        .collect();

    let (cx, cy) = (width as f32 * 0.4, height as f32 * 0.6);
    let radius = width.min(height) as f32 * 0.3;
    rgb_from_fn(width, height, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let disc = if dx * dx + dy * dy < radius * radius { 90.0 } else { 0.0 };
        let wave = 60.0 * ((x as f32) * 0.15).sin() + 40.0 * ((y as f32) * 0.23).cos();
        let v = 100.0 + disc + wave + noise[y * width + x] as f32;
        v.clamp(0.0, 255.0) as u8
    })
}

/// PNG bytes of `image`.
pub fn png_bytes(image: &PixelBuffer) -> Vec<u8> {
    edgestag::io::encode_png(image).expect("png encoding")
}
