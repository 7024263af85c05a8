/// Model input size as (width, height).
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (150, 150);

/// Divisor mapping 8-bit channel values onto [0.0, 1.0].
pub const PIXEL_SCALE: f32 = 255.0;
