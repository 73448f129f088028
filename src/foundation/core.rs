use crate::foundation::error::{MeshcamError, MeshcamResult};

pub use kurbo::{Point, Rect, Vec2};

/// An RGB color with channels in `0.0..=255.0`.
///
/// Channels stay in byte range but are kept as `f32` because every consumer
/// (background model, color smoothing, palette interpolation) blends
/// fractionally every frame; quantizing to `u8` happens only at the raster
/// surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red channel, `0.0..=255.0`.
    pub r: f32,
    /// Green channel, `0.0..=255.0`.
    pub g: f32,
    /// Blue channel, `0.0..=255.0`.
    pub b: f32,
}

impl Rgb {
    /// Build a color from three channel values.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from byte channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(f32::from(r), f32::from(g), f32::from(b))
    }

    /// Quantize to byte channels, clamping into range.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| c.clamp(0.0, 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Rec.601 luminance, `0.0..=255.0`.
    pub fn luminance(self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Linear blend toward `other` by `t` (`t = 0` keeps `self`).
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Mean absolute per-channel difference, `0.0..=255.0`.
    pub fn mean_abs_diff(self, other: Rgb) -> f32 {
        ((self.r - other.r).abs() + (self.g - other.g).abs() + (self.b - other.b).abs()) / 3.0
    }

    /// Channel-wise average of three colors.
    pub fn average3(a: Rgb, b: Rgb, c: Rgb) -> Rgb {
        Rgb::new(
            (a.r + b.r + c.r) / 3.0,
            (a.g + b.g + c.g) / 3.0,
            (a.b + b.b + c.b) / 3.0,
        )
    }
}

/// Interest region of the analysis buffer.
///
/// Seeds are detected, tracked and constrained inside this region.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Ellipse inscribed in the buffer rectangle.
    #[default]
    Oval,
    /// Full buffer rectangle, inset by one pixel for constraint clamping.
    Rect,
}

impl Region {
    /// Whether `p` lies inside the region for a `width × height` buffer.
    pub fn contains(self, p: Point, width: f64, height: f64) -> bool {
        match self {
            Region::Oval => {
                let rx = width / 2.0;
                let ry = height / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (p.x - rx) / rx;
                let dy = (p.y - ry) / ry;
                dx * dx + dy * dy <= 1.0
            }
            Region::Rect => p.x >= 0.0 && p.y >= 0.0 && p.x < width && p.y < height,
        }
    }

    /// Clamp `p` into the region.
    ///
    /// Oval: offsets outside the ellipse are rescaled back to its boundary.
    /// Rect: coordinates are clamped into the rectangle inset by 1px.
    pub fn clamp(self, p: Point, width: f64, height: f64) -> Point {
        match self {
            Region::Oval => {
                let rx = (width / 2.0).max(1.0);
                let ry = (height / 2.0).max(1.0);
                let dx = (p.x - rx) / rx;
                let dy = (p.y - ry) / ry;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= 1.0 {
                    p
                } else {
                    Point::new(rx + dx / d * rx, ry + dy / d * ry)
                }
            }
            Region::Rect => {
                let max_x = (width - 2.0).max(1.0);
                let max_y = (height - 2.0).max(1.0);
                Point::new(p.x.clamp(1.0, max_x), p.y.clamp(1.0, max_y))
            }
        }
    }
}

/// Pixel dimensions of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BufferSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BufferSize {
    /// Build a size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> MeshcamResult<Self> {
        if width == 0 || height == 0 {
            return Err(MeshcamError::validation("BufferSize dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Total pixel count.
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}
