//! Per-frame depth lookup.

/// Point-distance lookup bound to a single frame.
///
/// Returns metric depth in meters. A value `<= 0.0` means there is no valid
/// depth at that pixel (occlusion, out of range, or outside the frame).
pub trait DepthAccessor {
    fn distance(&self, x: i32, y: i32) -> f32;
}

impl<F> DepthAccessor for F
where
    F: Fn(i32, i32) -> f32,
{
    #[inline]
    fn distance(&self, x: i32, y: i32) -> f32 {
        self(x, y)
    }
}

/// Borrowed z16 depth image, row-major, `len = width * height`.
#[derive(Clone, Copy, Debug)]
pub struct DepthFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u16],
    /// Meters per raw depth unit.
    pub depth_scale: f32,
}

impl DepthFrameView<'_> {
    /// Raw z16 value at `(x, y)`, `0` outside the grid.
    #[inline]
    pub fn raw(&self, x: i32, y: i32) -> u16 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data
            .get(y as usize * self.width + x as usize)
            .copied()
            .unwrap_or(0)
    }
}

impl DepthAccessor for DepthFrameView<'_> {
    #[inline]
    fn distance(&self, x: i32, y: i32) -> f32 {
        self.raw(x, y) as f32 * self.depth_scale
    }
}

/// Owned z16 depth image.
#[derive(Clone, Debug)]
pub struct DepthFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u16>,
    pub depth_scale: f32,
}

impl DepthFrame {
    /// Borrow this frame as a [`DepthFrameView`].
    pub fn view(&self) -> DepthFrameView<'_> {
        DepthFrameView {
            width: self.width,
            height: self.height,
            data: &self.data,
            depth_scale: self.depth_scale,
        }
    }
}

impl DepthAccessor for DepthFrame {
    #[inline]
    fn distance(&self, x: i32, y: i32) -> f32 {
        self.view().distance(x, y)
    }
}
