use winit::dpi::PhysicalSize;

/// Drawable size in device (physical) pixels.
///
/// Drives both the GPU viewport rectangle and the pixel-to-world scale; the
/// two are always read from the same value within a frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-sized viewport (minimized window, mid-resize) must suspend
    /// rendering rather than feed a zero denominator into the camera.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn min_dimension(self) -> u32 {
        self.width.min(self.height)
    }
}

impl From<PhysicalSize<u32>> for Viewport {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}
