use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;
use crate::device::GpuContext;
use crate::render::RenderTarget;
use crate::time::FrameTime;

/// One frame in flight, handed to [`App::on_frame`](super::App::on_frame).
///
/// The runtime submits `encoder` and presents the target after the callback.
pub struct Frame<'a> {
    pub gpu: &'a GpuContext,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub target: RenderTarget<'a>,
    pub time: FrameTime,
    pub window: &'a Window,
}

/// Window size in logical pixels; what [`RenderTarget::view_proj`] maps 1:1.
pub fn logical_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical = size.to_logical::<f64>(scale_factor);
    Viewport::new(logical.width as f32, logical.height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_viewport_divides_by_scale() {
        let v = logical_viewport(PhysicalSize::new(1920, 1080), 2.0);
        assert_eq!(v, Viewport::new(960.0, 540.0));
    }

    #[test]
    fn logical_viewport_at_unit_scale_is_physical() {
        let v = logical_viewport(PhysicalSize::new(800, 600), 1.0);
        assert_eq!(v, Viewport::new(800.0, 600.0));
    }

    #[test]
    fn zero_size_window_is_invalid_viewport() {
        assert!(!logical_viewport(PhysicalSize::new(0, 600), 1.5).is_valid());
    }
}
