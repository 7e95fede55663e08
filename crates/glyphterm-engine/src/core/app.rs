use winit::event::WindowEvent;

use crate::device::GpuContext;

use super::frame::Frame;

/// Whether the runtime keeps going after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// An application hosted by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Called once the device and surface exist, before the first frame.
    ///
    /// `format` is the surface format frames will target. An error stops the
    /// runtime and is returned from `Runtime::run`.
    fn on_start(&mut self, gpu: &GpuContext, format: wgpu::TextureFormat) -> anyhow::Result<()> {
        let _ = (gpu, format);
        Ok(())
    }

    /// Raw window events, before the runtime acts on them.
    fn on_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Records this frame's draws. The target is already cleared.
    fn on_frame(&mut self, frame: &mut Frame<'_>) -> AppControl;
}
