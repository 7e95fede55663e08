use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::ColorRgba;
use crate::core::{logical_viewport, App, AppControl, Frame};
use crate::device::{Gpu, GpuInit};
use crate::render::RenderTarget;
use crate::time::FrameClock;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Every frame starts from this color.
    pub clear_color: ColorRgba,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glyphterm".to_string(),
            initial_size: LogicalSize::new(960.0, 600.0),
            clear_color: ColorRgba::BLACK,
        }
    }
}

pub struct Runtime;

impl Runtime {
    /// Opens the window and runs `app` until it exits or the window closes.
    ///
    /// Device, surface and `App::on_start` failures end the loop and are
    /// returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = Host {
            config,
            gpu_init,
            app,
            window: None,
            error: None,
        };

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        match host.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// The surface borrows the window it presents to.
#[self_referencing]
struct HostWindow {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Host<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<HostWindow>,
    error: Option<anyhow::Error>,
}

impl<A: App + 'static> Host<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let host_window = HostWindowTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        host_window
            .with_gpu(|gpu| app.on_start(&gpu.context, gpu.surface.format()))
            .context("application failed to start")?;

        host_window.with_window(|w| w.request_redraw());
        self.window = Some(host_window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.window = None;
        event_loop.exit();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(host_window) = self.window.as_mut() {
            host_window.with_gpu_mut(|gpu| gpu.surface.resize(&gpu.context, size));
            host_window.with_window(|w| w.request_redraw());
        }
    }

    /// Acquire, clear, let the app draw, submit, present.
    fn redraw(&mut self) -> Result<AppControl> {
        let Some(host_window) = self.window.as_mut() else {
            return Ok(AppControl::Continue);
        };
        let (app, clear_color) = (&mut self.app, self.config.clear_color);

        host_window.with_mut(|fields| {
            let window: &Window = fields.window;
            let Gpu { context, surface } = &mut *fields.gpu;

            let Some(surface_frame) = surface.acquire(context)? else {
                return Ok(AppControl::Continue);
            };
            let target = RenderTarget::new(
                &surface_frame.view,
                surface.format(),
                logical_viewport(window.inner_size(), window.scale_factor()),
            );

            let mut encoder = context.create_encoder("glyphterm frame");
            target.clear(&mut encoder, clear_color);

            let control = app.on_frame(&mut Frame {
                gpu: context,
                encoder: &mut encoder,
                target,
                time: fields.clock.tick(),
                window,
            });

            window.pre_present_notify();
            context.submit(encoder);
            surface_frame.present();
            Ok(control)
        })
    }
}

impl<A: App + 'static> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        if let Err(err) = self.open(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Terminal contents may animate every frame.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(host_window) = &self.window {
            host_window.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.window.is_none() {
            return;
        }

        if self.app.on_event(&event) == AppControl::Exit {
            self.window = None;
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("window closed");
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => self.resize(size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.window.as_ref().map(|w| w.with_window(|w| w.inner_size()));
                if let Some(size) = size {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(AppControl::Continue) => {}
                Ok(AppControl::Exit) => {
                    self.window = None;
                    event_loop.exit();
                }
                Err(err) => self.fail(event_loop, err),
            },

            _ => {}
        }
    }
}
