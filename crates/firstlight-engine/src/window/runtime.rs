use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, Lifecycle};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Center the window on its monitor once it is created.
    pub centered: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "My First Render".to_string(),
            initial_size: LogicalSize::new(720.0, 720.0),
            centered: true,
        }
    }
}

impl RuntimeConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and runs `app` until the window closes.
    ///
    /// Returns the error that ended the session, if any (a failed load, a
    /// failed GPU initialization). `app.on_unload` has run by then.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.finish()
    }
}

#[self_referencing]
struct Session {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    session: Option<Session>,
    lifecycle: Lifecycle,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            session: None,
            lifecycle: Lifecycle::new(),
            fatal: None,
        }
    }

    fn open_session(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        if self.config.centered {
            center_window(&window);
        }

        let gpu_init = self.gpu_init.clone();
        let session = SessionTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let session = self.session.insert(session);
        self.lifecycle.begin_load()?;
        let app = &mut self.app;
        session
            .with_gpu(|gpu| app.on_load(gpu))
            .context("load failed")?;

        self.lifecycle.mark_loaded()?;
        session.with_mut(|fields| fields.clock.reset());
        session.with_window(|w| w.request_redraw());

        log::info!("session loaded: {}", self.config.title);
        Ok(())
    }

    /// Runs the unload hook (at most once) and tears down GPU + window.
    ///
    /// The hook runs before the session drops, so the lesson releases its
    /// resources while the device still exists, also after a failed load.
    fn close_session(&mut self) {
        if self.lifecycle.begin_unload() {
            self.app.on_unload();
            log::info!("session unloaded");
        }
        // Gpu drops before the window it borrows.
        self.session = None;
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.close_session();
        event_loop.exit();
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.close_session();
        event_loop.exit();
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let reconfigured = session.with_gpu_mut(|gpu| gpu.resize(new_size));
        log::debug!(
            "framebuffer resized to {}x{} (reconfigured: {reconfigured})",
            new_size.width,
            new_size.height
        );

        if self.lifecycle.accepts_resize() {
            let app = &mut self.app;
            session.with_gpu(|gpu| app.on_resize(gpu, gpu.viewport()));
        }
        session.with_window(|w| w.request_redraw());
    }

    /// Update then render, back to back.
    fn tick(&mut self) -> AppControl {
        if !self.lifecycle.begin_tick() {
            return AppControl::Continue;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, session) = (&mut self.app, &mut self.session);
        let Some(session) = session.as_mut() else {
            return AppControl::Continue;
        };

        session.with_mut(|fields| {
            let time = fields.clock.tick();
            app.on_update(time);

            if !fields.gpu.viewport().is_drawable() {
                return AppControl::Continue;
            }

            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                time,
            };
            app.on_render(&mut ctx)
        })
    }

    fn finish(mut self) -> Result<()> {
        self.close_session();
        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() || self.fatal.is_some() {
            return;
        }

        if let Err(e) = self.open_session(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_none() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: lessons animate every frame.
        if let Some(session) = self.session.as_ref() {
            session.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.with_window(|w| w.id()) != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.session.as_ref().map(|s| s.with_window(|w| w.inner_size()));
                if let Some(size) = size {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.tick() == AppControl::Exit {
                    self.exit(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.close_session();
    }
}

fn center_window(window: &Window) {
    let Some(monitor) = window.current_monitor() else {
        return;
    };

    let screen = monitor.size();
    let origin = monitor.position();
    let outer = window.outer_size();

    let x = origin.x + (screen.width as i32 - outer.width as i32) / 2;
    let y = origin.y + (screen.height as i32 - outer.height as i32) / 2;
    window.set_outer_position(PhysicalPosition::new(x, y));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        unloads: usize,
    }

    impl App for Recorder {
        fn on_load(&mut self, _gpu: &Gpu<'_>) -> Result<()> {
            anyhow::bail!("not loadable without a window")
        }

        fn on_render(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Exit
        }

        fn on_unload(&mut self) {
            self.unloads += 1;
        }
    }

    fn state() -> AppState<Recorder> {
        AppState::new(RuntimeConfig::default(), GpuInit::default(), Recorder::default())
    }

    #[test]
    fn failed_load_runs_unload_once() {
        let mut state = state();
        state.lifecycle.begin_load().unwrap();

        state.close_session();
        state.close_session();
        assert_eq!(state.app.unloads, 1);
    }

    #[test]
    fn unload_skipped_when_load_never_started() {
        let mut state = state();
        state.close_session();
        assert_eq!(state.app.unloads, 0);
    }

    #[test]
    fn finish_returns_the_fatal_error() {
        let mut state = state();
        state.lifecycle.begin_load().unwrap();
        state.fatal = Some(anyhow::anyhow!("height map size mismatch"));

        let err = state.finish().unwrap_err();
        assert_eq!(err.to_string(), "height map size mismatch");
    }

    #[test]
    fn default_config_matches_first_render_window() {
        let config = RuntimeConfig::default().with_title("Terrain");
        assert_eq!(config.title, "Terrain");
        assert_eq!(config.initial_size, LogicalSize::new(720.0, 720.0));
        assert!(config.centered);
    }
}
