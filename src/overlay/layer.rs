// SPDX-License-Identifier: MPL-2.0

//! Overlay surface using the Wayland layer-shell protocol
//! This bypasses the compositor's window management to achieve a borderless,
//! always-on-top surface that ignores pointer input.

use super::frame::OverlayFrame;
use super::presenter::{OverlayPresenter, OverlaySurface, SurfaceError};
use super::render;
use super::tray::{TrayRequest, pending_requests};
use crate::config::Config;
use crate::speed::SysinfoCounters;
use cosmic::cosmic_config::{self, CosmicConfigEntry};

use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState, Region},
    delegate_compositor, delegate_layer, delegate_output, delegate_registry, delegate_shm,
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    shell::{
        WaylandSurface,
        wlr_layer::{
            Anchor, KeyboardInteractivity, Layer, LayerShell, LayerShellHandler, LayerSurface,
            LayerSurfaceConfigure,
        },
    },
    shm::{
        Shm, ShmHandler,
        slot::{Buffer, SlotPool},
    },
};
use wayland_client::{
    Connection, QueueHandle,
    globals::{BindError, GlobalList},
    protocol::{wl_output, wl_shm, wl_surface},
};

const NAMESPACE: &str = "cosmic-netspeed-overlay";
/// Used when the first frame cannot be measured
const FALLBACK_SIZE: (u32, u32) = (200, 36);

/// `OverlaySurface` backed by a wlr layer surface.
pub struct LayerOverlay {
    qh: QueueHandle<OverlayApp>,
    compositor_state: CompositorState,
    layer_shell: LayerShell,
    shm_state: Shm,
    pool: Option<SlotPool>,

    /// Present while shown; dropping it unmaps the overlay
    layer_surface: Option<LayerSurface>,
    /// Last committed buffer, kept alive while the compositor reads it
    buffer: Option<Buffer>,
    configured: bool,
    size: (u32, u32),
    /// (top, left) offset from the output corner
    margin: (i32, i32),
    pending: Option<OverlayFrame>,
}

impl LayerOverlay {
    pub fn bind(
        globals: &GlobalList,
        qh: &QueueHandle<OverlayApp>,
        margin: (i32, i32),
    ) -> Result<Self, BindError> {
        Ok(Self {
            qh: qh.clone(),
            compositor_state: CompositorState::bind(globals, qh)?,
            layer_shell: LayerShell::bind(globals, qh)?,
            shm_state: Shm::bind(globals, qh)?,
            pool: None,
            layer_surface: None,
            buffer: None,
            configured: false,
            size: (0, 0),
            margin,
            pending: None,
        })
    }

    pub fn set_margin(&mut self, top: i32, left: i32) {
        self.margin = (top, left);
        if let Some(layer_surface) = &self.layer_surface {
            log::info!("moving overlay to x={left}, y={top}");
            layer_surface.set_margin(top, 0, 0, left);
            layer_surface.commit();
        }
    }

    fn is_current(&self, layer: &LayerSurface) -> bool {
        self.layer_surface
            .as_ref()
            .is_some_and(|current| current.wl_surface() == layer.wl_surface())
    }

    fn configure(&mut self) {
        self.configured = true;
        if let Err(err) = self.draw() {
            log::warn!("failed to draw overlay after configure: {err}");
        }
    }

    /// The compositor destroyed the surface on its own.
    fn surface_closed(&mut self) {
        self.layer_surface = None;
        self.buffer = None;
        self.configured = false;
    }

    fn draw(&mut self) -> Result<(), SurfaceError> {
        let (Some(layer_surface), Some(frame)) = (&self.layer_surface, &self.pending) else {
            return Ok(());
        };
        if !self.configured {
            return Ok(());
        }

        let arrangement = render::measure(frame)?;
        let (width, height) = (arrangement.width, arrangement.height);
        if (width, height) != self.size {
            self.size = (width, height);
            layer_surface.set_size(width, height);
        }

        let stride = width as i32 * 4;
        if self.pool.is_none() {
            let pool = SlotPool::new(stride as usize * height as usize, &self.shm_state)
                .map_err(|err| SurfaceError::Buffer(err.to_string()))?;
            self.pool = Some(pool);
        }
        let Some(pool) = self.pool.as_mut() else {
            return Ok(());
        };

        let (buffer, canvas) = pool
            .create_buffer(width as i32, height as i32, stride, wl_shm::Format::Argb8888)
            .map_err(|err| SurfaceError::Buffer(err.to_string()))?;
        render::render_frame(canvas, &arrangement, frame)?;

        let surface = layer_surface.wl_surface();
        surface.attach(Some(buffer.wl_buffer()), 0, 0);
        surface.damage_buffer(0, 0, width as i32, height as i32);
        surface.commit();

        self.buffer = Some(buffer);
        Ok(())
    }
}

impl OverlaySurface for LayerOverlay {
    fn set_click_through(&mut self, enabled: bool) -> Result<(), SurfaceError> {
        let Some(layer_surface) = &self.layer_surface else {
            return Ok(());
        };
        let surface = layer_surface.wl_surface();

        if enabled {
            // An empty input region lets every pointer event fall through.
            let region = Region::new(&self.compositor_state)
                .map_err(|err| SurfaceError::ClickThrough(err.to_string()))?;
            surface.set_input_region(Some(region.wl_region()));
        } else {
            surface.set_input_region(None);
        }
        surface.commit();
        Ok(())
    }

    fn show(&mut self) {
        if self.layer_surface.is_some() {
            return;
        }

        let initial = self.pending.clone().unwrap_or_default();
        let (width, height) = match render::measure(&initial) {
            Ok(arrangement) => (arrangement.width, arrangement.height),
            Err(err) => {
                log::warn!("failed to measure overlay, using fallback size: {err}");
                FALLBACK_SIZE
            }
        };

        let surface = self.compositor_state.create_surface(&self.qh);
        let layer_surface = self.layer_shell.create_layer_surface(
            &self.qh,
            surface,
            Layer::Overlay,
            Some(NAMESPACE),
            None,
        );

        let (top, left) = self.margin;
        log::debug!("creating overlay surface {width}x{height} at x={left}, y={top}");
        layer_surface.set_anchor(Anchor::TOP | Anchor::LEFT);
        layer_surface.set_size(width, height);
        layer_surface.set_exclusive_zone(-1); // Don't reserve space
        layer_surface.set_margin(top, 0, 0, left);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer_surface.commit();

        self.size = (width, height);
        self.configured = false;
        self.layer_surface = Some(layer_surface);
    }

    fn hide(&mut self) {
        self.surface_closed();
    }

    fn present(&mut self, frame: &OverlayFrame) -> Result<(), SurfaceError> {
        self.pending = Some(frame.clone());
        self.draw()
    }

    fn close(&mut self) {
        self.surface_closed();
        self.pending = None;
        self.pool = None;
    }
}

/// Wayland client state driving the overlay.
pub struct OverlayApp {
    registry_state: RegistryState,
    output_state: OutputState,

    pub presenter: OverlayPresenter<SysinfoCounters, LayerOverlay>,

    /// Config as last applied, compared against fresh reads
    config: Config,
    config_handler: Option<cosmic_config::Config>,

    /// Exit flag
    pub exit: bool,
}

impl OverlayApp {
    pub fn new(
        globals: &GlobalList,
        qh: &QueueHandle<Self>,
        presenter: OverlayPresenter<SysinfoCounters, LayerOverlay>,
        config: Config,
        config_handler: Option<cosmic_config::Config>,
    ) -> Self {
        Self {
            registry_state: RegistryState::new(globals),
            output_state: OutputState::new(globals, qh),
            presenter,
            config,
            config_handler,
            exit: false,
        }
    }

    /// Shuts the overlay down and tells the applet nobody is listening any more.
    pub fn finish(&mut self) {
        self.presenter.shutdown();
        self.exit = true;

        let Some(handler) = &self.config_handler else {
            return;
        };
        self.config.exit_requested = false;
        self.config.overlay_running = false;
        self.config.store(handler);
    }

    /// Applies whatever the applet changed since the last poll.
    pub fn poll_config(&mut self) {
        let Some(handler) = &self.config_handler else {
            return;
        };
        let current = Config::read(handler);

        let requests = pending_requests(&self.config, &current);
        self.config = current;

        for request in requests {
            match request {
                TrayRequest::Exit => {
                    log::info!("exit requested from the panel applet");
                    self.finish();
                    return;
                }
                TrayRequest::SetVisible(visible) => {
                    self.presenter.set_visible(visible);
                }
                TrayRequest::Move { x, y } => {
                    self.presenter.surface_mut().set_margin(y, x);
                }
            }
        }
    }
}

impl CompositorHandler for OverlayApp {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
        // Redraws are driven by the tick timer
    }

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }
}

impl OutputHandler for OverlayApp {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
}

impl LayerShellHandler for OverlayApp {
    fn closed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, layer: &LayerSurface) {
        let surface = self.presenter.surface_mut();
        if surface.is_current(layer) {
            log::info!("compositor closed the overlay surface");
            surface.surface_closed();
            self.presenter.shutdown();
            self.exit = true;
        }
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        layer: &LayerSurface,
        _configure: LayerSurfaceConfigure,
        _serial: u32,
    ) {
        let surface = self.presenter.surface_mut();
        if surface.is_current(layer) {
            surface.configure();
        }
    }
}

impl ShmHandler for OverlayApp {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.presenter.surface_mut().shm_state
    }
}

delegate_compositor!(OverlayApp);
delegate_output!(OverlayApp);
delegate_shm!(OverlayApp);
delegate_layer!(OverlayApp);

delegate_registry!(OverlayApp);

impl ProvidesRegistryState for OverlayApp {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }
    registry_handlers![OutputState];
}
