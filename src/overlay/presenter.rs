// SPDX-License-Identifier: MPL-2.0

//! Tick orchestration and the overlay's visibility state machine
//!
//! The presenter samples counters on every tick, whether or not the overlay
//! is shown, so showing it again never reports the bytes accumulated while
//! it was hidden as one huge spike.

use super::frame::OverlayFrame;
use crate::speed::{CounterSource, IntervalRate, SpeedSampler};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to make the overlay click-through: {0}")]
    ClickThrough(String),
    #[error("failed to allocate a frame buffer: {0}")]
    Buffer(String),
    #[error("failed to render the overlay: {0}")]
    Render(String),
}

/// Platform window the overlay is drawn into.
pub trait OverlaySurface {
    /// Lets pointer input pass through to whatever is below the overlay.
    fn set_click_through(&mut self, enabled: bool) -> Result<(), SurfaceError>;
    fn show(&mut self);
    fn hide(&mut self);
    /// Replaces the displayed content. On error the previous content stays.
    fn present(&mut self, frame: &OverlayFrame) -> Result<(), SurfaceError>;
    /// Releases the window for good.
    fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Hidden,
    ShutDown,
}

pub struct OverlayPresenter<C, S> {
    sampler: SpeedSampler<C>,
    surface: S,
    phase: Phase,
    frame: OverlayFrame,
}

impl<C: CounterSource, S: OverlaySurface> OverlayPresenter<C, S> {
    /// Shows the surface with an idle frame until the first tick.
    pub fn new(sampler: SpeedSampler<C>, surface: S) -> Self {
        let mut presenter = Self {
            sampler,
            surface,
            phase: Phase::Hidden,
            frame: OverlayFrame::default(),
        };
        presenter.reveal();
        presenter
    }

    pub fn tick(&mut self) -> Option<&OverlayFrame> {
        self.tick_at(Instant::now())
    }

    /// Samples, rebuilds the frame and pushes it to the surface when visible.
    pub fn tick_at(&mut self, now: Instant) -> Option<&OverlayFrame> {
        if self.phase == Phase::ShutDown {
            return None;
        }

        let rate = match self.sampler.update_at(now) {
            Ok(rate) => rate,
            Err(err) => {
                log::warn!("network counters unavailable this tick: {err}");
                IntervalRate::ZERO
            }
        };
        self.frame = OverlayFrame::from_rate(rate);
        log::trace!("{} {}", self.frame.down.text(), self.frame.up.text());

        if self.phase == Phase::Visible {
            if let Err(err) = self.surface.present(&self.frame) {
                log::warn!("keeping previous overlay contents: {err}");
            }
        }
        Some(&self.frame)
    }

    /// Flips between visible and hidden. Does nothing after shutdown.
    pub fn toggle(&mut self) -> Phase {
        match self.phase {
            Phase::Visible => {
                self.surface.hide();
                self.phase = Phase::Hidden;
                log::info!("overlay hidden");
            }
            Phase::Hidden => {
                self.reveal();
                log::info!("overlay shown");
            }
            Phase::ShutDown => {}
        }
        self.phase
    }

    /// Toggles only if the current visibility differs from `visible`.
    pub fn set_visible(&mut self, visible: bool) -> Phase {
        if self.is_visible() != visible {
            self.toggle();
        }
        self.phase
    }

    pub fn shutdown(&mut self) {
        if self.phase == Phase::ShutDown {
            return;
        }
        self.surface.close();
        self.phase = Phase::ShutDown;
        log::info!("overlay shut down");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Visible
    }

    pub fn frame(&self) -> &OverlayFrame {
        &self.frame
    }

    pub fn sampler(&self) -> &SpeedSampler<C> {
        &self.sampler
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // Some compositors drop the input region when a surface is remapped, so
    // click-through is applied again on every show.
    fn reveal(&mut self) {
        self.surface.show();
        if let Err(err) = self.surface.set_click_through(true) {
            log::warn!("overlay will intercept pointer input: {err}");
        }
        if let Err(err) = self.surface.present(&self.frame) {
            log::warn!("failed to draw overlay after showing it: {err}");
        }
        self.phase = Phase::Visible;
    }
}
