// SPDX-License-Identifier: MPL-2.0

//! Overlay module organization

pub mod frame;
pub mod layer;
pub mod presenter;
pub mod render;
pub mod tray;

pub use layer::{LayerOverlay, OverlayApp};
pub use presenter::OverlayPresenter;
