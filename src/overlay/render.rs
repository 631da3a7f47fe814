// SPDX-License-Identifier: MPL-2.0

//! Cairo/Pango rendering of the two speed labels
//!
//! Labels sit side by side on rounded translucent backgrounds. The surface
//! size follows the text, so the frame is measured before every draw.

use super::frame::OverlayFrame;
use super::presenter::SurfaceError;
use std::f64::consts::{FRAC_PI_2, PI};

const FONT: &str = "Ubuntu Bold 11";
/// Gap between the surface edge and the labels
const MARGIN: f64 = 6.0;
/// Gap between the two labels
const SPACING: f64 = 2.0;
const PADDING_X: f64 = 8.0;
const PADDING_Y: f64 = 4.0;
const CORNER_RADIUS: f64 = 6.0;
const BACKGROUND_ALPHA: f64 = 160.0 / 255.0;
/// Opacity applied to the whole overlay
const OPACITY: f64 = 0.8;

/// Placement of both label boxes inside the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrangement {
    pub width: u32,
    pub height: u32,
    /// `(x, y, width, height)` of each label box, download first
    pub boxes: [(f64, f64, f64, f64); 2],
}

/// Lays out two labels from their text sizes in pixels.
pub fn arrange(text_sizes: [(i32, i32); 2]) -> Arrangement {
    let box_size = |(w, h): (i32, i32)| {
        (
            f64::from(w.max(0)) + 2.0 * PADDING_X,
            f64::from(h.max(0)) + 2.0 * PADDING_Y,
        )
    };
    let (down_w, down_h) = box_size(text_sizes[0]);
    let (up_w, up_h) = box_size(text_sizes[1]);
    let row_height = down_h.max(up_h);

    // Labels are vertically centered in the row.
    let down = (MARGIN, MARGIN + (row_height - down_h) / 2.0, down_w, down_h);
    let up = (
        MARGIN + down_w + SPACING,
        MARGIN + (row_height - up_h) / 2.0,
        up_w,
        up_h,
    );

    Arrangement {
        width: (2.0 * MARGIN + down_w + SPACING + up_w).ceil() as u32,
        height: (2.0 * MARGIN + row_height).ceil() as u32,
        boxes: [down, up],
    }
}

/// Computes the surface size needed for `frame`.
pub fn measure(frame: &OverlayFrame) -> Result<Arrangement, SurfaceError> {
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1)
        .map_err(|err| SurfaceError::Render(err.to_string()))?;
    let cr = cairo::Context::new(&surface).map_err(|err| SurfaceError::Render(err.to_string()))?;
    let layout = text_layout(&cr);

    Ok(arrange(frame.indicators().map(|indicator| {
        layout.set_text(&indicator.text());
        layout.pixel_size()
    })))
}

/// Draws `frame` into an ARGB8888 `canvas` of `arrangement.width` x `arrangement.height`.
pub fn render_frame(
    canvas: &mut [u8],
    arrangement: &Arrangement,
    frame: &OverlayFrame,
) -> Result<(), SurfaceError> {
    let width = arrangement.width as i32;
    let height = arrangement.height as i32;
    let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
        .map_err(|err| SurfaceError::Render(err.to_string()))?;

    {
        let cr =
            cairo::Context::new(&surface).map_err(|err| SurfaceError::Render(err.to_string()))?;
        draw(&cr, arrangement, frame).map_err(|err| SurfaceError::Render(err.to_string()))?;
    }

    surface.flush();
    let data = surface
        .data()
        .map_err(|err| SurfaceError::Render(err.to_string()))?;
    let len = canvas.len().min(data.len());
    canvas[..len].copy_from_slice(&data[..len]);
    Ok(())
}

fn draw(
    cr: &cairo::Context,
    arrangement: &Arrangement,
    frame: &OverlayFrame,
) -> Result<(), cairo::Error> {
    // Clear background to fully transparent
    cr.save()?;
    cr.set_operator(cairo::Operator::Source);
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.0);
    cr.paint()?;
    cr.restore()?;

    cr.push_group();
    let layout = text_layout(cr);

    for (indicator, &(x, y, w, h)) in frame.indicators().into_iter().zip(&arrangement.boxes) {
        rounded_rect(cr, x, y, w, h, CORNER_RADIUS);
        cr.set_source_rgba(0.0, 0.0, 0.0, BACKGROUND_ALPHA);
        cr.fill()?;

        layout.set_text(&indicator.text());
        let (r, g, b) = indicator.color().to_cairo();
        cr.set_source_rgb(r, g, b);
        cr.move_to(x + PADDING_X, y + PADDING_Y);
        pangocairo::functions::show_layout(cr, &layout);
    }

    cr.pop_group_to_source()?;
    cr.paint_with_alpha(OPACITY)?;
    Ok(())
}

fn text_layout(cr: &cairo::Context) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(cr);
    let font_desc = pango::FontDescription::from_string(FONT);
    layout.set_font_description(Some(&font_desc));
    layout
}

fn rounded_rect(cr: &cairo::Context, x: f64, y: f64, width: f64, height: f64, radius: f64) {
    let radius = radius.min(width / 2.0).min(height / 2.0);
    cr.new_sub_path();
    cr.arc(x + width - radius, y + radius, radius, -FRAC_PI_2, 0.0);
    cr.arc(x + width - radius, y + height - radius, radius, 0.0, FRAC_PI_2);
    cr.arc(x + radius, y + height - radius, radius, FRAC_PI_2, PI);
    cr.arc(x + radius, y + radius, radius, PI, 3.0 * FRAC_PI_2);
    cr.close_path();
}
