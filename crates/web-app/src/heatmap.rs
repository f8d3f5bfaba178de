use musclemap_domain::{DrawInstruction, Level, Role, View};
use plotters::{
    prelude::{Circle, IntoDrawingArea, SVGBackend},
    style::{Color, RGBColor, WHITE},
};

use crate::{Settings, Theme};

/// Number of concentric circles approximating the radial gradient of a spot.
pub const GRADIENT_STEPS: usize = 12;

/// Radial gradient from the center (t = 0) to the edge (t = 1) of a spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatGradient {
    pub color: RGBColor,
    pub center: f64,
    pub middle: f64,
    pub edge: f64,
}

pub const PRIMARY_GRADIENT: HeatGradient = HeatGradient {
    color: RGBColor(255, 77, 79),
    center: 0.95,
    middle: 0.35,
    edge: 0.,
};

pub const SECONDARY_GRADIENT: HeatGradient = HeatGradient {
    color: RGBColor(255, 193, 7),
    center: 0.85,
    middle: 0.28,
    edge: 0.,
};

impl HeatGradient {
    #[must_use]
    pub fn of(role: Role) -> Self {
        match role {
            Role::Primary => PRIMARY_GRADIENT,
            Role::Secondary => SECONDARY_GRADIENT,
        }
    }

    /// Opacity at the relative distance `t` from the center.
    #[must_use]
    pub fn alpha_at(&self, t: f64) -> f64 {
        let t = t.clamp(0., 1.);
        if t <= 0.5 {
            self.center + (self.middle - self.center) * t * 2.
        } else {
            self.middle + (self.edge - self.middle) * (t - 0.5) * 2.
        }
    }

    /// Opacities of `steps` concentric circles, from the outermost to the
    /// innermost.
    ///
    /// Painted on top of each other, the circles reach the gradient's opacity
    /// in the middle of each band.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn band_alphas(&self, steps: usize) -> Vec<f64> {
        let mut previous = 0.;
        (0..steps)
            .map(|i| {
                let target = self.alpha_at(1. - (i as f64 + 0.5) / steps as f64);
                let alpha = if target <= previous || previous >= 1. {
                    0.
                } else {
                    (target - previous) / (1. - previous)
                };
                previous = f64::max(previous, target);
                alpha
            })
            .collect()
    }
}

/// Size of the drawing surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.,
        }
    }

    fn ratio(&self, settings: &Settings) -> f64 {
        if settings.scale_by_device_pixel_ratio && self.device_pixel_ratio > 0. {
            self.device_pixel_ratio
        } else {
            1.
        }
    }

    /// Width and height in pixels of the rendered image.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(&self, settings: &Settings) -> (u32, u32) {
        let ratio = self.ratio(settings);
        (
            (f64::from(self.width.max(1)) * ratio).round().max(1.) as u32,
            (f64::from(self.height.max(1)) * ratio).round().max(1.) as u32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub role: Role,
    pub level: Level,
}

/// Place the spots of one view on a canvas.
///
/// The order of the instructions is retained. Secondary spots are omitted if
/// disabled in the settings.
#[must_use]
pub fn spots(
    instructions: &[DrawInstruction],
    view: View,
    canvas: Canvas,
    settings: &Settings,
) -> Vec<Spot> {
    let ratio = canvas.ratio(settings);
    let width = f64::from(canvas.width.max(1));
    let height = f64::from(canvas.height.max(1));
    let base = width.min(height) * settings.base_radius;

    instructions
        .iter()
        .filter(|i| i.view == view)
        .filter(|i| settings.show_secondary || i.role == Role::Primary)
        .map(|i| Spot {
            x: f64::from(i.x) / 100. * width * ratio,
            y: f64::from(i.y) / 100. * height * ratio,
            radius: base
                * (0.8 + 0.2 * f64::from(u8::from(i.level)))
                * f64::from(i.scale)
                * ratio,
            role: i.role,
            level: i.level,
        })
        .collect()
}

/// Render the spots of one view as SVG image.
///
/// Each spot is painted as a stack of concentric circles approximating its
/// radial gradient. The background follows the theme of the settings, with the
/// system theme resolved to the preferred color scheme.
#[allow(
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn render_svg(
    instructions: &[DrawInstruction],
    view: View,
    canvas: Canvas,
    settings: &Settings,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut result = String::new();

    {
        let root =
            SVGBackend::with_string(&mut result, canvas.pixel_size(settings)).into_drawing_area();

        root.fill(&background_color(settings.current_theme()))?;

        for spot in spots(instructions, view, canvas, settings) {
            let gradient = HeatGradient::of(spot.role);
            let center = (spot.x.round() as i32, spot.y.round() as i32);
            for (i, alpha) in gradient.band_alphas(GRADIENT_STEPS).into_iter().enumerate() {
                if alpha <= 0. {
                    continue;
                }
                let radius = spot.radius * (1. - i as f64 / GRADIENT_STEPS as f64);
                let radius = radius.round() as u32;
                if radius == 0 {
                    continue;
                }
                root.draw(&Circle::new(
                    center,
                    radius,
                    gradient.color.mix(alpha).filled(),
                ))?;
            }
        }

        root.present()?;
    }

    Ok(result)
}

fn background_color(theme: Theme) -> RGBColor {
    match theme {
        Theme::System | Theme::Light => WHITE,
        Theme::Dark => RGBColor(20, 22, 26),
    }
}
