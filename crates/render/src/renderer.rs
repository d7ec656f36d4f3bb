use catalog::StarRecord;
use foundation::math::Vec2;
use scene::projection::{DEC_SPAN_DEG, RA_SPAN_HOURS, SkyProjection};
use scene::visibility::stars_on_canvas;

use crate::style::{RenderStyle, Rgba};
use crate::surface::Surface;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderCommand {
    Clear {
        color: Rgba,
        width: f64,
        height: f64,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
        width: f64,
    },
    Star {
        id: i64,
        center: Vec2,
        radius: f64,
        color: Rgba,
    },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderFrame {
    pub commands: Vec<RenderCommand>,
}

impl RenderFrame {
    /// Star commands only, in draw order.
    pub fn stars(&self) -> impl Iterator<Item = &RenderCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Star { .. }))
    }

    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) {
        for cmd in &self.commands {
            match *cmd {
                RenderCommand::Clear {
                    color,
                    width,
                    height,
                } => surface.clear(color, width, height),
                RenderCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => surface.line(from, to, color, width),
                RenderCommand::Star {
                    center,
                    radius,
                    color,
                    ..
                } => surface.fill_circle(center, radius, color),
            }
        }
    }
}

/// Per-frame options that are not part of the style.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct FrameOptions {
    pub show_grid: bool,
}

pub struct Renderer;

impl Renderer {
    /// Builds the full command list for one frame: background, optional grid,
    /// then every star that lands on the canvas.
    pub fn collect(
        stars: &[StarRecord],
        proj: &SkyProjection,
        style: &RenderStyle,
        opts: FrameOptions,
    ) -> RenderFrame {
        let vp = proj.viewport();
        let mut frame = RenderFrame::default();
        frame.commands.push(RenderCommand::Clear {
            color: style.background,
            width: vp.width,
            height: vp.height,
        });

        if opts.show_grid {
            Self::collect_grid(&mut frame, proj, style);
        }

        let zoom = proj.zoom();
        for visible in stars_on_canvas(stars, *proj) {
            let mag = visible.star.mag;
            frame.commands.push(RenderCommand::Star {
                id: visible.star.id,
                center: visible.screen,
                radius: style.star_radius(mag) * zoom,
                color: style.star_color.with_alpha(style.star_opacity(mag)),
            });
        }

        frame
    }

    /// Empty frame shown while the catalog is still loading.
    pub fn collect_blank(proj: &SkyProjection, style: &RenderStyle) -> RenderFrame {
        let vp = proj.viewport();
        RenderFrame {
            commands: vec![RenderCommand::Clear {
                color: style.background,
                width: vp.width,
                height: vp.height,
            }],
        }
    }

    fn collect_grid(frame: &mut RenderFrame, proj: &SkyProjection, style: &RenderStyle) {
        let vp = proj.viewport();

        for ra in grid_steps(0.0, RA_SPAN_HOURS, style.grid_ra_step_hours) {
            let x = proj.world_to_screen(ra, 0.0).x;
            frame.commands.push(RenderCommand::Line {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, vp.height),
                color: style.grid_color,
                width: style.grid_line_width,
            });
        }

        let half = DEC_SPAN_DEG / 2.0;
        for dec in grid_steps(-half, half, style.grid_dec_step_deg) {
            let y = proj.world_to_screen(0.0, dec).y;
            frame.commands.push(RenderCommand::Line {
                from: Vec2::new(0.0, y),
                to: Vec2::new(vp.width, y),
                color: style.grid_color,
                width: style.grid_line_width,
            });
        }
    }
}

/// `start, start + step, ...` up to and including `end`.
fn grid_steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 && end >= start {
        ((end - start) / step + 1e-9).floor() as usize + 1
    } else {
        0
    };
    (0..count).map(move |i| start + i as f64 * step)
}
