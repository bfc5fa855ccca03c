//! SVG rendering of target diagrams with plotters.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_backend::text_anchor::{HPos, Pos, VPos};

use super::{RenderContext, SceneRenderer};
use crate::error::{AnalysisError, Result};
use crate::models::{AxisRange, Bounds, MarkerColor, Point, Scene};

/// Pixels reserved below the plot for x tick labels.
const X_LABEL_AREA_PX: f64 = 40.0;
/// Pixels reserved left of the plot for y tick labels.
const Y_LABEL_AREA_PX: f64 = 60.0;
/// Upper bound on grid lines drawn per axis and weight.
pub const MAX_GRID_LINES: usize = 100;
const RING_SEGMENTS: usize = 180;
const MARKER_SIZE_PX: i32 = 5;
const LABEL_GAP_PX: i32 = 8;
const RING_LABEL_OFFSET_PX: i32 = 5;

/// Renders scenes as standalone SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    context: RenderContext,
}

impl SvgRenderer {
    pub fn new(context: RenderContext) -> Self {
        Self { context }
    }

    /// Render a scene into an SVG document string.
    pub fn render_to_string(&self, scene: &Scene) -> Result<String> {
        let frame = Frame::new(&self.context, &scene.bounds)?;
        let size = (self.context.width as u32, self.context.height as u32);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            self.draw_scene(&root, scene, &frame)
                .map_err(|e| AnalysisError::Render(e.to_string()))?;
        }
        Ok(svg)
    }

    fn font(&self, scale: f64) -> FontDesc<'_> {
        FontDesc::new(
            FontFamily::Name(&self.context.font_family),
            self.context.font_size * scale,
            FontStyle::Normal,
        )
    }

    fn draw_scene(
        &self,
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        scene: &Scene,
        frame: &Frame,
    ) -> anyhow::Result<()> {
        let ctx = &self.context;
        root.fill(&WHITE)?;

        let (title_area, body) = root.split_vertically(ctx.title_height as i32);
        self.draw_title(&title_area, &scene.title)?;

        let mut chart = ChartBuilder::on(&body)
            .margin(ctx.margin as i32)
            .x_label_area_size(X_LABEL_AREA_PX as i32)
            .y_label_area_size(Y_LABEL_AREA_PX as i32)
            .build_cartesian_2d(
                frame.x.min..frame.x.max,
                frame.y.min..frame.y.max,
            )?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_label_formatter(&|v| format!("{:.1}", v))
            .y_label_formatter(&|v| format!("{:.1}", v))
            .label_style(self.font(0.8).color(&BLACK))
            .draw()?;

        let (x, y) = (frame.x, frame.y);

        // Minor lines first so major lines sit on top.
        let grid = [
            (scene.grid.minor, BLACK.mix(0.15).stroke_width(1)),
            (scene.grid.major, BLACK.mix(0.35).stroke_width(1)),
        ];
        for (step, style) in grid {
            chart.draw_series(
                grid_lines(&x, step)
                    .into_iter()
                    .map(|gx| PathElement::new(vec![(gx, y.min), (gx, y.max)], style)),
            )?;
            chart.draw_series(
                grid_lines(&y, step)
                    .into_iter()
                    .map(|gy| PathElement::new(vec![(x.min, gy), (x.max, gy)], style)),
            )?;
        }

        let ring_label_style = self.font(0.7).color(&RGBColor(0, 128, 0)).pos(Pos::new(HPos::Left, VPos::Center));
        for ring in &scene.rings {
            chart.draw_series(
                ring_runs(ring.radius, frame)
                    .into_iter()
                    .map(|run| PathElement::new(run, BLACK.stroke_width(1))),
            )?;
            let anchor = ring.label_anchor;
            if frame.contains(anchor) {
                chart.draw_series(std::iter::once(
                    EmptyElement::at((anchor.x, anchor.y))
                        + Text::new(
                            ring.label.clone(),
                            (RING_LABEL_OFFSET_PX, 0),
                            ring_label_style.clone(),
                        ),
                ))?;
            }
        }

        let marker_label_style = self.font(1.0).color(&BLACK).pos(Pos::new(HPos::Center, VPos::Bottom));
        let line_height = (ctx.font_size * 1.2) as i32;
        for marker in scene.markers.iter().filter(|m| frame.contains(m.position)) {
            let at = (marker.position.x, marker.position.y);
            chart.draw_series(std::iter::once(
                EmptyElement::at(at)
                    + Cross::new((0, 0), MARKER_SIZE_PX, rgb(marker.color).stroke_width(2)),
            ))?;

            // Last line closest to the marker.
            let lines: Vec<&str> = marker.label.split('\n').collect();
            let count = lines.len() as i32;
            for (i, line) in lines.iter().enumerate() {
                let dy = -LABEL_GAP_PX - (count - 1 - i as i32) * line_height;
                chart.draw_series(std::iter::once(
                    EmptyElement::at(at)
                        + Text::new(line.to_string(), (0, dy), marker_label_style.clone()),
                ))?;
            }
        }

        for overlay in &scene.overlays {
            let color = rgb(overlay.color());
            let style = color.stroke_width(2);
            let annotation = match overlay {
                crate::models::StatOverlay::Centroid { position, .. } => {
                    let points = if frame.contains(*position) { vec![*position] } else { vec![] };
                    chart.draw_series(points.into_iter().map(|p| {
                        EmptyElement::at((p.x, p.y))
                            + PathElement::new(vec![(-7, 0), (7, 0)], style)
                            + PathElement::new(vec![(0, -7), (0, 7)], style)
                    }))?
                }
                crate::models::StatOverlay::Median { position, .. } => {
                    let points = if frame.contains(*position) { vec![*position] } else { vec![] };
                    chart.draw_series(points.into_iter().map(|p| {
                        EmptyElement::at((p.x, p.y))
                            + PathElement::new(vec![(0, 0), (0, 7)], style)
                            + PathElement::new(vec![(0, 0), (-6, -4)], style)
                            + PathElement::new(vec![(0, 0), (6, -4)], style)
                    }))?
                }
                crate::models::StatOverlay::MaxDistance { from, to, .. } => {
                    let segment = clip_segment(*from, *to, frame);
                    chart.draw_series(segment.into_iter().map(|(a, b)| {
                        PathElement::new(vec![(a.x, a.y), (b.x, b.y)], color.mix(0.8).stroke_width(2))
                    }))?
                }
            };
            annotation
                .label(overlay.label())
                .legend(move |(lx, ly)| PathElement::new(vec![(lx, ly), (lx + 20, ly)], style));
        }

        if !scene.overlays.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK.mix(0.3))
                .label_font(self.font(1.0).color(&BLACK))
                .draw()?;
        }

        root.present()?;
        Ok(())
    }

    fn draw_title(&self, area: &DrawingArea<SVGBackend<'_>, Shift>, title: &str) -> anyhow::Result<()> {
        let ctx = &self.context;
        let style = self.font(1.2).color(&BLACK).pos(Pos::new(HPos::Center, VPos::Top));
        let line_height = ctx.font_size * 1.2 * 1.4;
        let centre_x = (ctx.width / 2.0) as i32;

        for (i, line) in title.split('\n').enumerate() {
            let top = (ctx.margin / 2.0 + line_height * i as f64) as i32;
            area.draw(&Text::new(line.to_string(), (centre_x, top), style.clone()))?;
        }
        Ok(())
    }
}

impl SceneRenderer for SvgRenderer {
    fn file_extension(&self) -> &'static str {
        "svg"
    }

    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn render(&self, scene: &Scene) -> Result<Vec<u8>> {
        self.render_to_string(scene).map(String::into_bytes)
    }
}

fn rgb(color: MarkerColor) -> RGBColor {
    match color {
        MarkerColor::Red => RGBColor(255, 0, 0),
        MarkerColor::Blue => RGBColor(0, 0, 255),
        MarkerColor::Orange => RGBColor(255, 165, 0),
        MarkerColor::Purple => RGBColor(128, 0, 128),
        MarkerColor::Grey => RGBColor(128, 128, 128),
    }
}

/// Displayed axis ranges.
///
/// The scene bounds are widened on one axis so that a millimetre covers the
/// same number of pixels horizontally and vertically.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: AxisRange,
    y: AxisRange,
}

impl Frame {
    fn new(ctx: &RenderContext, bounds: &Bounds) -> Result<Self> {
        let plot_w = ctx.width - 2.0 * ctx.margin - Y_LABEL_AREA_PX;
        let plot_h = ctx.height - ctx.title_height - 2.0 * ctx.margin - X_LABEL_AREA_PX;
        if plot_w <= 0.0 || plot_h <= 0.0 {
            return Err(AnalysisError::Render(format!(
                "canvas {}x{} leaves no room for the plot",
                ctx.width, ctx.height
            )));
        }
        let (x_span, y_span) = (bounds.x.span(), bounds.y.span());
        if !(x_span > 0.0 && y_span > 0.0 && x_span.is_finite() && y_span.is_finite()) {
            return Err(AnalysisError::Render("degenerate axis bounds".to_string()));
        }

        // Millimetres per pixel, the coarser axis wins.
        let mm_per_px = (x_span / plot_w).max(y_span / plot_h);
        Ok(Self {
            x: widen(&bounds.x, mm_per_px * plot_w),
            y: widen(&bounds.y, mm_per_px * plot_h),
        })
    }

    fn contains(&self, p: Point) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }
}

fn widen(range: &AxisRange, span: f64) -> AxisRange {
    let centre = (range.min + range.max) / 2.0;
    AxisRange::new(centre - span / 2.0, centre + span / 2.0)
}

/// Multiples of `step` inside `range`.
///
/// On windows wider than [`MAX_GRID_LINES`] steps only every `k`-th multiple
/// is kept, so the line count stays bounded however far out the shots are.
fn grid_lines(range: &AxisRange, step: f64) -> Vec<f64> {
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let count = range.span() / step;
    let stride = if count > MAX_GRID_LINES as f64 {
        (count / MAX_GRID_LINES as f64).ceil()
    } else {
        1.0
    };
    let step = step * stride;

    let first = (range.min / step).ceil() as i64;
    let last = (range.max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Liang-Barsky clip of a segment against the displayed window, as the
/// parameter interval `t0..=t1` along `a -> b`.
fn clip_params(a: Point, b: Point, frame: &Frame) -> Option<(f64, f64)> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let edges = [
        (-dx, a.x - frame.x.min),
        (dx, frame.x.max - a.x),
        (-dy, a.y - frame.y.min),
        (dy, frame.y.max - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
    }
}

fn clip_segment(a: Point, b: Point, frame: &Frame) -> Option<(Point, Point)> {
    clip_params(a, b, frame).map(|(t0, t1)| (lerp(a, b, t0), lerp(a, b, t1)))
}

/// A ring as polylines clipped to the window; a ring leaving and re-entering
/// the window yields several runs.
fn ring_runs(radius: f64, frame: &Frame) -> Vec<Vec<(f64, f64)>> {
    let point_at = |k: usize| {
        let angle = std::f64::consts::TAU * k as f64 / RING_SEGMENTS as f64;
        Point::new(radius * angle.cos(), radius * angle.sin())
    };

    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for k in 0..RING_SEGMENTS {
        let (a, b) = (point_at(k), point_at(k + 1));
        let Some((t0, t1)) = clip_params(a, b, frame) else {
            if current.len() > 1 {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
            continue;
        };

        if current.is_empty() || t0 > 0.0 {
            if current.len() > 1 {
                runs.push(std::mem::take(&mut current));
            }
            let start = lerp(a, b, t0);
            current = vec![(start.x, start.y)];
        }
        let end = lerp(a, b, t1);
        current.push((end.x, end.y));
        if t1 < 1.0 {
            runs.push(std::mem::take(&mut current));
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}
