use crate::figure::{grid_dims, label_stride, Figure, Panel};
use crate::RenderError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::{PI, TAU};
use std::path::Path;

const BAR_COLOR: RGBColor = RGBColor(68, 114, 196);
const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);

/// Renders the figure into an RGB8 pixel buffer for display.
pub fn render_to_rgb(figure: &Figure) -> Result<(Vec<u8>, (u32, u32)), RenderError> {
    let (width, height) = figure.size();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure)?;
        root.present()
            .map_err(|e| RenderError::Draw(e.to_string()))?;
    }
    Ok((buffer, (width, height)))
}

/// Writes the figure to `path`; `.svg` selects the vector backend,
/// anything else is encoded as PNG.
pub fn render_to_file(figure: &Figure, path: &Path) -> Result<(), RenderError> {
    let (width, height) = figure.size();
    let export = |reason: String| RenderError::Export {
        path: path.display().to_string(),
        reason,
    };
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);
    if is_svg {
        let root = SVGBackend::new(path, (width, height)).into_drawing_area();
        draw_figure(&root, figure)?;
        root.present().map_err(|e| export(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        draw_figure(&root, figure)?;
        root.present().map_err(|e| export(e.to_string()))?;
    }
    Ok(())
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> Result<(), RenderError> {
    root.fill(&WHITE)
        .map_err(|e| RenderError::Draw(e.to_string()))?;

    let (rows, cols) = grid_dims(figure.panels().len());
    let cells = root.split_evenly((rows, cols));
    for (panel, cell) in figure.panels().iter().zip(cells.iter()) {
        match panel {
            Panel::Bars {
                title,
                labels,
                heights,
            } => draw_bars(cell, title, labels, heights)?,
            Panel::Rose { title, bins } => draw_rose(cell, title, bins)?,
        }
    }
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    labels: &[String],
    heights: &[f64],
) -> Result<(), RenderError> {
    let count = labels.len();
    let top = heights.iter().cloned().fold(0.0_f64, f64::max);
    let top = if top > 0.0 { top * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .caption(title, ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 45)
        .set_label_area_size(LabelAreaPosition::Bottom, 30)
        .build_cartesian_2d((0..count).into_segmented(), 0.0_f64..top)
        .map_err(|e| RenderError::Draw(e.to_string()))?;

    let stride = label_stride(count);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(count + 1)
        .x_label_formatter(&|segment| {
            let index = match segment {
                SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => *i,
                SegmentValue::Last => return String::new(),
            };
            if index % stride == 0 {
                labels.get(index).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .label_style(("sans-serif", 12))
        .axis_style(&GRID_COLOR)
        .draw()
        .map_err(|e| RenderError::Draw(e.to_string()))?;

    chart
        .draw_series(heights.iter().enumerate().map(|(index, &height)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(index), 0.0),
                    (SegmentValue::Exact(index + 1), height),
                ],
                BAR_COLOR.mix(0.8).filled(),
            )
        }))
        .map_err(|e| RenderError::Draw(e.to_string()))?;
    Ok(())
}

fn draw_rose<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    bins: &[usize],
) -> Result<(), RenderError> {
    let top = bins.iter().copied().max().unwrap_or(0).max(1) as f64;

    // Equal units per pixel in x and y so the rings stay circular.
    let (width, height) = area.dim_in_pixel();
    let aspect = if height > 0 {
        width as f64 / height as f64
    } else {
        1.0
    };
    let (x_half, y_half) = if aspect >= 1.0 {
        (1.2 * aspect, 1.2)
    } else {
        (1.2, 1.2 / aspect)
    };

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .caption(title, ("sans-serif", 20))
        .build_cartesian_2d(-x_half..x_half, -y_half..y_half)
        .map_err(|e| RenderError::Draw(e.to_string()))?;

    for ring in 1..=4 {
        let radius = ring as f64 / 4.0;
        chart
            .draw_series(std::iter::once(PathElement::new(
                circle_points(radius),
                &GRID_COLOR,
            )))
            .map_err(|e| RenderError::Draw(e.to_string()))?;
    }
    for spoke in 0..8 {
        let angle = spoke as f64 * PI / 4.0;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, 0.0), (angle.cos(), angle.sin())],
                &GRID_COLOR,
            )))
            .map_err(|e| RenderError::Draw(e.to_string()))?;
    }

    let bin_width = TAU / bins.len() as f64;
    chart
        .draw_series(
            bins.iter()
                .enumerate()
                .filter(|(_, &count)| count > 0)
                .map(|(index, &count)| {
                    let radius = count as f64 / top;
                    let start = index as f64 * bin_width;
                    Polygon::new(
                        wedge_points(start, start + bin_width, radius),
                        BAR_COLOR.mix(0.55).filled(),
                    )
                }),
        )
        .map_err(|e| RenderError::Draw(e.to_string()))?;
    Ok(())
}

fn circle_points(radius: f64) -> Vec<(f64, f64)> {
    (0..=96)
        .map(|step| {
            let angle = TAU * step as f64 / 96.0;
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn wedge_points(start: f64, stop: f64, radius: f64) -> Vec<(f64, f64)> {
    let mut points = vec![(0.0, 0.0)];
    for step in 0..=16 {
        let angle = start + (stop - start) * step as f64 / 16.0;
        points.push((radius * angle.cos(), radius * angle.sin()));
    }
    points
}
