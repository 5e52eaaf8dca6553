use crate::core::models::profile::ProfileBlock;
use crate::core::models::structure::{Axis, BoxDims};
use crate::core::utils::stats::{interp_onto, linspace};
use crate::render::style::series_color;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Common grid for the summed polymer+solvent column.
const TOTAL_GRID_POINTS: usize = 200;
/// At most this many time slices are drawn per panel.
const MAX_CURVES: usize = 10;

const FIGURE_SIZE: (u32, u32) = (1800, 1000);

/// Which spatial profile a file carries, fixing its bin width and the
/// transform applied to raw bin values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Stress,
    VolumeFraction,
}

impl ProfileKind {
    pub fn bin_width(self) -> f64 {
        match self {
            ProfileKind::Stress => 2.0,
            ProfileKind::VolumeFraction => 0.5,
        }
    }

    fn value_label(self) -> &'static str {
        match self {
            ProfileKind::Stress => "Partial stress",
            ProfileKind::VolumeFraction => "Volume fraction",
        }
    }

    fn total_label(self) -> &'static str {
        match self {
            ProfileKind::Stress => "Total stress",
            ProfileKind::VolumeFraction => "Total volume fraction",
        }
    }
}

/// One phase's profile blocks for the three axes; an empty slot means the
/// corresponding file was absent.
#[derive(Debug, Clone, Default)]
pub struct PhaseProfiles {
    axes: [Vec<ProfileBlock>; 3],
}

impl PhaseProfiles {
    pub fn set(&mut self, axis: Axis, blocks: Vec<ProfileBlock>) {
        self.axes[axis.index()] = blocks;
    }

    pub fn get(&self, axis: Axis) -> &[ProfileBlock] {
        &self.axes[axis.index()]
    }
}

/// Polymer and solvent profiles, the inputs of one 3x3 figure.
#[derive(Debug, Clone, Default)]
pub struct ProfileGrid {
    pub polymer: PhaseProfiles,
    pub solvent: PhaseProfiles,
}

struct Curve {
    timestep: u64,
    points: Vec<(f64, f64)>,
}

/// Bin index -> normalized coordinate and raw value -> plotted value for one
/// block.
fn block_xy(block: &ProfileBlock, kind: ProfileKind, axis: Axis, dims: &BoxDims) -> (Vec<f64>, Vec<f64>) {
    let width = kind.bin_width();
    let scale = match kind {
        ProfileKind::Stress => 1.0,
        ProfileKind::VolumeFraction => dims.bin_volume(axis, width),
    };
    let length = dims.get(axis);
    let xs = block
        .indices
        .iter()
        .map(|&i| (i as f64 * width - width / 2.0) / length)
        .collect();
    let ys = block.values.iter().map(|v| v / scale).collect();
    (xs, ys)
}

fn phase_curves(
    blocks: &[ProfileBlock],
    kind: ProfileKind,
    axis: Axis,
    dims: &BoxDims,
) -> Vec<Curve> {
    let interval = (blocks.len() / MAX_CURVES).max(1);
    blocks
        .iter()
        .enumerate()
        .filter(|(i, _)| i % interval == 0)
        .map(|(_, block)| {
            let (xs, ys) = block_xy(block, kind, axis, dims);
            Curve {
                timestep: block.timestep,
                points: xs.into_iter().zip(ys).collect(),
            }
        })
        .collect()
}

/// Polymer and solvent interpolated onto a shared grid and summed; only
/// defined when both phases have data.
fn total_curves(
    polymer: &[ProfileBlock],
    solvent: &[ProfileBlock],
    kind: ProfileKind,
    axis: Axis,
    dims: &BoxDims,
) -> Vec<Curve> {
    if polymer.is_empty() || solvent.is_empty() {
        return Vec::new();
    }
    let interval = (polymer.len() / MAX_CURVES).max(1);
    let grid = linspace(0.0, 1.0, TOTAL_GRID_POINTS);
    polymer
        .iter()
        .zip(solvent)
        .enumerate()
        .filter(|(i, _)| i % interval == 0)
        .map(|(_, (poly, solv))| {
            let (px, py) = block_xy(poly, kind, axis, dims);
            let (sx, sy) = block_xy(solv, kind, axis, dims);
            let poly_interp = interp_onto(&grid, &px, &py);
            let solv_interp = interp_onto(&grid, &sx, &sy);
            let points = grid
                .iter()
                .zip(poly_interp.iter().zip(&solv_interp))
                .map(|(&x, (&p, &s))| (x, p + s))
                .collect();
            Curve {
                timestep: poly.timestep,
                points,
            }
        })
        .collect()
}

/// Renders the 3x3 profile figure: rows X/Y/Z, columns polymer / solvent /
/// total, with y-ranges shared per column across the axis rows.
pub fn render_profiles(
    kind: ProfileKind,
    grid: &ProfileGrid,
    dims: &BoxDims,
    title: &str,
    path: &Path,
) -> Result<()> {
    let mut cells: Vec<[Vec<Curve>; 3]> = Vec::with_capacity(3);
    for &axis in &Axis::ALL {
        cells.push([
            phase_curves(grid.polymer.get(axis), kind, axis, dims),
            phase_curves(grid.solvent.get(axis), kind, axis, dims),
            total_curves(
                grid.polymer.get(axis),
                grid.solvent.get(axis),
                kind,
                axis,
                dims,
            ),
        ]);
    }

    // Shared per-column y-ranges, so the three axis rows are comparable.
    let mut col_ranges = [(f64::INFINITY, f64::NEG_INFINITY); 3];
    for row in &cells {
        for (column, curves) in row.iter().enumerate() {
            for curve in curves {
                for &(_, y) in &curve.points {
                    let (lo, hi) = col_ranges[column];
                    col_ranges[column] = (lo.min(y), hi.max(y));
                }
            }
        }
    }

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 28))?;
    let areas = inner.split_evenly((3, 3));

    let column_titles = ["Polymer", "Solvent", "Total"];
    for (r, &axis) in Axis::ALL.iter().enumerate() {
        let upper = axis.label().to_uppercase();
        for (c, curves) in cells[r].iter().enumerate() {
            let x_range = if c == 0 {
                x_bounds(curves)
            } else {
                (0.0, 1.0)
            };
            let value_label = if c == 2 {
                kind.total_label()
            } else {
                kind.value_label()
            };
            draw_profile_panel(
                &areas[r * 3 + c],
                curves,
                x_range,
                padded(col_ranges[c]),
                format!("{upper}/L{upper}"),
                format!("{value_label} ({upper})"),
                (r == 0).then_some(column_titles[c]),
                r == 0 && c == 0,
            )?;
        }
    }

    root.present()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_profile_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    curves: &[Curve],
    x_range: (f64, f64),
    y_range: (f64, f64),
    x_label: String,
    y_label: String,
    caption: Option<&str>,
    with_legend: bool,
) -> Result<()> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(8).x_label_area_size(35).y_label_area_size(60);
    if let Some(text) = caption {
        builder.caption(text, ("sans-serif", 18));
    }
    let mut chart = builder.build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    for (i, curve) in curves.iter().enumerate() {
        let color = series_color(i);
        let anno = chart.draw_series(LineSeries::new(
            curve.points.iter().copied(),
            color.mix(0.7).stroke_width(2),
        ))?;
        if with_legend {
            anno.label(format!("t={}", curve.timestep))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], color));
        }
    }
    if with_legend && !curves.is_empty() {
        chart
            .configure_series_labels()
            .label_font(("sans-serif", 10))
            .background_style(WHITE.mix(0.8))
            .draw()?;
    }

    Ok(())
}

fn x_bounds(curves: &[Curve]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for curve in curves {
        for &(x, _) in &curve.points {
            lo = lo.min(x);
            hi = hi.max(x);
        }
    }
    padded((lo, hi))
}

fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let margin = (hi - lo) * 0.05;
    (lo - margin, hi + margin)
}
