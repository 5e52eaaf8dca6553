use crate::core::utils::stats::{linspace, log_log_fit};
use crate::render::style::{PURPLE, category_color};
use crate::tracking::entry::{SimTags, TrackingEntry};
use anyhow::Result;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::combinators::LogCoord;
use plotters::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// What a run measured, decoded from the padding digits of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    SimOnly,
    Stress,
    Volume,
    StressVolume,
}

/// Run category for the scaling plot: measurement kind plus whether a piston
/// was present (padding code leading with 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunClass {
    pub kind: RunKind,
    pub piston: bool,
}

impl RunClass {
    /// Two-digit padding codes are plain runs; three or more digits select
    /// the measurement by the third digit (1 stress, 2 volume, 3 both).
    pub fn from_padding(padding: u32) -> Option<Self> {
        let digits = padding.to_string();
        let piston = digits.starts_with('4');
        let kind = match digits.len() {
            2 => RunKind::SimOnly,
            n if n >= 3 => match digits.as_bytes()[2] {
                b'1' => RunKind::Stress,
                b'2' => RunKind::Volume,
                b'3' => RunKind::StressVolume,
                _ => return None,
            },
            _ => return None,
        };
        Some(Self { kind, piston })
    }

    const ALL: [RunClass; 8] = [
        RunClass { kind: RunKind::SimOnly, piston: false },
        RunClass { kind: RunKind::Stress, piston: false },
        RunClass { kind: RunKind::Volume, piston: false },
        RunClass { kind: RunKind::StressVolume, piston: false },
        RunClass { kind: RunKind::SimOnly, piston: true },
        RunClass { kind: RunKind::Stress, piston: true },
        RunClass { kind: RunKind::Volume, piston: true },
        RunClass { kind: RunKind::StressVolume, piston: true },
    ];

    fn label(self) -> String {
        let base = match self.kind {
            RunKind::SimOnly => "Simulation only",
            RunKind::Stress => "Sim. + stress",
            RunKind::Volume => "Sim. + volume",
            RunKind::StressVolume => "Sim. + stress/vol",
        };
        if self.piston {
            format!("{base} (piston)")
        } else {
            base.to_string()
        }
    }

    fn color(self) -> RGBColor {
        if self.piston {
            return GREEN;
        }
        match self.kind {
            RunKind::SimOnly => BLACK,
            RunKind::Stress => RED,
            RunKind::Volume => BLUE,
            RunKind::StressVolume => PURPLE,
        }
    }
}

struct PerfPoint {
    atoms: f64,
    seconds: f64,
    beads: u32,
    padding: u32,
    nsteps: u64,
    class: Option<RunClass>,
}

/// Entries with a known wall time, joined with the tags their names carry.
fn perf_points(entries: &[TrackingEntry]) -> Vec<PerfPoint> {
    entries
        .iter()
        .filter_map(|entry| {
            let seconds = entry.wall_time.seconds()?;
            let tags = SimTags::from_name(&entry.name);
            Some(PerfPoint {
                atoms: entry.atoms as f64,
                seconds,
                beads: tags.beads,
                padding: tags.padding,
                nsteps: tags.nsteps,
                class: RunClass::from_padding(tags.padding),
            })
        })
        .collect()
}

fn draw_no_data(root: &DrawingArea<BitMapBackend, plotters::coord::Shift>) -> Result<()> {
    root.draw(&Text::new(
        "No entries to plot",
        (40, 40),
        ("sans-serif", 20).into_font().color(&BLACK),
    ))?;
    root.present()?;
    Ok(())
}

/// Log-log scaling plot: wall seconds per step against mobile atom count,
/// one marker class per run category, with a least-squares fit line and its
/// slope for categories covering at least three distinct atom counts.
pub fn render_time_vs_atoms(entries: &[TrackingEntry], path: &Path) -> Result<()> {
    // Log axes: only strictly positive samples can be placed.
    let points: Vec<PerfPoint> = perf_points(entries)
        .into_iter()
        .filter(|p| p.nsteps > 0 && p.atoms > 0.0 && p.seconds > 0.0)
        .collect();

    let root = BitMapBackend::new(path, (900, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    if points.is_empty() {
        return draw_no_data(&root);
    }

    let (mut x_lo, mut x_hi) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_lo, mut y_hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in &points {
        let per_step = p.seconds / p.nsteps as f64;
        x_lo = x_lo.min(p.atoms);
        x_hi = x_hi.max(p.atoms);
        y_lo = y_lo.min(per_step);
        y_hi = y_hi.max(per_step);
    }

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Computation Time per Timestep vs Number of Atoms",
            ("sans-serif", 20),
        )
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(
            (x_lo * 0.8..x_hi * 1.25).log_scale(),
            (y_lo * 0.8..y_hi * 1.25).log_scale(),
        )?;
    chart
        .configure_mesh()
        .x_desc("Number of Atoms")
        .y_desc("Computation Time per Timestep (s/step)")
        .draw()?;

    for class in RunClass::ALL {
        let class_points: Vec<(f64, f64)> = points
            .iter()
            .filter(|p| p.class == Some(class))
            .map(|p| (p.atoms, p.seconds / p.nsteps as f64))
            .collect();
        if class_points.is_empty() {
            continue;
        }
        let color = class.color();

        let anno = match class.kind {
            RunKind::SimOnly => chart.draw_series(
                class_points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
            )?,
            RunKind::Stress => chart.draw_series(
                class_points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, color.stroke_width(2))),
            )?,
            RunKind::Volume => chart.draw_series(
                class_points
                    .iter()
                    .map(|&(x, y)| TriangleMarker::new((x, y), 6, color.filled())),
            )?,
            RunKind::StressVolume => chart.draw_series(
                class_points
                    .iter()
                    .map(|&(x, y)| Cross::new((x, y), 5, color.stroke_width(2))),
            )?,
        };
        anno.label(class.label())
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));

        draw_fit_line(&mut chart, &class_points, color)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

type LogLogChart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<LogCoord<f64>, LogCoord<f64>>>;

fn draw_fit_line(chart: &mut LogLogChart, points: &[(f64, f64)], color: RGBColor) -> Result<()> {
    let distinct_atoms: BTreeSet<u64> = points.iter().map(|&(x, _)| x as u64).collect();
    if distinct_atoms.len() < 3 {
        return Ok(());
    }
    let xs: Vec<f64> = points.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
    let Some((slope, intercept)) = log_log_fit(&xs, &ys) else {
        return Ok(());
    };

    let lo = xs.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let hi = xs.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let line: Vec<(f64, f64)> = linspace(lo.log10(), hi.log10(), 100)
        .into_iter()
        .map(|lx| (10f64.powf(lx), 10f64.powf(slope * lx + intercept)))
        .collect();
    chart.draw_series(LineSeries::new(line, color.mix(0.5).stroke_width(2)))?;

    let mid_x = (lo * hi).sqrt();
    let mid_y = 10f64.powf(slope * mid_x.log10() + intercept);
    chart.draw_series(std::iter::once(Text::new(
        format!("{slope:.2}"),
        (mid_x, mid_y * 1.3),
        ("sans-serif", 14).into_font().color(&color),
    )))?;
    Ok(())
}

/// Wall minutes against step count, grouped by padding code (color) and bead
/// count (marker).
pub fn render_time_vs_timesteps(entries: &[TrackingEntry], path: &Path) -> Result<()> {
    let points = perf_points(entries);

    let root = BitMapBackend::new(path, (900, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    if points.is_empty() {
        return draw_no_data(&root);
    }

    let paddings: Vec<u32> = points
        .iter()
        .map(|p| p.padding)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let beads: Vec<u32> = points
        .iter()
        .map(|p| p.beads)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut groups: BTreeMap<(u32, u32), Vec<(f64, f64)>> = BTreeMap::new();
    for p in &points {
        groups
            .entry((p.padding, p.beads))
            .or_default()
            .push((p.nsteps as f64, p.seconds / 60.0));
    }

    let (mut x_hi, mut y_hi) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for values in groups.values() {
        for &(x, y) in values {
            x_hi = x_hi.max(x);
            y_hi = y_hi.max(y);
        }
    }

    let mut chart = ChartBuilder::on(&root)
        .caption("Computation Time vs Number of Timesteps", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_hi * 1.1 + 1.0, 0.0..y_hi * 1.1 + 1.0)?;
    chart
        .configure_mesh()
        .x_desc("Number of Timesteps")
        .y_desc("Computation Time (minutes)")
        .draw()?;

    for ((padding, bead_count), values) in &groups {
        let color_index = paddings.iter().position(|p| p == padding).unwrap_or(0);
        let marker_index = beads.iter().position(|b| b == bead_count).unwrap_or(0);
        let color = category_color(color_index);
        let anno = match marker_index % 3 {
            0 => chart.draw_series(
                values
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
            )?,
            1 => chart.draw_series(
                values
                    .iter()
                    .map(|&(x, y)| TriangleMarker::new((x, y), 6, color.filled())),
            )?,
            _ => chart.draw_series(
                values
                    .iter()
                    .map(|&(x, y)| Cross::new((x, y), 5, color.stroke_width(2))),
            )?,
        };
        anno.label(format!("{bead_count}beads, padding{padding}"))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
