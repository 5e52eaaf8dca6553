use crate::core::io::series::{ScalarSeries, SteppedSeries};
use crate::core::models::thermo::ThermoTable;
use crate::core::utils::stats::{normalize_by_first, tail_stats};
use crate::render::style::ORANGE;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::Path;

const PANEL_WIDTH: u32 = 1000;
const PANEL_HEIGHT: u32 = 300;

/// Inputs for the convergence figure. The optional series add panels only
/// when their files existed on disk.
#[derive(Debug, Clone, Default)]
pub struct ConvergenceData {
    pub table: ThermoTable,
    pub box_volume: Option<SteppedSeries>,
    pub gel_bounding_box: Option<ScalarSeries>,
    pub gel_gyration: Option<SteppedSeries>,
}

struct Panel {
    label: &'static str,
    color: RGBColor,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl ConvergenceData {
    fn panels(&self) -> Vec<Panel> {
        let mut panels = Vec::new();

        let steps = self.table.column("Step");
        for (name, label, color) in [
            ("Temp", "Temperature", BLUE),
            ("Press", "Pressure", GREEN),
        ] {
            if let (Some(steps), Some(values)) = (steps, self.table.column(name)) {
                panels.push(Panel {
                    label,
                    color,
                    xs: steps.to_vec(),
                    ys: values.to_vec(),
                });
            }
        }

        if let Some(series) = &self.box_volume {
            if !series.values.is_empty() {
                panels.push(Panel {
                    label: "Box Volume / Initial",
                    color: MAGENTA,
                    xs: series.steps.clone(),
                    ys: normalize_by_first(&series.values),
                });
            }
        }
        if let Some(series) = &self.gel_bounding_box {
            if !series.values.is_empty() {
                panels.push(Panel {
                    label: "Gel Volume (BB) / Initial",
                    color: ORANGE,
                    xs: (0..series.values.len()).map(|i| i as f64).collect(),
                    ys: normalize_by_first(&series.values),
                });
            }
        }
        if let Some(series) = &self.gel_gyration {
            if !series.values.is_empty() {
                panels.push(Panel {
                    label: "Gel Volume (Rg) / Initial",
                    color: CYAN,
                    xs: series.steps.clone(),
                    ys: normalize_by_first(&series.values),
                });
            }
        }

        panels
    }
}

/// Renders the stacked convergence figure: one panel per available series,
/// each annotated with its trailing-window mean when the series is long
/// enough to carry one.
pub fn render_convergence(data: &ConvergenceData, title: &str, path: &Path) -> Result<()> {
    let panels = data.panels();
    if panels.is_empty() {
        anyhow::bail!("no convergence series to plot");
    }

    let height = PANEL_HEIGHT * panels.len() as u32 + 40;
    let root = BitMapBackend::new(path, (PANEL_WIDTH, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 24))?;
    let areas = inner.split_evenly((panels.len(), 1));

    for (panel, area) in panels.iter().zip(&areas) {
        draw_panel(panel, area)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(panel: &Panel, area: &DrawingArea<BitMapBackend, Shift>) -> Result<()> {
    let (x_min, x_max) = padded(bounds(&panel.xs));
    let (y_min, y_max) = padded(bounds(&panel.ys));

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Step")
        .y_desc(panel.label)
        .draw()?;

    chart.draw_series(LineSeries::new(
        panel.xs.iter().zip(&panel.ys).map(|(&x, &y)| (x, y)),
        panel.color.stroke_width(2),
    ))?;

    if let Some(stats) = tail_stats(&panel.ys) {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(x_min, stats.mean), (x_max, stats.mean)],
                8,
                5,
                RED.stroke_width(1),
            ))?
            .label(format!(
                "Last 30%: {:.3} +/- {:.3}",
                stats.mean, stats.stdev
            ))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if lo > hi {
        // No samples survived; give the chart a drawable range anyway.
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let margin = (hi - lo) * 0.05;
    (lo - margin, hi + margin)
}
