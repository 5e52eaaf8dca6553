use std::cmp::Ordering;

/// Fraction of a series used for the trailing convergence window.
pub const TAIL_FRACTION: f64 = 0.3;

/// Windows at or below this size carry too little signal to annotate.
const MIN_TAIL_WINDOW: usize = 10;

/// Mean and population standard deviation over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailStats {
    pub mean: f64,
    pub stdev: f64,
    pub window: usize,
}

/// Statistics over the last [`TAIL_FRACTION`] of `values`, or `None` when
/// the window holds no more than `MIN_TAIL_WINDOW` samples.
pub fn tail_stats(values: &[f64]) -> Option<TailStats> {
    let window = (values.len() as f64 * TAIL_FRACTION) as usize;
    if window <= MIN_TAIL_WINDOW {
        return None;
    }
    let tail = &values[values.len() - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;
    let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window as f64;
    Some(TailStats {
        mean,
        stdev: variance.sqrt(),
        window,
    })
}

/// Divides every sample by the first one. The caller guarantees a nonzero
/// first sample; empty input yields empty output.
pub fn normalize_by_first(values: &[f64]) -> Vec<f64> {
    match values.first() {
        Some(&first) => values.iter().map(|v| v / first).collect(),
        None => Vec::new(),
    }
}

/// `n` evenly spaced samples from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Linear interpolation of `(xs, ys)` onto `grid`, with 0.0 outside the
/// source range. `xs` must be ascending and paired with `ys`.
pub fn interp_onto(grid: &[f64], xs: &[f64], ys: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let (Some(&first), Some(&last)) = (xs.first(), xs.last()) else {
        return vec![0.0; grid.len()];
    };
    grid.iter()
        .map(|&g| {
            if g < first || g > last {
                return 0.0;
            }
            let search =
                xs.binary_search_by(|x| x.partial_cmp(&g).unwrap_or(Ordering::Equal));
            match search {
                Ok(i) => ys[i],
                Err(i) => {
                    let (x0, x1) = (xs[i - 1], xs[i]);
                    let (y0, y1) = (ys[i - 1], ys[i]);
                    if x1 == x0 {
                        y0
                    } else {
                        y0 + (y1 - y0) * (g - x0) / (x1 - x0)
                    }
                }
            }
        })
        .collect()
}

/// Least-squares `(slope, intercept)` of log10(y) on log10(x).
///
/// Requires paired positive samples; `None` on degenerate input (fewer than
/// two points, non-positive values, or no spread in x).
pub fn log_log_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if xs.iter().chain(ys).any(|&v| v <= 0.0) {
        return None;
    }
    let n = xs.len() as f64;
    let lx: Vec<f64> = xs.iter().map(|x| x.log10()).collect();
    let ly: Vec<f64> = ys.iter().map(|y| y.log10()).collect();
    let mean_x = lx.iter().sum::<f64>() / n;
    let mean_y = ly.iter().sum::<f64>() / n;
    let sxx: f64 = lx.iter().map(|x| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = lx
        .iter()
        .zip(&ly)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}
