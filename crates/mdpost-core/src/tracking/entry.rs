use crate::core::models::structure::BoxDims;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// Wall-clock cost of a run; `Unknown` when the log carried no loop time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallTime {
    Seconds(f64),
    Unknown,
}

impl WallTime {
    pub fn from_seconds(seconds: Option<f64>) -> Self {
        match seconds {
            Some(s) => WallTime::Seconds(s),
            None => WallTime::Unknown,
        }
    }

    /// Accepts `M:SS`, `H:MM:SS`, bare seconds, or the `N/A` sentinel.
    pub fn parse(field: &str) -> Option<Self> {
        if field == "N/A" {
            return Some(WallTime::Unknown);
        }
        if field.contains(':') {
            let parts: Vec<&str> = field.split(':').collect();
            let seconds = match parts.as_slice() {
                [m, s] => m.parse::<u64>().ok()? * 60 + s.parse::<u64>().ok()?,
                [h, m, s] => {
                    h.parse::<u64>().ok()? * 3600
                        + m.parse::<u64>().ok()? * 60
                        + s.parse::<u64>().ok()?
                }
                _ => return None,
            };
            Some(WallTime::Seconds(seconds as f64))
        } else {
            field.parse::<f64>().ok().map(WallTime::Seconds)
        }
    }

    pub fn seconds(self) -> Option<f64> {
        match self {
            WallTime::Seconds(s) => Some(s),
            WallTime::Unknown => None,
        }
    }

    /// Sort key: unknown runs order after every measured one.
    fn sort_seconds(self) -> f64 {
        match self {
            WallTime::Seconds(s) => s,
            WallTime::Unknown => f64::INFINITY,
        }
    }

    pub fn cmp_by_seconds(&self, other: &Self) -> Ordering {
        self.sort_seconds()
            .partial_cmp(&other.sort_seconds())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for WallTime {
    /// Minutes-and-seconds, with minutes unbounded (2h renders as `120:00`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WallTime::Seconds(s) => {
                let total = *s as u64;
                write!(f, "{}:{:02}", total / 60, total % 60)
            }
            WallTime::Unknown => write!(f, "N/A"),
        }
    }
}

/// One run in the tracking report, unique by name.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingEntry {
    pub name: String,
    pub box_dims: BoxDims,
    pub atoms: u64,
    pub wall_time: WallTime,
}

impl TrackingEntry {
    /// Fixed-width ledger line: name(70) box x/y/z(10, 2 decimals)
    /// atoms(10) time(15), all left-justified.
    pub fn to_line(&self) -> String {
        format!(
            "{:<70} {:<10.2} {:<10.2} {:<10.2} {:<10} {:<15}",
            self.name,
            self.box_dims.x,
            self.box_dims.y,
            self.box_dims.z,
            self.atoms,
            self.wall_time.to_string(),
        )
    }

    /// Whitespace-tokenized parse of a ledger line; the last token is the
    /// wall-time field. `None` for records that do not fit the schema.
    pub fn parse_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            return None;
        }
        let wall_time = WallTime::parse(parts[parts.len() - 1])?;
        Some(Self {
            name: parts[0].to_owned(),
            box_dims: BoxDims {
                x: parts[1].parse().ok()?,
                y: parts[2].parse().ok()?,
                z: parts[3].parse().ok()?,
            },
            atoms: parts[4].parse().ok()?,
            wall_time,
        })
    }
}

/// Run descriptors recovered from the conventional simulation name, e.g.
/// `slab_support_5beads_10x10x5_rho6_extra_padding431_1.5_1.4_40000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTags {
    pub beads: u32,
    /// Encodes the run category; see the performance renderer.
    pub padding: u32,
    pub nsteps: u64,
}

impl SimTags {
    pub fn from_name(name: &str) -> Self {
        static BEADS: OnceLock<Regex> = OnceLock::new();
        static PADDING: OnceLock<Regex> = OnceLock::new();
        static NSTEPS: OnceLock<Regex> = OnceLock::new();
        let beads_re = BEADS.get_or_init(|| Regex::new(r"(\d+)beads").expect("static regex"));
        let padding_re =
            PADDING.get_or_init(|| Regex::new(r"extra_padding(\d+)").expect("static regex"));
        let nsteps_re = NSTEPS.get_or_init(|| Regex::new(r"_(\d+)$").expect("static regex"));

        Self {
            beads: capture(beads_re, name).unwrap_or(0),
            padding: capture(padding_re, name).unwrap_or(1),
            nsteps: capture(nsteps_re, name).unwrap_or(0),
        }
    }
}

fn capture<T: std::str::FromStr>(re: &Regex, name: &str) -> Option<T> {
    re.captures(name)?.get(1)?.as_str().parse().ok()
}
