/// One `ave/time` record: a timestep together with the spatial-bin values
/// that survived parsing.
///
/// Indices are dense `1..=k` over the *accepted* rows, not the original row
/// positions; the downstream coordinate normalization (`index * bin_width`)
/// is defined over this renumbering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileBlock {
    pub timestep: u64,
    pub indices: Vec<u32>,
    pub values: Vec<f64>,
}

impl ProfileBlock {
    pub(crate) fn from_values(timestep: u64, values: Vec<f64>) -> Self {
        let indices = (1..=values.len() as u32).collect();
        Self {
            timestep,
            indices,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
