use super::min_max;

/// Fixed-width intensity histogram over `[lo, hi]`.
#[derive(Clone, Debug)]
pub struct Histogram {
    counts: Vec<u64>,
    lo: f32,
    hi: f32,
}

impl Histogram {
    /// Histogram with bounds taken from the data's min and max.
    pub fn from_values(values: &[f32], num_bins: usize) -> Self {
        let (lo, hi) = min_max(values).unwrap_or((0.0, 0.0));
        Self::with_bounds(values, num_bins, lo, hi)
    }

    /// Histogram over explicit bounds. Samples outside are clamped into the
    /// first or last bin.
    pub fn with_bounds(values: &[f32], num_bins: usize, lo: f32, hi: f32) -> Self {
        let mut hist = Self {
            counts: vec![0; num_bins.max(1)],
            lo,
            hi,
        };
        for &v in values {
            let bin = hist.bin_index(v);
            hist.counts[bin] += 1;
        }
        hist
    }

    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.lo, self.hi)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn count(&self, bin: usize) -> u64 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bin of `value`. A zero-width range maps everything to bin 0.
    pub fn bin_index(&self, value: f32) -> usize {
        let bins = self.counts.len();
        let range = self.hi - self.lo;
        if !(range > 0.0) {
            return 0;
        }
        let pos = ((value - self.lo) / range * bins as f32).floor();
        (pos.max(0.0) as usize).min(bins - 1)
    }

    /// First and last non-empty bins.
    pub fn occupied_range(&self) -> Option<(usize, usize)> {
        let first = self.counts.iter().position(|&c| c > 0)?;
        let last = self.counts.iter().rposition(|&c| c > 0)?;
        Some((first, last))
    }
}
