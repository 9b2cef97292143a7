//! Shared kernels for piecewise-linear fields.

/// Linear interpolation through `(x0, y0)` and `(x1, y1)`, evaluated at `x`.
///
/// Written as a convex blend so the result is bit-exact at either end.
/// A zero-length interval yields the mean of the two end values.
#[inline]
pub fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let dx = x1 - x0;
    if dx == 0.0 {
        return 0.5 * (y0 + y1);
    }
    let t = (x - x0) / dx;
    (1.0 - t) * y0 + t * y1
}

/// Scalar values indexed by node id.
///
/// Ids never defined read back as 0.0. The running range covers only
/// defined values and is NaN until the first definition.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeValues {
    values: Vec<f64>,
    vmin: f64,
    vmax: f64,
}

impl Default for NodeValues {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            vmin: f64::NAN,
            vmax: f64::NAN,
        }
    }
}

impl NodeValues {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            values: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    /// Store `value` for node `id`, growing the table as needed.
    pub fn define(&mut self, id: usize, value: f64) {
        if self.values.len() <= id {
            self.values.resize(id + 1, 0.0);
        }
        self.values[id] = value;

        if self.vmin.is_nan() || self.vmax.is_nan() {
            self.vmin = value;
            self.vmax = value;
        } else {
            self.vmin = self.vmin.min(value);
            self.vmax = self.vmax.max(value);
        }
    }

    /// Value at node `id`; 0.0 for negative or never-defined ids.
    #[inline]
    pub fn get(&self, id: i32) -> f64 {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.vmin
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.vmax
    }

    /// Rebuild with a range carried over from elsewhere, as read back from a
    /// stream. Padding entries in `values` do not widen it.
    pub(crate) fn from_parts(values: Vec<f64>, vmin: f64, vmax: f64) -> Self {
        Self { values, vmin, vmax }
    }

    /// Rebuild from a raw table, recomputing the range.
    pub fn from_vec(values: Vec<f64>) -> Self {
        let mut out = Self::with_capacity(values.len());
        for (id, v) in values.into_iter().enumerate() {
            out.define(id, v);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_is_exact_at_ends_and_averages_degenerate() {
        let (x0, y0, x1, y1) = (0.1, 0.7, 0.3, 1.9);
        assert_eq!(lerp(x0, y0, x1, y1, x0), y0);
        assert_eq!(lerp(x0, y0, x1, y1, x1), y1);
        assert_eq!(lerp(2.0, 1.0, 2.0, 3.0, 2.0), 2.0);
        assert!((lerp(0.0, 0.0, 2.0, 4.0, 0.5) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn undefined_ids_read_zero() {
        let mut v = NodeValues::default();
        assert!(v.min().is_nan());
        v.define(3, -2.0);
        v.define(1, 5.0);
        assert_eq!(v.len(), 4);
        assert_eq!(v.get(0), 0.0);
        assert_eq!(v.get(-1), 0.0);
        assert_eq!(v.get(99), 0.0);
        assert_eq!((v.min(), v.max()), (-2.0, 5.0));
    }
}
