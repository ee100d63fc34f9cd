/// Linear `[0, max] -> [0, extent]` mapping used for the vertical axis.
///
/// A non-positive or non-finite `max` maps every value to zero instead of
/// producing NaN or infinity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    max: f64,
    extent: f64,
}

impl ValueScale {
    pub fn new(max: f64, extent: f64) -> Self {
        Self { max, extent }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.max.is_finite() && self.max > 0.0)
    }

    pub fn map(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let res = self.extent * value / self.max;
        if res.is_nan() || res.is_infinite() {
            0.0
        } else {
            res
        }
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        if self.is_degenerate() || self.extent == 0.0 {
            return 0.0;
        }
        pixel * self.max / self.extent
    }

    pub fn map_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| self.map(*v)).collect()
    }
}

/// Evenly spaced pixel positions `k * extent / count` for `count` indices.
pub fn index_positions(count: usize, extent: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let density = extent / count as f64;
    (0..count).map(|k| k as f64 * density).collect()
}

/// Vertical scale factor and translation for a window whose visible maximum
/// is `window_max`, relative to the dataset-wide `y_max`.
///
/// Returns `(1.0, 0.0)` when either maximum is degenerate.
pub fn vertical_fit(y_max: f64, window_max: f64, height: f64) -> (f64, f64) {
    if !(window_max.is_finite() && window_max > 0.0 && y_max.is_finite() && y_max > 0.0) {
        return (1.0, 0.0);
    }
    let scale_y = y_max / window_max;
    let dy = height / scale_y - height;
    (scale_y, dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_maps_to_zero() {
        let scale = ValueScale::new(0.0, 100.0);
        assert_eq!(scale.map(10.0), 0.0);
        assert_eq!(scale.invert(50.0), 0.0);
    }

    #[test]
    fn test_map_and_invert() {
        let scale = ValueScale::new(80.0, 400.0);
        assert_eq!(scale.map(40.0), 200.0);
        assert!((scale.invert(200.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_fit() {
        let (scale_y, dy) = vertical_fit(80.0, 40.0, 400.0);
        assert_eq!(scale_y, 2.0);
        assert_eq!(dy, -200.0);
        assert_eq!(vertical_fit(80.0, 0.0, 400.0), (1.0, 0.0));
    }

    #[test]
    fn test_index_positions() {
        assert_eq!(index_positions(4, 100.0), vec![0.0, 25.0, 50.0, 75.0]);
        assert!(index_positions(0, 100.0).is_empty());
    }
}
