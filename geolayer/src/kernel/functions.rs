//! Built-in kernel functions.
//!
//! The set mirrors the standard local terrain measures: window statistics
//! (`mean`, `min`, `max`, `range`, `roughness`), a least-squares plane
//! `slope`, and the two radius-0 lane operations `diff` (first source
//! minus second) and `threshold` (binary exclusion map).

use super::window::KernelWindow;
use super::KernelFunction;

fn fold_samples(window: &KernelWindow<'_>, init: f64, f: impl Fn(f64, f64) -> f64) -> f64 {
    window.samples().iter().copied().fold(init, f)
}

/// Window average.
pub struct Mean;

impl KernelFunction for Mean {
    fn name(&self) -> &str {
        "mean"
    }

    fn evaluate(&self, window: &KernelWindow<'_>) -> f64 {
        let n = window.samples().len() as f64;
        fold_samples(window, 0.0, |acc, v| acc + v) / n
    }
}

/// Window minimum.
pub struct Min;

impl KernelFunction for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn evaluate(&self, window: &KernelWindow<'_>) -> f64 {
        fold_samples(window, f64::INFINITY, f64::min)
    }
}

/// Window maximum.
pub struct Max;

impl KernelFunction for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn evaluate(&self, window: &KernelWindow<'_>) -> f64 {
        fold_samples(window, f64::NEG_INFINITY, f64::max)
    }
}

/// Window maximum minus window minimum.
pub struct Range;

impl KernelFunction for Range {
    fn name(&self) -> &str {
        "range"
    }

    fn evaluate(&self, window: &KernelWindow<'_>) -> f64 {
        let min = fold_samples(window, f64::INFINITY, f64::min);
        let max = fold_samples(window, f64::NEG_INFINITY, f64::max);
        max - min
    }
}

/// Standard deviation of the window samples.
pub struct Roughness;

impl KernelFunction for Roughness {
    fn name(&self) -> &str {
        "roughness"
    }

    fn evaluate(&self, window: &KernelWindow<'_>) -> f64 {
        let samples = window.samples();
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let sq_sum = samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
        (sq_sum / n).sqrt()
    }
}

/// Slope in degrees of the least-squares plane fitted to the window.
///
/// The fit uses the grid's pixel size so the gradient is in world units.
/// The centered, symmetric stencil decouples the two axes, so the
/// gradient reduces to closed form.
pub struct Slope;

impl KernelFunction for Slope {
    fn name(&self) -> &str {
        "slope"
    }

    fn evaluate(&self, window: &KernelWindow<'_>) -> f64 {
        let side = window.side();
        let radius = (side / 2) as isize;
        let (px, py) = window.pixel_size();
        let samples = window.samples();

        let mut sum_xz = 0.0;
        let mut sum_yz = 0.0;
        let mut sum_xx = 0.0;
        let mut sum_yy = 0.0;
        for wr in 0..side {
            for wc in 0..side {
                let z = samples[wr * side + wc];
                let x = (wc as isize - radius) as f64 * px;
                let y = (wr as isize - radius) as f64 * py;
                sum_xz += x * z;
                sum_yz += y * z;
                sum_xx += x * x;
                sum_yy += y * y;
            }
        }
        // Radius 0 has no spatial extent; the fitted plane is flat.
        let gx = if sum_xx > 0.0 { sum_xz / sum_xx } else { 0.0 };
        let gy = if sum_yy > 0.0 { sum_yz / sum_yy } else { 0.0 };
        (gx * gx + gy * gy).sqrt().atan().to_degrees()
    }
}

/// Center of the first source plane minus center of the second.
pub struct Diff;

impl KernelFunction for Diff {
    fn name(&self) -> &str {
        "diff"
    }

    fn min_sources(&self) -> usize {
        2
    }

    fn evaluate(&self, window: &KernelWindow<'_>) -> f64 {
        window.center(0) - window.center(1)
    }
}

/// Binary exclusion map: 1.0 where the center sample exceeds the
/// threshold, 0.0 elsewhere.
pub struct Threshold {
    pub threshold: f64,
}

impl KernelFunction for Threshold {
    fn name(&self) -> &str {
        "threshold"
    }

    fn evaluate(&self, window: &KernelWindow<'_>) -> f64 {
        if window.center(0) > self.threshold {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_3x3(values: [f64; 9]) -> Vec<Vec<f64>> {
        vec![values.to_vec()]
    }

    #[test]
    fn test_mean() {
        let planes = window_3x3([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let window = KernelWindow::new(&planes, 3, (1.0, 1.0));
        assert_eq!(Mean.evaluate(&window), 5.0);
    }

    #[test]
    fn test_min_max_range() {
        let planes = window_3x3([4.0, 2.0, 9.0, 1.0, 5.0, 6.0, 7.0, 8.0, 3.0]);
        let window = KernelWindow::new(&planes, 3, (1.0, 1.0));
        assert_eq!(Min.evaluate(&window), 1.0);
        assert_eq!(Max.evaluate(&window), 9.0);
        assert_eq!(Range.evaluate(&window), 8.0);
    }

    #[test]
    fn test_range_of_flat_window_is_zero() {
        let planes = window_3x3([1.0; 9]);
        let window = KernelWindow::new(&planes, 3, (1.0, 1.0));
        assert_eq!(Range.evaluate(&window), 0.0);
    }

    #[test]
    fn test_roughness_of_flat_window_is_zero() {
        let planes = window_3x3([3.5; 9]);
        let window = KernelWindow::new(&planes, 3, (1.0, 1.0));
        assert_eq!(Roughness.evaluate(&window), 0.0);
    }

    #[test]
    fn test_roughness_known_value() {
        let planes = vec![vec![1.0, 3.0, 1.0, 3.0, 1.0, 3.0, 1.0, 3.0, 1.0]];
        let window = KernelWindow::new(&planes, 3, (1.0, 1.0));
        // mean = 17/9; population stdev of {1x5, 3x4}
        let mean: f64 = 17.0 / 9.0;
        let expected =
            ((5.0 * (1.0 - mean).powi(2) + 4.0 * (3.0 - mean).powi(2)) / 9.0_f64).sqrt();
        assert!((Roughness.evaluate(&window) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_slope_of_inclined_plane() {
        // z = 2x with unit pixels: columns at x = -1, 0, 1.
        let planes = window_3x3([-2.0, 0.0, 2.0, -2.0, 0.0, 2.0, -2.0, 0.0, 2.0]);
        let window = KernelWindow::new(&planes, 3, (1.0, 1.0));
        let expected = 2.0_f64.atan().to_degrees();
        assert!((Slope.evaluate(&window) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_slope_of_flat_plane_is_zero() {
        let planes = window_3x3([5.0; 9]);
        let window = KernelWindow::new(&planes, 3, (2.0, 2.0));
        assert_eq!(Slope.evaluate(&window), 0.0);
    }

    #[test]
    fn test_slope_respects_pixel_size() {
        // Same samples, wider pixels: the surface is flatter.
        let samples = [-2.0, 0.0, 2.0, -2.0, 0.0, 2.0, -2.0, 0.0, 2.0];
        let narrow = window_3x3(samples);
        let wide = window_3x3(samples);
        let narrow_w = KernelWindow::new(&narrow, 3, (1.0, 1.0));
        let wide_w = KernelWindow::new(&wide, 3, (4.0, 4.0));
        assert!(Slope.evaluate(&narrow_w) > Slope.evaluate(&wide_w));
    }

    #[test]
    fn test_diff_uses_two_planes() {
        let planes = vec![vec![10.0], vec![4.0]];
        let window = KernelWindow::new(&planes, 1, (1.0, 1.0));
        assert_eq!(Diff.evaluate(&window), 6.0);
        assert_eq!(Diff.min_sources(), 2);
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let planes = vec![vec![5.0]];
        let window = KernelWindow::new(&planes, 1, (1.0, 1.0));
        assert_eq!(Threshold { threshold: 4.9 }.evaluate(&window), 1.0);
        assert_eq!(Threshold { threshold: 5.0 }.evaluate(&window), 0.0);
        assert_eq!(Threshold { threshold: 5.1 }.evaluate(&window), 0.0);
    }
}
