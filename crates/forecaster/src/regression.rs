//! Ordinary least squares on a single regressor.

use serde::Serialize;

/// A fitted line `y = slope * x + intercept` with its in-sample quality metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination on the training points.
    pub r_squared: f64,
    pub mean_absolute_error: f64,
}

impl LinearFit {
    /// Fits the points in the order given.
    ///
    /// Returns `None` for fewer than two points or when every `x` is identical, as the slope is
    /// undefined in both cases.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|&(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / n;

        // Centered sums keep precision with x values around 2000.
        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let (ss_res, ss_tot, abs_err) =
            points
                .iter()
                .fold((0.0, 0.0, 0.0), |(ss_res, ss_tot, abs_err), &(x, y)| {
                    let residual = y - (slope * x + intercept);
                    (
                        ss_res + residual * residual,
                        ss_tot + (y - mean_y).powi(2),
                        abs_err + residual.abs(),
                    )
                });

        Some(Self {
            slope,
            intercept,
            r_squared: r_squared(ss_res, ss_tot),
            mean_absolute_error: abs_err / n,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// `1 - ss_res / ss_tot`. A constant target scores 1.0 when fitted exactly and 0.0 otherwise.
fn r_squared(ss_res: f64, ss_tot: f64) -> f64 {
    if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn collinear_points_fit_exactly() {
        let fit = LinearFit::fit(&[(2000.0, 100.0), (2001.0, 110.0), (2002.0, 120.0)]).unwrap();

        assert_close(fit.slope, 10.0, 1e-9);
        assert_close(fit.intercept, -19_900.0, 1e-6);
        assert_close(fit.r_squared, 1.0, 1e-12);
        assert_close(fit.mean_absolute_error, 0.0, 1e-9);
        assert_close(fit.predict(2003.0), 130.0, 1e-6);
    }

    #[test]
    fn noisy_points() {
        // y = 2x + 1 with residuals +1, -1, -1, +1
        let fit = LinearFit::fit(&[(0.0, 2.0), (1.0, 2.0), (2.0, 4.0), (3.0, 8.0)]).unwrap();

        assert_close(fit.slope, 2.0, 1e-12);
        assert_close(fit.intercept, 1.0, 1e-12);
        // ss_tot = 24, ss_res = 4
        assert_close(fit.r_squared, 1.0 - 4.0 / 24.0, 1e-12);
        assert_close(fit.mean_absolute_error, 1.0, 1e-12);
    }

    #[test]
    fn constant_target() {
        let fit = LinearFit::fit(&[(1.0, 5.0), (2.0, 5.0), (3.0, 5.0)]).unwrap();

        assert_close(fit.slope, 0.0, 1e-12);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(LinearFit::fit(&[]).is_none());
        assert!(LinearFit::fit(&[(1.0, 1.0)]).is_none());
        assert!(LinearFit::fit(&[(1.0, 1.0), (1.0, 3.0)]).is_none());
    }
}
