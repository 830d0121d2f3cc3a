use std::fmt::Display;

/// Smallest accepted window half-width.
pub const MIN_HALF_WIDTH: usize = 1;
/// Largest half-width the peak panel slider offers.
pub const MAX_HALF_WIDTH: usize = 125;
/// Half-width the peak panel starts with.
pub const DEFAULT_HALF_WIDTH: usize = 63;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PeakError {
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("window half-width must be at least {MIN_HALF_WIDTH}")]
    InvalidWindow,
}

/// Row indices of strict local extrema, highest index first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extrema {
    pub maxima: Vec<usize>,
    pub minima: Vec<usize>,
}

/// X values at the detected extrema, right to left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakReport {
    pub maxima_x: Vec<String>,
    pub minima_x: Vec<String>,
    pub extrema: Extrema,
}

/// Find indices whose value is strictly greater (or smaller) than every other
/// value within `half_width` positions on both sides.
///
/// The first and last `half_width` indices are never eligible. Plateaus and
/// NaN never qualify, and a NaN inside a window disqualifies its centre.
pub fn find_extrema(y: &[f64], half_width: usize) -> Result<Extrema, PeakError> {
    if half_width < MIN_HALF_WIDTH {
        return Err(PeakError::InvalidWindow);
    }

    let mut extrema = Extrema::default();
    if y.len() < 2 * half_width + 1 {
        return Ok(extrema);
    }

    for i in (half_width..y.len() - half_width).rev() {
        let window = &y[i - half_width..=i + half_width];
        let centre = y[i];
        let neighbours = || {
            window
                .iter()
                .enumerate()
                .filter(move |&(k, _)| k != half_width)
                .map(|(_, &v)| v)
        };

        if neighbours().all(|v| centre > v) {
            extrema.maxima.push(i);
        } else if neighbours().all(|v| centre < v) {
            extrema.minima.push(i);
        }
    }

    Ok(extrema)
}

/// Detect extrema of `y` and report the matching `x` values as text.
pub fn pick_peaks<X: Display>(x: &[X], y: &[f64], half_width: usize) -> Result<PeakReport, PeakError> {
    if x.len() != y.len() {
        return Err(PeakError::LengthMismatch { x: x.len(), y: y.len() });
    }

    let extrema = find_extrema(y, half_width)?;
    let label = |indices: &[usize]| indices.iter().map(|&i| x[i].to_string()).collect();
    let report = PeakReport {
        maxima_x: label(&extrema.maxima),
        minima_x: label(&extrema.minima),
        extrema,
    };

    tracing::debug!(
        "Peak picking (half-width {half_width}): {} maxima, {} minima over {} points",
        report.maxima_x.len(),
        report.minima_x.len(),
        y.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn reports_alternating_extrema_right_to_left() {
        let y = [1.0, 3.0, 1.0, 5.0, 1.0, 3.0, 1.0];
        let report = pick_peaks(&xs(7), &y, 1).unwrap();
        assert_eq!(report.extrema.maxima, vec![5, 3, 1]);
        assert_eq!(report.maxima_x, vec!["5", "3", "1"]);
        assert_eq!(report.minima_x, vec!["4", "2"]);
    }

    #[test]
    fn wider_window_suppresses_smaller_peaks() {
        let y = [1.0, 3.0, 1.0, 5.0, 1.0, 3.0, 1.0];
        let report = pick_peaks(&xs(7), &y, 2).unwrap();
        assert_eq!(report.maxima_x, vec!["3"]);
        assert!(report.minima_x.is_empty());
    }

    #[test]
    fn edges_are_never_eligible() {
        let y = [10.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let extrema = find_extrema(&y, 2).unwrap();
        assert!(!extrema.maxima.contains(&0));
        assert!(extrema.maxima.is_empty());
    }

    #[test]
    fn plateaus_are_not_extrema() {
        let y = [0.0, 2.0, 2.0, 0.0, 0.0, 1.0, 1.0];
        let extrema = find_extrema(&y, 1).unwrap();
        assert!(extrema.maxima.is_empty());
        assert!(extrema.minima.is_empty());
    }

    #[test]
    fn short_series_yields_nothing() {
        for w in 1..6 {
            for len in 0..2 * w + 1 {
                let y: Vec<f64> = (0..len).map(|i| ((i * 7) % 5) as f64).collect();
                assert_eq!(find_extrema(&y, w).unwrap(), Extrema::default(), "w={w} len={len}");
            }
        }
    }

    #[test]
    fn maxima_and_minima_are_disjoint_and_descending() {
        let y: Vec<f64> = (0..200).map(|i| ((i as f64) * 0.37).sin() + ((i * 13) % 7) as f64 * 0.1).collect();
        for w in 1..5 {
            let extrema = find_extrema(&y, w).unwrap();
            assert!(extrema.maxima.iter().all(|i| !extrema.minima.contains(i)));
            assert!(extrema.maxima.windows(2).all(|p| p[0] > p[1]));
            assert!(extrema.minima.windows(2).all(|p| p[0] > p[1]));
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let y = [0.3, 1.2, 0.1, 0.9, 0.4, 2.0, 0.0, 0.5];
        let x = xs(y.len());
        assert_eq!(pick_peaks(&x, &y, 1).unwrap(), pick_peaks(&x, &y, 1).unwrap());
    }

    #[test]
    fn nan_blocks_its_window() {
        let y = [0.0, 5.0, f64::NAN, 5.0, 0.0];
        let extrema = find_extrema(&y, 1).unwrap();
        assert!(extrema.maxima.is_empty());
    }

    #[test]
    fn x_values_keep_their_text() {
        let x = ["a", "b", "c"];
        let report = pick_peaks(&x, &[0.0, 1.0, 0.0], 1).unwrap();
        assert_eq!(report.maxima_x, vec!["b"]);
        let x = [0.5, 1.25, 2.0];
        let report = pick_peaks(&x, &[1.0, 0.0, 1.0], 1).unwrap();
        assert_eq!(report.minima_x, vec!["1.25"]);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert_eq!(
            pick_peaks(&xs(3), &[1.0, 2.0], 1),
            Err(PeakError::LengthMismatch { x: 3, y: 2 })
        );
    }

    #[test]
    fn rejects_zero_window() {
        assert_eq!(find_extrema(&[1.0, 2.0, 1.0], 0), Err(PeakError::InvalidWindow));
        assert_eq!(pick_peaks(&xs(3), &[1.0, 2.0, 1.0], 0), Err(PeakError::InvalidWindow));
    }
}
