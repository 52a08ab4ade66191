//! DPMO to Six Sigma level conversion
//!
//! The pipeline health report grades defect rates (late tasks, dead deals)
//! on the familiar sigma scale. Conversion uses the standard short-term
//! sigma table with linear interpolation between rows.

/// `(dpmo, sigma)` anchor points, DPMO ascending
const SIGMA_TABLE: [(f64, f64); 6] = [
    (3.4, 6.0),
    (233.0, 5.0),
    (6_210.0, 4.0),
    (66_807.0, 3.0),
    (308_537.0, 2.0),
    (690_000.0, 1.0),
];

/// Every opportunity defective
const DPMO_CEILING: f64 = 1_000_000.0;

/// Convert defects-per-million-opportunities to a sigma level
///
/// Total over all inputs: non-positive DPMO reads as perfect (6.0), a full
/// million or more as 0.0. Between table rows the level is interpolated
/// linearly; past the last row it tapers linearly from 1.0 to 0.0 at one
/// million, keeping the scale continuous and monotone.
pub fn sigma_level(dpmo: f64) -> f64 {
    if dpmo <= 0.0 {
        return 6.0;
    }
    if dpmo >= DPMO_CEILING {
        return 0.0;
    }
    let (first_dpmo, first_sigma) = SIGMA_TABLE[0];
    if dpmo <= first_dpmo {
        return first_sigma;
    }
    for pair in SIGMA_TABLE.windows(2) {
        let (lo_dpmo, lo_sigma) = pair[0];
        let (hi_dpmo, hi_sigma) = pair[1];
        if dpmo <= hi_dpmo {
            let ratio = (dpmo - lo_dpmo) / (hi_dpmo - lo_dpmo);
            return lo_sigma - ratio * (lo_sigma - hi_sigma);
        }
    }
    // Between the last row and one million
    let (last_dpmo, last_sigma) = SIGMA_TABLE[SIGMA_TABLE.len() - 1];
    let ratio = (dpmo - last_dpmo) / (DPMO_CEILING - last_dpmo);
    last_sigma - ratio * last_sigma
}

/// DPMO implied by a failure rate expressed as a 0-100 percentage
pub fn dpmo_from_failure_pct(failure_pct: f64) -> f64 {
    failure_pct * 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_exact_table_rows() {
        assert_close(sigma_level(3.4), 6.0);
        assert_close(sigma_level(233.0), 5.0);
        assert_close(sigma_level(6_210.0), 4.0);
        assert_close(sigma_level(66_807.0), 3.0);
        assert_close(sigma_level(308_537.0), 2.0);
        assert_close(sigma_level(690_000.0), 1.0);
    }

    #[test]
    fn test_boundaries() {
        assert_close(sigma_level(0.0), 6.0);
        assert_close(sigma_level(-50.0), 6.0);
        assert_close(sigma_level(1_000_000.0), 0.0);
        assert_close(sigma_level(2_000_000.0), 0.0);
    }

    #[test]
    fn test_below_first_row_clamps_to_six() {
        assert_close(sigma_level(1.0), 6.0);
        assert_close(sigma_level(3.3), 6.0);
    }

    #[test]
    fn test_interpolation_within_brackets() {
        // Midpoint of the 233 -> 6,210 bracket
        let mid = (233.0 + 6_210.0) / 2.0;
        assert_close(sigma_level(mid), 4.5);

        // A quarter into the 6,210 -> 66,807 bracket
        let quarter = 6_210.0 + (66_807.0 - 6_210.0) * 0.25;
        assert_close(sigma_level(quarter), 3.75);
    }

    #[test]
    fn test_interval_endpoints_every_bracket() {
        for pair in SIGMA_TABLE.windows(2) {
            let (lo_dpmo, lo_sigma) = pair[0];
            let (hi_dpmo, hi_sigma) = pair[1];
            assert_close(sigma_level(lo_dpmo), lo_sigma);
            assert_close(sigma_level(hi_dpmo), hi_sigma);
            // Just inside the bracket stays inside the sigma range
            let inside = sigma_level(lo_dpmo + 0.001);
            assert!(inside <= lo_sigma && inside > hi_sigma);
        }
    }

    #[test]
    fn test_known_rate_lands_between_two_and_three() {
        let sigma = sigma_level(150_000.0);
        assert!(sigma > 2.0 && sigma < 3.0, "got {sigma}");
    }

    #[test]
    fn test_tail_tapers_to_zero() {
        let near_top = sigma_level(690_001.0);
        assert!(near_top < 1.0 && near_top > 0.99);
        let near_ceiling = sigma_level(999_999.0);
        assert!(near_ceiling > 0.0 && near_ceiling < 0.01);
    }

    #[test]
    fn test_monotone_non_increasing() {
        let mut previous = f64::INFINITY;
        let mut dpmo = 0.0;
        while dpmo <= 1_000_000.0 {
            let sigma = sigma_level(dpmo);
            assert!(
                sigma <= previous + 1e-12,
                "sigma rose at dpmo={dpmo}: {previous} -> {sigma}"
            );
            previous = sigma;
            dpmo += 997.0; // stride coprime-ish with the table rows
        }
    }

    #[test]
    fn test_dpmo_from_failure_pct() {
        assert_close(dpmo_from_failure_pct(0.0), 0.0);
        assert_close(dpmo_from_failure_pct(15.0), 150_000.0);
        assert_close(dpmo_from_failure_pct(100.0), 1_000_000.0);
    }
}
