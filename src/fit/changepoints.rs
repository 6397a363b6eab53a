//! Changepoint placement.
//!
//! Candidate changepoints are observed (distinct, scaled) times inside the
//! first `range` fraction of the history, excluding the first time, thinned
//! evenly to at most `max` points. The placement is deterministic given the
//! same inputs.

/// Place changepoints over sorted, distinct scaled times.
pub fn place_changepoints(times: &[f64], range: f64, max: usize) -> Vec<f64> {
    let hist_size = ((times.len() as f64) * range.clamp(0.0, 1.0)).floor() as usize;
    let n = max.min(hist_size.saturating_sub(1));
    if n == 0 {
        return Vec::new();
    }

    let last = (hist_size - 1) as f64;
    let mut out: Vec<f64> = Vec::with_capacity(n);
    let mut prev_idx = 0usize;
    for i in 1..=n {
        let idx = (last * i as f64 / n as f64).round() as usize;
        if idx == prev_idx {
            continue;
        }
        out.push(times[idx]);
        prev_idx = idx;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_times(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 / (n as f64 - 1.0)).collect()
    }

    #[test]
    fn uses_first_eighty_percent_of_history() {
        let times = unit_times(10);
        let cps = place_changepoints(&times, 0.8, 25);
        // hist_size = 8 -> changepoints at indexes 1..=7.
        assert_eq!(cps.len(), 7);
        assert_eq!(cps[0], times[1]);
        assert_eq!(*cps.last().unwrap(), times[7]);
    }

    #[test]
    fn thins_to_max() {
        let times = unit_times(50);
        let cps = place_changepoints(&times, 0.8, 5);
        assert_eq!(cps.len(), 5);
        assert!(cps.windows(2).all(|w| w[0] < w[1]));
        assert!(cps.iter().all(|&t| t > 0.0 && t <= times[39]));
    }

    #[test]
    fn short_history_has_no_changepoints() {
        assert!(place_changepoints(&unit_times(2), 0.8, 25).is_empty());
        assert!(place_changepoints(&[0.0], 0.8, 25).is_empty());
        assert!(place_changepoints(&unit_times(10), 0.8, 0).is_empty());
    }
}
