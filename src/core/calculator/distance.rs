use crate::models::location_sample::LocationSample;

/// Length of the sample polyline in metres, in the given order.
/// Never negative: an empty trail is `+0.0`, not the `-0.0` of `f64::sum`.
pub fn trail_length_m(samples: &[LocationSample]) -> f64 {
    samples
        .windows(2)
        .map(|w| w[0].position.distance_to(&w[1].position))
        .fold(0.0, |acc, leg| acc + leg)
}
