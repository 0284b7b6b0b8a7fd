use crate::core::data::complex::Complex;

/// Iterates `z ← z² + c` from `z = 0` and returns the 0-based index of
/// the first iteration whose squared magnitude reaches `threshold²`, or
/// `max_iterations` if the orbit never escapes.
///
/// Comparing squared magnitude against the squared threshold avoids a
/// square root per iteration. The comparison is inclusive: an iterate
/// landing exactly on the escape radius counts as escaped, so
/// `escape_time((2, 0), n, 2.0)` is 0.
#[must_use]
pub fn escape_time(c: Complex, max_iterations: u32, threshold: f64) -> u32 {
    let threshold_squared = threshold * threshold;
    let mut z = Complex::ZERO;

    for iteration in 0..max_iterations {
        z = z * z + c;
        if z.magnitude_squared() >= threshold_squared {
            return iteration;
        }
    }

    max_iterations
}
