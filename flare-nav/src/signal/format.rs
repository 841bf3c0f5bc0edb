//! Distance text for guidance messages.

/// Format a distance in meters for display.
///
/// Below 1 m: whole centimeters ("45 cm"). Below 10 m: one decimal ("3.5 m").
/// Otherwise whole meters ("12 m"). Centimeter and whole-meter values are
/// truncated, not rounded.
pub fn format_distance(meters: f64) -> String {
    if meters < 1.0 {
        format!("{} cm", (meters * 100.0) as i64)
    } else if meters < 10.0 {
        format!("{:.1} m", meters)
    } else {
        format!("{} m", meters as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.456), "45 cm");
        assert_eq!(format_distance(0.0), "0 cm");
        assert_eq!(format_distance(1.0), "1.0 m");
        assert_eq!(format_distance(3.54), "3.5 m");
        assert_eq!(format_distance(10.0), "10 m");
        assert_eq!(format_distance(27.9), "27 m");
    }
}
