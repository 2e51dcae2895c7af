/// Human readable byte count in decimal units, one decimal place.
///
/// ```
/// use rah_dataset::size::human_size;
///
/// assert_eq!(human_size(19_896_608_308), "19.9 GB");
/// assert_eq!(human_size(999), "999 Bytes");
/// ```
pub fn human_size(bytes: u64) -> String {
    const BASE: f64 = 1000.0;
    const SUFFIXES: [&str; 7] = ["kB", "MB", "GB", "TB", "PB", "EB", "ZB"];

    match bytes {
        1 => return "1 Byte".to_string(),
        b if (b as f64) < BASE => return format!("{b} Bytes"),
        _ => {}
    }

    let value = bytes as f64;
    let mut unit = BASE;
    for suffix in SUFFIXES {
        // Compare after rounding to one decimal so 999.95 kB becomes 1.0 MB.
        let scaled = value / unit;
        if (scaled * 10.0).round() < BASE * 10.0 {
            return format!("{scaled:.1} {suffix}");
        }
        unit *= BASE;
    }
    format!("{:.1} YB", value / unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_counts_are_bytes() {
        assert_eq!(human_size(0), "0 Bytes");
        assert_eq!(human_size(1), "1 Byte");
        assert_eq!(human_size(999), "999 Bytes");
    }

    #[test]
    fn decimal_units() {
        assert_eq!(human_size(1000), "1.0 kB");
        assert_eq!(human_size(40_872), "40.9 kB");
        assert_eq!(human_size(33_345_659), "33.3 MB");
        assert_eq!(human_size(19_896_608_308), "19.9 GB");
        assert_eq!(human_size(2_500_000_000_000), "2.5 TB");
    }

    #[test]
    fn rounding_carries_into_next_unit() {
        assert_eq!(human_size(999_949), "999.9 kB");
        assert_eq!(human_size(999_950), "1.0 MB");
        assert_eq!(human_size(999_999_999), "1.0 GB");
    }
}
