//! Human-readable byte sizes.

const UNITS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];

/// Formats `bytes` with a binary divisor and `digits` fraction digits, grouping thousands with
/// commas (`1,536.00 KB`).
pub fn format_bytes(bytes: u64, digits: usize) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{} {}", group_thousands(&format!("{value:.digits$}")), UNITS[unit])
}

fn group_thousands(number: &str) -> String {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    let mut grouped = String::with_capacity(number.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn scales_through_units() {
        assert_eq!(format_bytes(0, 2), "0.00 bytes");
        assert_eq!(format_bytes(1023, 2), "1,023.00 bytes");
        assert_eq!(format_bytes(1536, 2), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024, 0), "5 MB");
        assert_eq!(format_bytes(3 * 1024_u64.pow(3), 1), "3.0 GB");
    }

    #[test]
    fn terabytes_do_not_scale_further() {
        assert_eq!(format_bytes(2048 * 1024_u64.pow(4), 2), "2,048.00 TB");
    }
}
