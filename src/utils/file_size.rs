const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Human readable size in binary units, e.g. `1.50 MB`.
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_have_no_decimals() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1000), "1000 B");
    }

    #[test]
    fn larger_sizes_use_two_decimals() {
        assert_eq!(human_size(1024), "1.00 KB");
        assert_eq!(human_size(1536 * 1024), "1.50 MB");
        assert_eq!(human_size(u64::MAX), "16384.00 PB");
    }
}
