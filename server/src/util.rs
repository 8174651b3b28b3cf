//! Shared formatting helpers

/// Format a byte count for error messages.
///
/// # Examples
///
/// ```
/// use natioid_server::util::format_size;
///
/// assert_eq!(format_size(512), "512 bytes");
/// assert_eq!(format_size(2048), "2KB");
/// assert_eq!(format_size(10 * 1024 * 1024), "10.0MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < 1024 * 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Render a fee held in minor units as a decimal amount.
///
/// ```
/// use natioid_server::util::format_fee;
///
/// assert_eq!(format_fee(2500), "25.00");
/// assert_eq!(format_fee(7), "0.07");
/// ```
pub fn format_fee(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(1023), "1023 bytes");
        assert_eq!(format_size(1024), "1KB");
        assert_eq!(format_size(1024 * 1024 - 1), "1023KB");
        assert_eq!(format_size(1024 * 1024), "1.0MB");
        assert_eq!(format_size(5_500_000), "5.2MB");
    }

    #[test]
    fn test_format_fee() {
        assert_eq!(format_fee(0), "0.00");
        assert_eq!(format_fee(100), "1.00");
        assert_eq!(format_fee(123_456), "1234.56");
    }
}
