//! Human-readable byte sizes.

/// Bytes in one kibibyte; all size units are base 1024.
pub const BYTES_PER_KB: u64 = 1024;
/// Bytes in one mebibyte.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count in the largest fitting unit, rounded to at most two
/// decimals with trailing zeros dropped (`1.5 MB`, `2 KB`, `0 Bytes`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= BYTES_PER_KB as f64 && unit < SIZE_UNITS.len() - 1 {
        value /= BYTES_PER_KB as f64;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

/// Format a byte count as mebibytes with two fixed decimals (`2.00 MB`).
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB as f64)
}

/// Format a byte count as kibibytes with two fixed decimals (`1.50 KB`).
pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / BYTES_PER_KB as f64)
}

/// Format an optional history file size: `Unknown` when absent or zero,
/// megabytes below one gibibyte, gibibytes above.
pub fn format_history_size(bytes: Option<u64>) -> String {
    match bytes {
        None | Some(0) => "Unknown".to_string(),
        Some(b) => {
            let mb = b as f64 / BYTES_PER_MB as f64;
            if mb < 1024.0 {
                format!("{mb:.2} MB")
            } else {
                format!("{:.2} GB", mb / 1024.0)
            }
        }
    }
}
