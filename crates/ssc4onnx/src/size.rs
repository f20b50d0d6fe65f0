const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Formats a byte count with binary prefixes, e.g. `1536.0` as `1.5KiB`.
pub fn human_readable_size(num: f64) -> String {
    let mut num = num;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{num:3.1}{unit}B");
        }
        num /= 1024.0;
    }
    format!("{num:.1}YiB")
}
