//! `/proc/meminfo` parsing.

use crate::{Error, Result};
use std::collections::HashMap;

/// Parse one line such as `MemTotal:  65790200 kB` or `HugePages_Surp:  0`.
///
/// Lines with fewer than 2 or more than 3 fields yield `None`. An
/// unparsable value is reported as 0.
#[must_use]
pub fn parse_line(line: &str) -> Option<(&str, u64)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if !(2..=3).contains(&fields.len()) {
        return None;
    }
    let key = fields[0].strip_suffix(':').unwrap_or(fields[0]);
    if key.is_empty() {
        return None;
    }
    Some((key, fields[1].parse().unwrap_or(0)))
}

/// Parse the whole table. Values are in KiB as reported by the kernel.
#[must_use]
pub fn parse(content: &str) -> HashMap<String, u64> {
    content
        .lines()
        .filter_map(parse_line)
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// `MemTotal` converted to bytes.
pub fn mem_total_bytes(table: &HashMap<String, u64>) -> Result<u64> {
    table
        .get("MemTotal")
        .map(|kib| kib.saturating_mul(1024))
        .ok_or_else(|| Error::InvalidInput("could not determine total RAM".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let cases = [
            ("MemTotal:       65790200 kB", "MemTotal", 65_790_200),
            ("Inactive(file):  2770308 kB", "Inactive(file)", 2_770_308),
            ("VmallocTotal:   54358348362 kB", "VmallocTotal", 54_358_348_362),
            ("ShmemHugePages:        0 kB", "ShmemHugePages", 0),
            ("HugePages_Surp:        0", "HugePages_Surp", 0),
            ("Hugepagesize:       2048 kB", "Hugepagesize", 2048),
        ];
        for (line, key, value) in cases {
            assert_eq!(parse_line(line), Some((key, value)), "{line}");
        }
    }

    #[test]
    fn test_parse_line_rejects() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("MemTotal:"), None);
        assert_eq!(parse_line("a: 1 kB extra"), None);
    }

    #[test]
    fn test_parse_line_bad_value() {
        assert_eq!(parse_line("MemTotal: lots kB"), Some(("MemTotal", 0)));
    }

    #[test]
    fn test_mem_total_bytes() {
        let table = parse("MemTotal:  1024 kB\nMemFree:  512 kB\n");
        assert_eq!(table.len(), 2);
        assert_eq!(mem_total_bytes(&table).unwrap(), 1024 * 1024);
    }

    #[test]
    fn test_mem_total_missing() {
        let table = parse("MemFree:  512 kB\n");
        let err = mem_total_bytes(&table).unwrap_err();
        assert!(err.to_string().contains("total RAM"));
    }
}
