//! Property-based tests for invariants

use proptest::prelude::*;
use zramd::sizing::SizingRequest;
use zramd::zram::{module_listed, parse_swap_line};
use zramd::KernelVersion;

proptest! {
    #[test]
    fn zram_partition_lines_roundtrip(
        index in 0u32..100_000,
        dev in any::<bool>(),
        size in 0u64..1 << 40,
    ) {
        let prefix = if dev { "/dev/" } else { "/" };
        let line = format!("{prefix}zram{index}\tpartition\t{size}\t0\t100");
        prop_assert_eq!(parse_swap_line(&line), Some(index));
    }

    #[test]
    fn non_partition_lines_never_match(index in 0u32..100_000, kind in "[a-z]{1,10}") {
        prop_assume!(kind != "partition");
        let line = format!("/dev/zram{index} {kind} 1 0 -2");
        prop_assert_eq!(parse_swap_line(&line), None);
    }

    #[test]
    fn swap_parser_never_panics(line in "\\PC*") {
        let _ = parse_swap_line(&line);
        let _ = module_listed(&line);
        let _ = KernelVersion::parse(&line);
    }

    #[test]
    fn module_prefix_never_matches(suffix in "[a-z_]{1,10}") {
        let listing = format!("zram{suffix} 123 0 - Live 0x0\n");
        prop_assert!(!module_listed(&listing));
    }

    #[test]
    fn per_device_split_is_bounded(
        ram_gib in 1u64..2048,
        fraction in 0.05f64..=1.0,
        cap_mib in 1u64..1 << 20,
        count in 1u32..=255,
    ) {
        let req = SizingRequest {
            total_ram_bytes: ram_gib << 30,
            fraction,
            cap_bytes: cap_mib << 20,
            device_count: count,
        };
        let total = req.total_bytes();
        prop_assert!(total <= req.cap_bytes);
        prop_assert!(req.per_device_bytes() * u64::from(count) <= total);
        prop_assert_eq!(req.per_device_bytes(), req.per_device_bytes());
    }
}
