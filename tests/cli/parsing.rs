// Value parsers and environment defaults.

use lhe::cli::arg_utils::{parse_block_grid, parse_dimensions, read_u32_from_str};
use lhe::cli::op_mode::{effective_nb_workers, init_nb_workers_from, init_quality_from};
use lhe::config::{NB_WORKERS_DEFAULT, NB_WORKERS_MAX, QUALITY_DEFAULT, QUALITY_MAX};

#[test]
fn leading_digits() {
    assert_eq!(read_u32_from_str("42x7"), Some((42, "x7")));
    assert_eq!(read_u32_from_str("x7"), None);
}

#[test]
fn dimensions() {
    assert_eq!(parse_dimensions("1920x1080"), Ok((1920, 1080)));
    assert!(parse_dimensions("1920x").is_err());
    assert!(parse_dimensions("1920x1080x3").is_err());
    assert!(parse_dimensions("").is_err());
}

#[test]
fn block_grids_fit_a_byte() {
    assert_eq!(parse_block_grid("8x8"), Ok((8, 8)));
    assert!(parse_block_grid("300x8").is_err());
}

#[test]
fn environment_defaults() {
    assert_eq!(init_quality_from(Some("0")), 0);
    assert_eq!(init_quality_from(Some("99")), QUALITY_MAX);
    assert_eq!(init_quality_from(Some("")), QUALITY_DEFAULT);
    assert_eq!(init_nb_workers_from(Some("6")), 6);
    assert_eq!(init_nb_workers_from(Some("100000")), NB_WORKERS_MAX);
    assert_eq!(init_nb_workers_from(Some("-1")), NB_WORKERS_DEFAULT);
}

#[test]
fn auto_workers_resolve_to_at_least_one() {
    assert!(effective_nb_workers(0) >= 1);
    assert_eq!(effective_nb_workers(5), 5);
}
