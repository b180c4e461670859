//! Startup defaults for the CLI.
//!
//! - [`init_quality`] / [`init_nb_workers`] read per-process defaults from
//!   `LHE_QUALITY` and `LHE_NBWORKERS`.
//! - [`default_nb_workers`] resolves the "auto" worker count.

use crate::cli::arg_utils::read_u32_from_str;
use crate::cli::constants::display_level;
use crate::config::{NB_WORKERS_DEFAULT, NB_WORKERS_MAX, QUALITY_DEFAULT, QUALITY_MAX};

const ENV_QUALITY: &str = "LHE_QUALITY";
const ENV_NBWORKERS: &str = "LHE_NBWORKERS";

fn warn_ignored(var: &str, value: &str) {
    if display_level() >= 2 {
        eprintln!(
            "Ignore environment variable setting {}={}: not a valid unsigned value ",
            var, value
        );
    }
}

/// Read the default quality from `LHE_QUALITY`.
pub fn init_quality() -> u8 {
    init_quality_from(std::env::var(ENV_QUALITY).ok().as_deref())
}

/// Testable core of [`init_quality`]. Values above the maximum are clamped.
pub fn init_quality_from(env_val: Option<&str>) -> u8 {
    if let Some(env) = env_val {
        if let Some((val, _rest)) = read_u32_from_str(env) {
            return val.min(QUALITY_MAX as u32) as u8;
        }
        warn_ignored(ENV_QUALITY, env);
    }
    QUALITY_DEFAULT
}

/// Read the worker count from `LHE_NBWORKERS`. `0` means auto.
pub fn init_nb_workers() -> usize {
    init_nb_workers_from(std::env::var(ENV_NBWORKERS).ok().as_deref())
}

/// Testable core of [`init_nb_workers`].
pub fn init_nb_workers_from(env_val: Option<&str>) -> usize {
    if let Some(env) = env_val {
        if let Some((val, _rest)) = read_u32_from_str(env) {
            return (val as usize).min(NB_WORKERS_MAX);
        }
        warn_ignored(ENV_NBWORKERS, env);
    }
    NB_WORKERS_DEFAULT
}

/// Worker count used when the configured value is `0`.
pub fn default_nb_workers() -> usize {
    num_cpus::get().clamp(1, NB_WORKERS_MAX)
}

/// Resolve `0` to [`default_nb_workers`].
pub fn effective_nb_workers(nb_workers: usize) -> usize {
    if nb_workers == 0 {
        default_nb_workers()
    } else {
        nb_workers
    }
}
