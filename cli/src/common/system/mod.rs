//! # Questsmith System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Best-effort host resource usage for the `/status` endpoint, read through
//! `sysinfo`:
//! - CPU: global usage over two refreshes taken `MINIMUM_CPU_UPDATE_INTERVAL`
//!   apart (at least 100 ms).
//! - Memory: used over total physical memory.
//!
//! On platforms `sysinfo` does not support, or when it reports no memory,
//! the value is `None`, which the status endpoint reports as `"N/A"`.
//!
use std::time::Duration;
use sysinfo::System;
use tracing::debug;

const MIN_CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// A point-in-time view of host resource usage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemUsage {
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
}

/// Samples CPU and memory usage. Never fails.
pub async fn probe() -> SystemUsage {
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        debug!("System probe unavailable on this platform");
        return SystemUsage::default();
    }

    let mut sys = System::new();
    sys.refresh_cpu_usage();
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL.max(MIN_CPU_SAMPLE_INTERVAL)).await;
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let cpu = f64::from(sys.global_cpu_usage());
    SystemUsage {
        cpu_percent: cpu.is_finite().then(|| round1(cpu.clamp(0.0, 100.0))),
        memory_percent: percent(sys.used_memory(), sys.total_memory()),
    }
}

/// `used / total` as a percentage rounded to one decimal; `None` for an empty total.
fn percent(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(round1(used.min(total) as f64 * 100.0 / total as f64))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
