//! Run Metadata
//!
//! Builds the optional `meta` block of the report: run settings, the program
//! each algorithm was run with, and the host. Host fields are read from
//! `/proc` on Linux and fall back to "unknown" / 0 elsewhere.

use chrono::Utc;
use squashbench_codec::Algorithm;
use squashbench_report::{ReportMeta, SystemInfo};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Build report metadata for one sweep.
///
/// `tools` lists the program invoked for each benchmarked algorithm.
pub fn build_report_meta(
    rounds: usize,
    timeout: Duration,
    tools: &[(Algorithm, PathBuf)],
) -> ReportMeta {
    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        rounds,
        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        tools: tools
            .iter()
            .map(|(algorithm, program)| (algorithm.name().to_string(), program.display().to_string()))
            .collect::<BTreeMap<_, _>>(),
        git_commit: git_commit(),
        system: host_info(),
    }
}

fn git_commit() -> Option<String> {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let commit = String::from_utf8(output.stdout).ok()?;
    let commit = commit.trim();
    (!commit.is_empty()).then(|| commit.to_string())
}

fn host_info() -> SystemInfo {
    let cpuinfo = read_proc("cpuinfo");
    let meminfo = read_proc("meminfo");

    SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: cpuinfo
            .as_deref()
            .and_then(|text| proc_value(text, "model name"))
            .unwrap_or("unknown")
            .to_string(),
        cpu_cores: std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(1),
        memory_gb: meminfo
            .as_deref()
            .and_then(|text| proc_value(text, "MemTotal"))
            .and_then(kib_to_gib)
            .unwrap_or(0.0),
    }
}

fn read_proc(name: &str) -> Option<String> {
    if cfg!(target_os = "linux") {
        std::fs::read_to_string(Path::new("/proc").join(name)).ok()
    } else {
        None
    }
}

/// Value of the first `key: value` line in a `/proc` text file.
fn proc_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        (name.trim() == key).then(|| value.trim())
    })
}

/// `"16318480 kB"` → GiB
fn kib_to_gib(value: &str) -> Option<f64> {
    let kib: u64 = value.split_whitespace().next()?.parse().ok()?;
    Some(kib as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "processor\t: 0\n\
                           vendor_id\t: GenuineIntel\n\
                           model name\t: Intel(R) Xeon(R) CPU @ 2.20GHz\n\
                           processor\t: 1\n\
                           model name\t: Intel(R) Xeon(R) CPU @ 2.20GHz\n";

    const MEMINFO: &str = "MemTotal:       16777216 kB\nMemFree:         1048576 kB\n";

    #[test]
    fn test_proc_value_takes_first_match() {
        assert_eq!(
            proc_value(CPUINFO, "model name"),
            Some("Intel(R) Xeon(R) CPU @ 2.20GHz")
        );
        assert_eq!(proc_value(CPUINFO, "flags"), None);
    }

    #[test]
    fn test_mem_total_in_gib() {
        let gib = proc_value(MEMINFO, "MemTotal").and_then(kib_to_gib).unwrap();
        assert!((gib - 16.0).abs() < 1e-9);
        assert_eq!(kib_to_gib("not-a-number kB"), None);
    }

    #[test]
    fn test_meta_records_run_settings_and_tools() {
        let tools = vec![
            (Algorithm::Zstd, PathBuf::from("/usr/bin/zstd")),
            (Algorithm::Lzmh, PathBuf::from("./DCCLI")),
        ];
        let meta = build_report_meta(7, Duration::from_secs(30), &tools);

        assert_eq!(meta.rounds, 7);
        assert_eq!(meta.timeout_ms, 30_000);
        assert_eq!(meta.tools["zstd"], "/usr/bin/zstd");
        assert_eq!(meta.tools["lzmh"], "./DCCLI");
        assert_eq!(meta.system.os, std::env::consts::OS);
        assert!(meta.system.cpu_cores >= 1);
    }
}
