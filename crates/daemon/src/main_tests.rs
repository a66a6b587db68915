// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;

fn write_bytes(path: &Path, size: u64) {
    let mut f = std::fs::File::create(path).unwrap();
    f.write_all(&vec![b'x'; size as usize]).unwrap();
}

fn size(path: &Path) -> u64 {
    std::fs::metadata(path).unwrap().len()
}

#[test]
#[serial(env)]
fn poll_intervals_default() {
    std::env::remove_var("MW_BRIDGE_POLL_MS");
    std::env::remove_var("MW_MONITOR_POLL_MS");
    assert_eq!(env::bridge_poll_interval(), Duration::from_secs(2));
    assert_eq!(env::monitor_poll_interval(), Duration::from_secs(3));
}

#[test]
#[serial(env)]
fn poll_intervals_from_env() {
    std::env::set_var("MW_BRIDGE_POLL_MS", "50");
    std::env::set_var("MW_MONITOR_POLL_MS", "soon");
    let bridge = env::bridge_poll_interval();
    let monitor = env::monitor_poll_interval();
    std::env::remove_var("MW_BRIDGE_POLL_MS");
    std::env::remove_var("MW_MONITOR_POLL_MS");

    assert_eq!(bridge, Duration::from_millis(50));
    assert_eq!(monitor, Duration::from_secs(3));
}

#[test]
fn small_log_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("daemon.log");
    write_bytes(&log, 1024);

    rotate_log_if_needed(&log);

    assert_eq!(size(&log), 1024);
    assert!(!dir.path().join("daemon.log.1").exists());
}

#[test]
fn oversized_log_shifts_generations() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("daemon.log");
    write_bytes(&dir.path().join("daemon.log.1"), 100);
    write_bytes(&dir.path().join("daemon.log.2"), 200);
    write_bytes(&dir.path().join("daemon.log.3"), 300);
    write_bytes(&log, MAX_LOG_SIZE + 1);

    rotate_log_if_needed(&log);

    assert!(!log.exists());
    assert_eq!(size(&dir.path().join("daemon.log.1")), MAX_LOG_SIZE + 1);
    assert_eq!(size(&dir.path().join("daemon.log.2")), 100);
    // Oldest generation is dropped
    assert_eq!(size(&dir.path().join("daemon.log.3")), 200);
}

#[test]
fn missing_log_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    rotate_log_if_needed(&dir.path().join("daemon.log"));
}

#[test]
fn startup_marker_is_appended() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::resolve(dir.path().join("state"), dir.path().to_path_buf()).unwrap();

    write_startup_marker(&config).unwrap();
    write_startup_marker(&config).unwrap();

    let log = std::fs::read_to_string(&config.log_path).unwrap();
    let expected = format!("{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id());
    assert_eq!(log.lines().filter(|l| *l == expected).count(), 2);
}
