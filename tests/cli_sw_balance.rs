#![cfg(unix)]

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "ibgrove-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn fabric_dir(prefix: &str) -> PathBuf {
    let dir = unique_temp_dir(prefix);
    write_file(
        &dir,
        "220",
        "\
0x0001 001 : (Channel Adapter portguid 0x1: 'seqio1-ib0 HCA-1')
0x0002 002 : (Channel Adapter portguid 0x2: 'seqio2-ib0 HCA-1')
0x0004 013 : (Channel Adapter portguid 0x4: 'grove1 HCA-1')
0x0005 014 : (Channel Adapter portguid 0x5: 'grove2 HCA-1')
",
    );
    write_file(
        &dir,
        "55",
        "\
0x0003 001 : (Channel Adapter portguid 0x3: 'seqio3-ib0 HCA-1')
0x0004 017 : (Channel Adapter portguid 0x4: 'grove1 HCA-1')
0x0005 018 : (Channel Adapter portguid 0x5: 'grove2 HCA-1')
",
    );
    dir
}

fn sw_balance(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sw_balance"))
        .current_dir(dir)
        .args(["--route-command", "cat", "--no-progress", "-c", "grove"])
        .args(args)
        .output()
        .expect("run sw_balance")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "sw_balance failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn sw_balance_without_simulation_prints_port_maps() {
    let dir = fabric_dir("sw-balance-map");
    let output = sw_balance(&dir, &["-C", "seqio", "-l", "220,55"]);

    let stdout = stdout_of(&output);
    let first = stdout.find("SW 220: {13: 1, 14: 1}").expect("switch 220");
    let second = stdout.find("SW 55: {17: 1, 18: 1}").expect("switch 55");
    assert!(first < second, "stdout={stdout}");
    assert!(stdout.contains("   Down 1: seqio3,\n"), "stdout={stdout}");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sw_balance_simulation_report() {
    let dir = fabric_dir("sw-balance-sim");
    let output = sw_balance(
        &dir,
        &[
            "-C", "seqio", "-l", "220,55", "-s", "-n", "6", "--compute-nodes", "3",
            "--storage-nodes", "2", "--seed", "3", "-i", "2",
        ],
    );

    let stdout = stdout_of(&output);
    assert_eq!(stdout.matches("Number of compute nodes : 3\n").count(), 2);
    assert!(stdout.contains("Number of storage nodes : 2\n"), "stdout={stdout}");
    assert!(stdout.contains("Number of files: 6\n"), "stdout={stdout}");
    assert!(stdout.contains("Files per uplink\n"), "stdout={stdout}");
    assert!(stdout.contains("(or worse)"), "stdout={stdout}");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sw_balance_json_trials_account_for_every_file() {
    let dir = fabric_dir("sw-balance-json");
    let output = sw_balance(
        &dir,
        &[
            "-C", "seqio", "-l", "220,55", "-s", "-n", "12", "--compute-nodes", "3",
            "--storage-nodes", "2", "--seed", "11", "-i", "3", "--json",
        ],
    );

    let stdout = stdout_of(&output);
    let trials: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("trial json"))
        .collect();
    assert_eq!(trials.len(), 3);
    for trial in &trials {
        let total: u64 = trial["buckets"]
            .as_array()
            .expect("buckets")
            .iter()
            .map(|b| b["count"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 12);
        assert_eq!(trial["files"], 12);
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sw_balance_same_seed_same_output() {
    let dir = fabric_dir("sw-balance-seed");
    let args = [
        "-C", "seqio", "-l", "220,55", "-s", "-n", "30", "--compute-nodes", "3",
        "--storage-nodes", "2", "--seed", "99", "--json",
    ];
    let a = stdout_of(&sw_balance(&dir, &args));
    let b = stdout_of(&sw_balance(&dir, &args));
    assert_eq!(a, b);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sw_balance_unknown_compute_node_is_fatal() {
    let dir = fabric_dir("sw-balance-unknown");
    // seqio4 is not attached to either switch
    let output = sw_balance(
        &dir,
        &[
            "-C", "seqio", "-l", "220,55", "-s", "-n", "4", "--compute-nodes", "4",
            "--storage-nodes", "2",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seqio4"), "stderr={stderr}");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sw_balance_simulation_requires_downlink_cluster() {
    let dir = fabric_dir("sw-balance-no-downlink");
    let output = sw_balance(&dir, &["-l", "220", "-s"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Must specify downlink cluster"),
        "stderr={stderr}"
    );
    let _ = fs::remove_dir_all(&dir);
}
