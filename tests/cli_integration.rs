//! Integration tests driving the command-line entry point end to end.
//!
//! These tests need no network access: packages are rated from snapshot files.

use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use pkg_rate::Host;
use pkg_rate::facts::{RepositoryDataset, save_snapshot};
use serde_json::Value;
use std::fs;

/// Test host that captures output to in-memory buffers.
#[derive(Default)]
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).expect("temp dir should be UTF-8");
    (tmp, dir)
}

fn sample_dataset(owner: &str, repo: &str) -> RepositoryDataset {
    let mut dataset = RepositoryDataset::new(owner, repo, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    dataset.license = Some("Apache-2.0".to_string());
    dataset.readme = Some("# Sample\n\nUsage notes.\n".to_string());
    let _ = dataset.contributors.insert("alice".to_string(), 10);
    let _ = dataset.contributors.insert("bob".to_string(), 10);
    let _ = dataset.dependencies.insert("chalk".to_string(), "~5.3.0".to_string());
    dataset
}

async fn run(host: &mut TestHost, args: &[&str]) -> pkg_rate::Result<()> {
    let mut argv = vec!["pkg-rate"];
    argv.extend_from_slice(args);
    pkg_rate::run(host, argv).await
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_score_writes_one_json_line_per_package() {
    let (_tmp, dir) = temp_dir();
    let first = dir.join("first.json");
    let second = dir.join("second.json");
    let report = dir.join("report.ndjson");
    save_snapshot(&sample_dataset("acme", "first"), &first).unwrap();
    save_snapshot(&sample_dataset("acme", "second"), &second).unwrap();

    let mut host = TestHost::default();
    run(&mut host, &["score", first.as_str(), second.as_str(), "--json", report.as_str()])
        .await
        .unwrap();

    assert_eq!(host.output_str(), "", "console output should be suppressed by --json");

    let text = fs::read_to_string(&report).unwrap();
    let lines: Vec<Value> = text.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["URL"], "https://github.com/acme/first");
    assert_eq!(lines[1]["URL"], "https://github.com/acme/second");

    for line in &lines {
        let object = line.as_object().unwrap();
        assert_eq!(object.len(), 17);
        assert_eq!(line["LicenseScore"], 1.0);
        assert_eq!(line["GoodPinningPractice"], 1.0);
        let net = line["NetScore"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&net));
    }
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_rate_from_snapshot_directory() {
    let (_tmp, dir) = temp_dir();
    save_snapshot(&sample_dataset("acme", "widget"), dir.join("acme/widget.json")).unwrap();

    let mut host = TestHost::default();
    run(
        &mut host,
        &[
            "rate",
            "https://github.com/acme/widget",
            "https://github.com/acme/absent",
            "--snapshot-dir",
            dir.as_str(),
            "--color",
            "never",
        ],
    )
    .await
    .unwrap();

    let output = host.output_str();
    assert!(output.contains("https://github.com/acme/widget is rated"), "unexpected output: {output}");
    assert!(output.contains("https://github.com/acme/absent could not be rated"));
    assert!(host.error_str().contains("Unable to rate 1 package(s)"));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_saved_snapshots_can_be_scored() {
    let (_source_tmp, source) = temp_dir();
    let (_saved_tmp, saved) = temp_dir();
    save_snapshot(&sample_dataset("acme", "widget"), source.join("acme/widget.json")).unwrap();

    let mut host = TestHost::default();
    run(
        &mut host,
        &[
            "rate",
            "https://github.com/acme/widget",
            "--snapshot-dir",
            source.as_str(),
            "--save-snapshots",
            saved.as_str(),
            "--color",
            "never",
        ],
    )
    .await
    .unwrap();

    let snapshot = saved.join("acme/widget.json");
    assert!(snapshot.exists());

    let mut host = TestHost::default();
    run(&mut host, &["score", snapshot.as_str(), "--color", "never"]).await.unwrap();
    assert!(host.output_str().contains("https://github.com/acme/widget is rated"));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_min_net_score_gate() {
    let (_tmp, dir) = temp_dir();
    let snapshot = dir.join("widget.json");
    save_snapshot(&sample_dataset("acme", "widget"), &snapshot).unwrap();

    let mut host = TestHost::default();
    run(&mut host, &["score", snapshot.as_str(), "--color", "never", "--min-net-score", "0"])
        .await
        .unwrap();

    let mut host = TestHost::default();
    let result = run(&mut host, &["score", snapshot.as_str(), "--color", "never", "--min-net-score", "1"]).await;
    assert!(result.is_err());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_config_weights_are_applied() {
    let (_tmp, dir) = temp_dir();
    let snapshot = dir.join("widget.json");
    let config = dir.join("license-only.toml");
    let report = dir.join("report.ndjson");
    save_snapshot(&sample_dataset("acme", "widget"), &snapshot).unwrap();
    fs::write(
        &config,
        "[weights]\nramp_up = 0.0\ncorrectness = 0.0\nbus_factor = 0.0\nresponsive_maintainer = 0.0\n\
         license_score = 1.0\ngood_pinning_practice = 0.0\npull_request = 0.0\n",
    )
    .unwrap();

    let mut host = TestHost::default();
    run(
        &mut host,
        &["score", snapshot.as_str(), "--config", config.as_str(), "--json", report.as_str()],
    )
    .await
    .unwrap();

    let line: Value = serde_json::from_str(fs::read_to_string(&report).unwrap().trim()).unwrap();
    assert_eq!(line["NetScore"], 1.0);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_init_then_validate() {
    let (_tmp, dir) = temp_dir();
    let config = dir.join("pkg-rate.toml");

    let mut host = TestHost::default();
    run(&mut host, &["init", config.as_str()]).await.unwrap();
    assert!(config.exists());

    let mut host = TestHost::default();
    run(&mut host, &["validate", config.as_str()]).await.unwrap();
    assert!(host.output_str().contains("Configuration file is valid"));
    assert_eq!(host.exit_code, None);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_validate_reports_bad_weights() {
    let (_tmp, dir) = temp_dir();
    let config = dir.join("bad.toml");
    fs::write(&config, "[weights]\npull_request = 0.5\n").unwrap();

    let mut host = TestHost::default();
    let result = run(&mut host, &["validate", config.as_str()]).await;

    assert!(result.is_err());
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("Configuration validation failed"));
}
