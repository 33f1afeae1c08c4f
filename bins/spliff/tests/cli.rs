//! Runs the built `spliff` binary end to end.

use std::path::PathBuf;
use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_spliff");

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spliff_cli_{tag}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 13 % 241) as u8).collect()
}

#[test]
fn splits_into_numbered_chunks_with_links() {
    let dir = scratch_dir("chunks");
    let input = dir.join("in");
    let data = pattern(10 * 1024 + 100);
    std::fs::write(&input, &data).unwrap();

    let output = Command::new(BIN)
        .arg("-v")
        .args(["-s", "2k", "-b", "1k", "-i"])
        .arg(&input)
        .arg(dir.join("chunk-0"))
        .arg(dir.join("alias-0"))
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    // ceil(10340 / 2048) = 6 chunks: chunk-0 .. chunk-5.
    let mut joined = Vec::new();
    for i in 0..6 {
        let chunk = std::fs::read(dir.join(format!("chunk-{i}"))).unwrap();
        let alias = std::fs::read(dir.join(format!("alias-{i}"))).unwrap();
        assert_eq!(chunk, alias);
        assert_eq!(chunk.len(), if i < 5 { 2048 } else { 100 });
        joined.extend(chunk);
    }
    assert_eq!(joined, data);
    assert!(!dir.join("chunk-6").exists());

    // Verbose mode names every file it writes.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chunk-5"), "{stderr}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_base_name_is_a_usage_error() {
    let output = Command::new(BIN).args(["-s", "1k"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: spliff"));
}

#[test]
fn unincrementable_name_fails() {
    let dir = scratch_dir("nonum");
    let input = dir.join("in");
    std::fs::write(&input, pattern(100)).unwrap();

    let output = Command::new(BIN)
        .args(["-s", "10", "-i"])
        .arg(&input)
        .arg(dir.join("plain"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("can't increment"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bad_size_in_config_file_is_reported() {
    let dir = scratch_dir("badcfg");
    let config = dir.join("spool.toml");
    std::fs::write(&config, "buffer_size = \"12x\"\n").unwrap();

    let output = Command::new(BIN)
        .arg("-c")
        .arg(&config)
        .arg(dir.join("chunk-0"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse config"), "{stderr}");
    assert!(stderr.contains("badly formed size: 12x"), "{stderr}");
    assert!(!dir.join("chunk-0").exists());
    let _ = std::fs::remove_dir_all(&dir);
}
