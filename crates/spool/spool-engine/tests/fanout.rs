mod common;

use common::{cleanup, pattern, scratch_dir};
use spool_engine::{EngineError, Fanout, OutputTarget, drain, pump};
use spool_ring::{RingConfig, StreamWriter};
use std::io::{self, Cursor, Read, Write};
use std::thread;

#[test]
fn every_output_matches_the_input() {
    let dir = scratch_dir("fanout");
    let data = pattern(300_000);
    let outputs: Vec<_> = (0..3).map(|i| dir.join(format!("out{i}"))).collect();

    let report = Fanout::new(1000)
        .files(outputs.clone())
        .run_with(Cursor::new(data.clone()))
        .unwrap();

    assert_eq!(report.bytes, data.len() as u64);
    assert_eq!(report.outputs, 3);
    for out in &outputs {
        assert_eq!(std::fs::read(out).unwrap(), data);
    }
    cleanup(&dir);
}

#[test]
fn reads_named_input_file() {
    let dir = scratch_dir("fanout_in");
    let input = dir.join("input");
    let output = dir.join("copy");
    std::fs::write(&input, b"named input").unwrap();

    Fanout::new(4)
        .input(Some(input))
        .files([output.clone()])
        .run()
        .unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"named input");
    cleanup(&dir);
}

#[test]
fn existing_outputs_are_truncated() {
    let dir = scratch_dir("fanout_trunc");
    let output = dir.join("out");
    std::fs::write(&output, vec![b'z'; 100]).unwrap();

    Fanout::new(16)
        .files([output.clone()])
        .run_with(Cursor::new(b"short".to_vec()))
        .unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"short");
    cleanup(&dir);
}

#[test]
fn explicit_targets_mix_with_file_lists() {
    let dir = scratch_dir("fanout_targets");
    let first = dir.join("first");
    let rest = [dir.join("second"), dir.join("third")];

    let report = Fanout::new(32)
        .output(OutputTarget::File(first.clone()))
        .files(rest.clone())
        .run_with(Cursor::new(b"same bytes everywhere".to_vec()))
        .unwrap();

    assert_eq!(report.outputs, 3);
    for out in std::iter::once(&first).chain(&rest) {
        assert_eq!(std::fs::read(out).unwrap(), b"same bytes everywhere");
    }
    assert_eq!(OutputTarget::File(first).to_string(), dir.join("first").display().to_string());
    assert_eq!(OutputTarget::Stdout.to_string(), "standard output");
    cleanup(&dir);
}

#[test]
fn empty_input_gives_empty_outputs() {
    let dir = scratch_dir("fanout_empty");
    let outputs = [dir.join("a"), dir.join("b")];

    let report = Fanout::new(8)
        .files(outputs.clone())
        .run_with(io::empty())
        .unwrap();

    assert_eq!(report.bytes, 0);
    for out in &outputs {
        assert!(std::fs::read(out).unwrap().is_empty());
    }
    cleanup(&dir);
}

#[test]
fn unopenable_output_fails_the_whole_run() {
    let dir = scratch_dir("fanout_bad_out");
    let good = dir.join("good");
    let bad = dir.join("missing-dir").join("bad");

    // Far more data than the buffer holds: without cancellation the producer
    // would wait forever on the dead reader.
    let err = Fanout::new(64)
        .files([good, bad.clone()])
        .run_with(Cursor::new(pattern(1 << 20)))
        .unwrap_err();

    match err {
        EngineError::CreateOutput { path, .. } => assert_eq!(path, bad),
        other => panic!("unexpected error: {other:?}"),
    }
    cleanup(&dir);
}

/// Yields some bytes, then fails.
struct FailingSource {
    left: usize,
}

impl Read for FailingSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.left == 0 {
            return Err(io::Error::other("disk on fire"));
        }
        let n = buf.len().min(self.left);
        buf[..n].fill(b'x');
        self.left -= n;
        Ok(n)
    }
}

#[test]
fn input_error_cancels_outputs() {
    let dir = scratch_dir("fanout_bad_in");
    let err = Fanout::new(32)
        .files([dir.join("a"), dir.join("b")])
        .run_with(FailingSource { left: 100 })
        .unwrap_err();

    assert!(matches!(err, EngineError::Read(_)), "unexpected error: {err:?}");
    cleanup(&dir);
}

/// Accepts at most three bytes per call and ignores the rest of the slices.
struct TrickleSink(Vec<u8>);

impl Write for TrickleSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(3);
        self.0.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn drain_copes_with_short_writes() {
    let data = pattern(5000);
    let mut writer = StreamWriter::create(RingConfig::new(97));
    let mut reader = writer.add_reader();

    let consumer = thread::spawn(move || {
        let mut sink = TrickleSink(Vec::new());
        let n = drain(&mut reader, &mut sink, "trickle").unwrap();
        (n, sink.0)
    });

    assert_eq!(pump(Cursor::new(data.clone()), &mut writer).unwrap(), 5000);
    let (n, written) = consumer.join().unwrap();
    assert_eq!(n, 5000);
    assert_eq!(written, data);
    writer.close();
}

/// Refuses every write.
struct FullSink;

impl Write for FullSink {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn zero_length_write_is_an_error() {
    let mut writer = StreamWriter::create(RingConfig::new(8));
    let mut reader = writer.add_reader();

    let consumer = thread::spawn(move || drain(&mut reader, &mut FullSink, "full"));
    let pumped = pump(Cursor::new(pattern(64)), &mut writer);

    let err = consumer.join().unwrap().unwrap_err();
    assert!(matches!(err, EngineError::Write { ref target, .. } if target == "full"));
    assert!(pumped.unwrap_err().is_cancelled());
}
