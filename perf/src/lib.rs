use spool_engine::{drain, pump};
use spool_ring::{RingConfig, StreamWriter};
use std::io::{self, Cursor};
use std::thread;

// ─── Inputs ─────────────────────────────────────────────────────────────────

/// Deterministic, non-repeating-looking test bytes.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 131 % 251) as u8).collect()
}

// ─── Harnesses ──────────────────────────────────────────────────────────────

/// Pushes `data` through a ring of `capacity` bytes to `readers` threads that
/// each consume at most `step` bytes per wait. Returns the bytes every reader
/// saw (all readers see the same count).
pub fn ring_fanout(capacity: usize, readers: usize, data: &[u8], step: usize) -> u64 {
    let mut writer = StreamWriter::create(RingConfig::new(capacity));
    let consumers: Vec<_> = (0..readers)
        .map(|_| {
            let mut reader = writer.add_reader();
            thread::spawn(move || {
                let mut seen = 0u64;
                loop {
                    let mut view = reader.wait_output().expect("cancelled");
                    if view.is_empty() {
                        break seen;
                    }
                    view.clip(step);
                    let n = view.len();
                    view.commit(n);
                    seen += n as u64;
                }
            })
        })
        .collect();

    let mut sent = 0;
    while sent < data.len() {
        let mut view = writer.wait_input().expect("cancelled");
        let n = view.fill_from(&data[sent..]);
        view.commit(n);
        sent += n;
    }
    writer.signal_eof();

    let seen = consumers
        .into_iter()
        .map(|c| c.join().expect("reader panicked"))
        .min()
        .unwrap_or(data.len() as u64);
    writer.close();
    seen
}

/// The engine's pump/drain pair with `io::sink()` outputs, so the figure is
/// buffer and syscall-free copy overhead only.
pub fn engine_fanout(capacity: usize, readers: usize, data: &[u8]) -> u64 {
    let mut writer = StreamWriter::create(RingConfig::new(capacity));
    let consumers: Vec<_> = (0..readers)
        .map(|i| {
            let mut reader = writer.add_reader();
            thread::spawn(move || drain(&mut reader, &mut io::sink(), &format!("sink-{i}")))
        })
        .collect();

    let bytes = pump(Cursor::new(data), &mut writer).expect("pump failed");
    for c in consumers {
        c.join().expect("reader panicked").expect("drain failed");
    }
    writer.close();
    bytes
}
