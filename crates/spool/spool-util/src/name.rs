// Odometer increment for chunk file names
//
// The splitter names successive chunks by bumping the rightmost run of
// decimal digits in the file name, carrying leftwards like an odometer:
//
//     part-007.bin  ->  part-008.bin
//     part-009.bin  ->  part-010.bin
//     x99           ->  x100          (a run of nines widens)
//
// Only the final path component is considered, so digits in a directory
// name are never touched. A name without any digit cannot be advanced.

use std::path::{Path, PathBuf, is_separator};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("can't increment {0}: no number in file name")]
    NoNumeral(String),
    #[error("can't increment {0}: not valid UTF-8")]
    NotUnicode(PathBuf),
}

/// Returns the name following `name` in odometer order.
///
/// # Example
/// ```
/// use spool_util::next_name;
/// assert_eq!(next_name("out/chunk-19.dat").unwrap(), "out/chunk-20.dat");
/// ```
pub fn next_name(name: &str) -> Result<String, NameError> {
    let file_start = name.rfind(is_separator).map_or(0, |i| i + 1);
    let bytes = name.as_bytes();

    // ASCII digits never occur inside a multi-byte UTF-8 sequence, so these
    // byte positions are always char boundaries.
    let end = bytes[file_start..]
        .iter()
        .rposition(u8::is_ascii_digit)
        .map(|i| file_start + i + 1)
        .ok_or_else(|| NameError::NoNumeral(name.to_owned()))?;
    let run_len = bytes[file_start..end]
        .iter()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let start = end - run_len;

    Ok(format!(
        "{}{}{}",
        &name[..start],
        increment_run(&name[start..end]),
        &name[end..]
    ))
}

/// [`next_name`] for paths.
pub fn next_path(path: &Path) -> Result<PathBuf, NameError> {
    let name = path
        .to_str()
        .ok_or_else(|| NameError::NotUnicode(path.to_path_buf()))?;
    next_name(name).map(PathBuf::from)
}

fn increment_run(run: &str) -> String {
    let mut digits: Vec<u8> = run.bytes().collect();
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return digits.into_iter().map(char::from).collect();
        }
    }
    // every digit carried
    std::iter::once('1')
        .chain(digits.into_iter().map(char::from))
        .collect()
}
