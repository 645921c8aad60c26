use flate2::read::MultiGzDecoder;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::util::open_with_backoff;

/// Failure while streaming one file: either the bytes could not be read
/// (open, gzip, UTF-8) or the line handler refused a line.
#[derive(Debug)]
pub enum LineError<E> {
    Read(io::Error),
    Handler(E),
}

impl<E: fmt::Display> fmt::Display for LineError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "read: {e}"),
            Self::Handler(e) => write!(f, "{e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for LineError<E> {}

impl<E> From<io::Error> for LineError<E> {
    fn from(e: io::Error) -> Self {
        Self::Read(e)
    }
}

/// A `Read` wrapper that counts compressed bytes read.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}
impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Stream a gzip JSONL file line by line (concatenated gzip members are
/// read through). Calls `on_progress(delta_compressed_bytes)` as input is
/// consumed and `on_line` with each line minus its `\r?\n` terminator.
///
/// Unlike a skip-and-continue reader, every failure is returned: the caller
/// decides whether a read failure isolates to this file or aborts the run.
/// Lines handled before a failure stay handled.
pub fn for_each_line_with_progress<E>(
    path: &Path,
    read_buf_bytes: usize,
    mut on_progress: impl FnMut(u64),
    mut on_line: impl FnMut(&str) -> Result<(), E>,
) -> Result<u64, LineError<E>> {
    let file = open_with_backoff(path, 16, 50)?;
    let counter = Arc::new(AtomicU64::new(0));
    let cnt = CountingReader { inner: file, counter: counter.clone() };
    let mut reader = BufReader::with_capacity(read_buf_bytes.max(8 * 1024), MultiGzDecoder::new(cnt));

    let mut buf = String::with_capacity(16 * 1024);
    let mut last = 0u64;
    let mut lines = 0u64;
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        let cur = counter.load(Ordering::Relaxed);
        if cur > last {
            on_progress(cur - last);
            last = cur;
        }
        if n == 0 {
            break;
        }
        if buf.ends_with('\n') {
            let _ = buf.pop();
            if buf.ends_with('\r') {
                let _ = buf.pop();
            }
        }
        lines += 1;
        on_line(&buf).map_err(LineError::Handler)?;
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn reads_lines_and_reports_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.gz");
        let mut enc = GzEncoder::new(File::create(&p).unwrap(), Compression::default());
        write!(enc, "one\r\ntwo\n\nthree").unwrap();
        enc.finish().unwrap();

        let mut seen = Vec::new();
        let mut bytes = 0;
        let n = for_each_line_with_progress(&p, 8 * 1024, |d| bytes += d, |l| {
            seen.push(l.to_string());
            Ok::<(), ()>(())
        })
        .unwrap();
        assert_eq!(n, 4);
        assert_eq!(seen, vec!["one", "two", "", "three"]);
        assert_eq!(bytes, std::fs::metadata(&p).unwrap().len());
    }

    #[test]
    fn not_gzip_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bad.gz");
        std::fs::write(&p, b"{\"text\":\"plain\"}\n").unwrap();
        let r = for_each_line_with_progress(&p, 8 * 1024, |_| {}, |_| Ok::<(), ()>(()));
        assert!(matches!(r, Err(LineError::Read(_))));
    }

    #[test]
    fn handler_error_stops_stream() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.gz");
        let mut enc = GzEncoder::new(File::create(&p).unwrap(), Compression::default());
        write!(enc, "a\nb\nc\n").unwrap();
        enc.finish().unwrap();

        let mut count = 0;
        let r = for_each_line_with_progress(&p, 8 * 1024, |_| {}, |l| {
            count += 1;
            if l == "b" { Err("stop") } else { Ok(()) }
        });
        assert!(matches!(r, Err(LineError::Handler("stop"))));
        assert_eq!(count, 2);
    }
}
