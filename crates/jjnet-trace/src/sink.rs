//! Append-only, tab-separated trace files.
//!
//! A [`TraceSink`] writes one row per sample: the time in fixed-point
//! notation followed by values in C-style scientific notation
//! (`1.234560e+00`). The header line is written only when the file is new
//! or empty, so a run appending to an existing trace does not repeat it.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use jjnet_core::HookError;
use tracing::debug;

/// Number of fractional digits for the time column given the output step.
///
/// `floor(-log10(dt) + 0.95)` for `dt < 1`, otherwise 0.
pub fn time_precision(dt: f64) -> usize {
    let l = dt.log10();
    if l < 0.0 {
        (-l + 0.95).floor() as usize
    } else {
        0
    }
}

/// Format `value` like C's `%.<precision>e`: the exponent always carries a
/// sign and at least two digits.
pub fn format_scientific(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// Expand the first `%u` or `%d` in `pattern` to `index`. A pattern without
/// a placeholder gets `.<index>` appended.
pub fn expand_pattern(pattern: &str, index: usize) -> String {
    let at = match (pattern.find("%u"), pattern.find("%d")) {
        (Some(u), Some(d)) => Some(u.min(d)),
        (u, d) => u.or(d),
    };
    match at {
        Some(i) => format!("{}{index}{}", &pattern[..i], &pattern[i + 2..]),
        None => format!("{pattern}.{index}"),
    }
}

/// Column formatting shared by every row of a sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowFormat {
    /// Fractional digits of the time column.
    pub time_precision: usize,
    /// Mantissa digits of value columns.
    pub precision: usize,
}

/// An open trace file.
#[derive(Debug)]
pub struct TraceSink {
    path: PathBuf,
    format: RowFormat,
    writer: BufWriter<File>,
    line: String,
}

impl TraceSink {
    /// Open `path` for appending, writing `header` if the file is new or
    /// empty. `header` must not end in a newline.
    ///
    /// # Errors
    ///
    /// [`HookError::Io`] if the file cannot be opened, inspected or
    /// written.
    pub fn open(path: impl AsRef<Path>, header: &str, format: RowFormat) -> Result<Self, HookError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error(&path, e))?;
        let empty = file.metadata().map_err(|e| io_error(&path, e))?.len() == 0;

        let mut sink = Self {
            path,
            format,
            writer: BufWriter::new(file),
            line: String::new(),
        };
        if empty {
            writeln!(sink.writer, "{header}").map_err(|e| io_error(&sink.path, e))?;
        }
        debug!(path = %sink.path.display(), header = empty, "trace sink opened");
        Ok(sink)
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Formatting used for rows.
    pub fn format(&self) -> RowFormat {
        self.format
    }

    /// Append one row: `time` then each value, tab-separated.
    ///
    /// # Errors
    ///
    /// [`HookError::Io`] on write failure.
    pub fn write_row(&mut self, time: f64, values: &[f64]) -> Result<(), HookError> {
        use std::fmt::Write as _;

        self.line.clear();
        let tp = self.format.time_precision;
        // Writing into a String cannot fail.
        let _ = write!(self.line, "{time:.tp$}");
        for v in values {
            self.line.push('\t');
            self.line
                .push_str(&format_scientific(*v, self.format.precision));
        }
        self.line.push('\n');
        self.writer
            .write_all(self.line.as_bytes())
            .map_err(|e| io_error(&self.path, e))
    }

    /// Flush buffered rows and close the file.
    ///
    /// # Errors
    ///
    /// [`HookError::Io`] if the final flush fails.
    pub fn close(mut self) -> Result<(), HookError> {
        self.writer.flush().map_err(|e| io_error(&self.path, e))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> HookError {
    HookError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
