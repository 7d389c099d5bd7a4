use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::model::series::{Channel, RunDataset, RunKind, SampleSeries};

pub const TIME_COLUMN: &str = "Time (s)";

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("{file}: IO error: {error}")]
    Io {
        file: String,
        #[source]
        error: std::io::Error,
    },
    #[error("{file}: CSV error: {error}")]
    Csv {
        file: String,
        #[source]
        error: csv::Error,
    },
    #[error("{file}: missing column '{column}' (found: {found})")]
    MissingColumn {
        file: String,
        column: &'static str,
        found: String,
    },
    #[error("{file}: line {line}: column '{column}' has non-numeric value '{value}'")]
    NonNumeric {
        file: String,
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("{file}: line {line}: time {time} goes backwards (previous {previous})")]
    NonMonotonicTime {
        file: String,
        line: u64,
        time: f64,
        previous: f64,
    },
}

/// Required columns for each run. Idle runs carry no metered channel.
pub fn required_channels(kind: RunKind) -> &'static [Channel] {
    match kind {
        RunKind::MaxRpm => &[Channel::Unmetered, Channel::Metered],
        RunKind::IdleRpm => &[Channel::Unmetered],
    }
}

pub fn load_run(path: &Path, kind: RunKind) -> Result<RunDataset, InputError> {
    let file_label = path.display().to_string();
    let file = File::open(path).map_err(|error| InputError::Io {
        file: file_label.clone(),
        error,
    })?;
    let run = read_run(file, &file_label, kind)?;
    tracing::info!(
        "loaded {} run: file={}, samples={}",
        kind.label(),
        file_label,
        run.n_samples()
    );
    Ok(run)
}

pub fn read_run<R: Read>(reader: R, file: &str, kind: RunKind) -> Result<RunDataset, InputError> {
    let csv_err = |error: csv::Error| InputError::Csv {
        file: file.to_string(),
        error,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let time_idx = column_index(&headers, TIME_COLUMN, file)?;
    let mut channel_idx = Vec::new();
    for &channel in required_channels(kind) {
        channel_idx.push((channel, column_index(&headers, channel.column(), file)?));
    }

    let mut time = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); channel_idx.len()];
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let t = parse_cell(&record, time_idx, TIME_COLUMN, file, line)?;
        if let Some(&previous) = time.last() {
            if t < previous {
                return Err(InputError::NonMonotonicTime {
                    file: file.to_string(),
                    line,
                    time: t,
                    previous,
                });
            }
        }
        time.push(t);
        for (slot, &(channel, idx)) in channel_idx.iter().enumerate() {
            values[slot].push(parse_cell(&record, idx, channel.column(), file, line)?);
        }
    }

    let mut unmetered = None;
    let mut metered = None;
    for ((channel, _), series) in channel_idx.into_iter().zip(values) {
        match channel {
            Channel::Unmetered => unmetered = Some(SampleSeries::new(channel, series)),
            Channel::Metered => metered = Some(SampleSeries::new(channel, series)),
        }
    }

    Ok(RunDataset {
        kind,
        source: file.to_string(),
        time,
        unmetered: unmetered.unwrap_or_else(|| SampleSeries::new(Channel::Unmetered, Vec::new())),
        metered,
    })
}

fn column_index(
    headers: &csv::StringRecord,
    column: &'static str,
    file: &str,
) -> Result<usize, InputError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| InputError::MissingColumn {
            file: file.to_string(),
            column,
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    file: &str,
    line: u64,
) -> Result<f64, InputError> {
    let raw = record.get(idx).unwrap_or("");
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(InputError::NonNumeric {
            file: file.to_string(),
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
