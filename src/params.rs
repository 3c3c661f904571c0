//! Run parameters for the time-shared computer model.
//!
//! Parameters are read from a properties-style text file: one `key=value` (or `key: value`, or `key value`) pair
//! per line, with `#` or `!` starting a comment line. Keys that are absent keep their defaults; anything present must
//! be a recognized key with a valid value, otherwise loading fails before any simulation state exists.

use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Problems found while loading parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read parameter file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: unknown parameter `{key}`")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: parameter `{key}` has no value")]
    MissingValue { line: usize, key: String },
    #[error("line {line}: cannot parse `{value}` for parameter `{key}`")]
    Malformed { line: usize, key: String, value: String },
    #[error("parameter `{key}` {reason}")]
    OutOfRange { key: &'static str, reason: &'static str },
}

pub const NUM_TERMINALS: &str = "num.terminals";
pub const MEAN_THINK_TIME: &str = "mean.think.time";
pub const MEAN_SERVICE_TIME: &str = "mean.service.time";
pub const SERVICE_QUANTUM_TIME: &str = "service.quantum.time";
pub const SWAP_TIME: &str = "swap.time";
pub const NUM_REQUIRED_JOBS: &str = "num.required.jobs";
pub const END_SIMULATION_TIME: &str = "end.simulation.time";
pub const OUT_FILE_PATH: &str = "out.file.path";

/// Immutable parameter set for one run of the time-shared computer.
///
/// Built by [`SimParams::parse()`] or [`SimParams::load()`], or from [`Default`] plus the `with_*` adjusters. The
/// model only reads it through the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    terminals: usize,
    mean_think_time: f64,
    mean_service_time: f64,
    quantum: f64,
    swap: f64,
    required_jobs: u64,
    end_simulation_time: f64,
    out_file_path: PathBuf,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            terminals: 30,
            mean_think_time: 25.0,
            mean_service_time: 0.8,
            quantum: 0.1,
            swap: 0.015,
            required_jobs: 1_000,
            end_simulation_time: 3_600_000.0,
            out_file_path: PathBuf::from("cpu_time_shared_out.txt"),
        }
    }
}

impl SimParams {
    /// Read and parse a parameter file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise anything [`parse()`] reports.
    ///
    /// [`parse()`]: SimParams::parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse parameter text, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Unknown keys, keys without values, unparsable values, and values outside their valid range.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut params = Self::default();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let (key, value) = split_entry(trimmed);
            if value.is_empty() {
                return Err(ConfigError::MissingValue {
                    line,
                    key: key.to_owned(),
                });
            }

            match key {
                NUM_TERMINALS => params.terminals = parse_value(line, key, value)?,
                MEAN_THINK_TIME => params.mean_think_time = parse_value(line, key, value)?,
                MEAN_SERVICE_TIME => params.mean_service_time = parse_value(line, key, value)?,
                SERVICE_QUANTUM_TIME => params.quantum = parse_value(line, key, value)?,
                SWAP_TIME => params.swap = parse_value(line, key, value)?,
                NUM_REQUIRED_JOBS => params.required_jobs = parse_value(line, key, value)?,
                END_SIMULATION_TIME => params.end_simulation_time = parse_value(line, key, value)?,
                OUT_FILE_PATH => params.out_file_path = PathBuf::from(value),
                _ => {
                    return Err(ConfigError::UnknownKey {
                        line,
                        key: key.to_owned(),
                    })
                },
            }
        }

        params.validate()?;
        Ok(params)
    }

    /// Check every value against the range the model can work with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::OutOfRange`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(MEAN_THINK_TIME, self.mean_think_time)?;
        positive(MEAN_SERVICE_TIME, self.mean_service_time)?;
        positive(SERVICE_QUANTUM_TIME, self.quantum)?;
        positive(END_SIMULATION_TIME, self.end_simulation_time)?;
        if !(self.swap.is_finite() && self.swap >= 0.0) {
            return Err(ConfigError::OutOfRange {
                key: SWAP_TIME,
                reason: "must be a finite, non-negative number",
            });
        }
        if self.required_jobs == 0 {
            return Err(ConfigError::OutOfRange {
                key: NUM_REQUIRED_JOBS,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub fn terminals(&self) -> usize {
        self.terminals
    }

    pub fn mean_think_time(&self) -> f64 {
        self.mean_think_time
    }

    pub fn mean_service_time(&self) -> f64 {
        self.mean_service_time
    }

    /// Longest CPU slice a job gets before it is preempted.
    pub fn quantum(&self) -> f64 {
        self.quantum
    }

    /// Context-switch cost charged after every slice.
    pub fn swap(&self) -> f64 {
        self.swap
    }

    pub fn required_jobs(&self) -> u64 {
        self.required_jobs
    }

    pub fn end_simulation_time(&self) -> f64 {
        self.end_simulation_time
    }

    pub fn out_file_path(&self) -> &Path {
        &self.out_file_path
    }

    pub fn with_terminals(mut self, terminals: usize) -> Self {
        self.terminals = terminals;
        self
    }

    pub fn with_mean_think_time(mut self, mean: f64) -> Self {
        self.mean_think_time = mean;
        self
    }

    pub fn with_mean_service_time(mut self, mean: f64) -> Self {
        self.mean_service_time = mean;
        self
    }

    pub fn with_quantum(mut self, quantum: f64) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn with_swap(mut self, swap: f64) -> Self {
        self.swap = swap;
        self
    }

    pub fn with_required_jobs(mut self, jobs: u64) -> Self {
        self.required_jobs = jobs;
        self
    }

    pub fn with_end_simulation_time(mut self, time: f64) -> Self {
        self.end_simulation_time = time;
        self
    }

    pub fn with_out_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_file_path = path.into();
        self
    }
}

// properties syntax: the key ends at the first '=', ':' or whitespace
fn split_entry(line: &str) -> (&str, &str) {
    match line.find(|c: char| c == '=' || c == ':' || c.is_whitespace()) {
        Some(at) => {
            let key = &line[..at];
            let rest = line[at..].trim_start();
            let rest = rest
                .strip_prefix('=')
                .or_else(|| rest.strip_prefix(':'))
                .unwrap_or(rest);
            (key, rest.trim())
        },
        None => (line, ""),
    }
}

fn parse_value<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Malformed {
        line,
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

fn positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            reason: "must be a finite, positive number",
        })
    }
}
