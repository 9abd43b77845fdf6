//! Listener dispatch
//!
//! Drives the decoder over a whole dump and hands each in-range changeset to
//! every listener, in file order and registration order.

use log::{debug, error, info};

use super::seek::seek_date;
use crate::changeset::{Changeset, Decoder, Step};
use crate::error::DecodeError;
use crate::listener::ChangesetListener;

/// Run configuration
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Inclusive lower bound on `date`; empty means from the beginning
    pub start_date: String,
    /// Binary-search to the start date before scanning
    pub seek: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            start_date: String::new(),
            seek: true,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = date.into();
        self
    }

    pub fn with_seek(mut self, seek: bool) -> Self {
        self.seek = seek;
        self
    }
}

/// Counters from a successful run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Changesets decoded, including ones before the start date
    pub decoded: u64,
    /// Changesets handed to listeners
    pub dispatched: u64,
    /// Byte offset the decode loop started from
    pub start_offset: usize,
}

/// Ordered set of listeners fed from one dump
#[derive(Default)]
pub struct Dispatcher<'l> {
    listeners: Vec<&'l mut dyn ChangesetListener>,
    options: DecodeOptions,
}

impl<'l> Dispatcher<'l> {
    pub fn new(options: DecodeOptions) -> Self {
        Dispatcher {
            listeners: Vec::new(),
            options,
        }
    }

    /// Register a listener; it is called after those already registered
    pub fn add_listener(&mut self, listener: &'l mut dyn ChangesetListener) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode `input` and feed every listener
    pub fn run(&mut self, input: &[u8]) -> Result<DecodeSummary, DecodeError> {
        dispatch(input, &self.options, &mut self.listeners)
    }
}

/// Decode `input`, feeding changesets dated `>= start_date` to `listeners`
pub fn decode(
    input: &[u8],
    start_date: &str,
    listeners: &mut [&mut dyn ChangesetListener],
) -> Result<DecodeSummary, DecodeError> {
    let options = DecodeOptions::new().with_start_date(start_date);
    dispatch(input, &options, listeners)
}

fn dispatch(
    input: &[u8],
    options: &DecodeOptions,
    listeners: &mut [&mut dyn ChangesetListener],
) -> Result<DecodeSummary, DecodeError> {
    for listener in listeners.iter_mut() {
        listener.initialize();
    }

    if input.iter().all(u8::is_ascii_whitespace) {
        debug!("empty input, nothing to decode");
        for listener in listeners.iter_mut() {
            listener.finalize();
        }
        return Ok(DecodeSummary::default());
    }

    let mut decoder = Decoder::new(input);
    decoder.skip_header();
    debug!("header ends at byte {}", decoder.position());

    let start_date = options.start_date.as_str();
    if !start_date.is_empty() && options.seek {
        let offset = seek_date(input, decoder.position(), input.len(), start_date);
        debug!("seek to {start_date} landed at byte {offset}");
        decoder.seek_to(offset);
    }

    let mut summary = DecodeSummary {
        start_offset: decoder.position(),
        ..DecodeSummary::default()
    };
    let mut record = Changeset::default();
    loop {
        match decoder.decode_next(&mut record) {
            Ok(Step::Changeset) => {
                summary.decoded += 1;
                if record.date.as_str() >= start_date {
                    summary.dispatched += 1;
                    for listener in listeners.iter_mut() {
                        listener.process(&record);
                    }
                }
            }
            Ok(Step::EndOfStream) => break,
            Err(e) => {
                error!("decode aborted after {} changesets: {e}", summary.decoded);
                return Err(e);
            }
        }
    }

    for listener in listeners.iter_mut() {
        listener.finalize();
    }
    info!(
        "decoded {} changesets, dispatched {}",
        summary.decoded, summary.dispatched
    );
    Ok(summary)
}
