//! A finite, pull-based PCM tone generator.
//!
//! The consumer hands in buffers of any size; the stream fills them with
//! interleaved frames in strict position order. Frames that straddle the end
//! of a caller buffer are finished in a small carry-over buffer and delivered
//! first on the next call, so the concatenated output never depends on how the
//! consumer chunks its requests.

use std::io;
use std::time::Duration;

use log::debug;

use crate::config::StreamConfig;

use super::format::SampleFormat;
use super::oscillator::Tone;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Outcome of a single [`WaveformStream::fill`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// Bytes written to the front of the caller's buffer.
    pub written: usize,
    /// No further bytes will ever be produced by this stream.
    pub end_of_stream: bool,
}

impl Fill {
    const END: Fill = Fill {
        written: 0,
        end_of_stream: true,
    };
}

/// Total byte length of a tone, floored to a multiple of 4.
pub fn byte_length(
    duration: Duration,
    channel_count: u16,
    format: SampleFormat,
    sample_rate: u32,
) -> u64 {
    let bytes_per_second =
        channel_count as u128 * format.bytes_per_sample() as u128 * sample_rate as u128;
    let len = bytes_per_second * duration.as_nanos() / NANOS_PER_SEC;
    let len = u64::try_from(len).unwrap_or(u64::MAX);
    len / 4 * 4
}

/// One finite tone generation session.
#[derive(Debug, Clone)]
pub struct WaveformStream {
    tone: Tone,
    total_len: u64,
    /// Bytes generated so far, including any still sitting in `pending`.
    cursor: u64,
    channel_count: u16,
    format: SampleFormat,
    /// Generated but undelivered bytes; always shorter than one frame.
    pending: Vec<u8>,
    /// Scratch space for the frame split across a caller boundary.
    frame: Vec<u8>,
}

impl WaveformStream {
    /// Create a stream of `duration` worth of sine at `frequency` Hz.
    ///
    /// A zero duration or zero channel count yields a stream that is
    /// exhausted from the start; [`StreamConfig::validate`] rejects zero
    /// channels for configured streams.
    pub fn new(
        frequency: f64,
        duration: Duration,
        channel_count: u16,
        format: SampleFormat,
        sample_rate: u32,
    ) -> Self {
        let total_len = byte_length(duration, channel_count, format, sample_rate);
        let frame_size = channel_count as usize * format.bytes_per_sample();
        debug!(
            "tone stream: {frequency} Hz, {total_len} bytes, {channel_count}ch {format} ({frame_size} B/frame)"
        );

        WaveformStream {
            tone: Tone::new(frequency, sample_rate as f64),
            total_len,
            cursor: 0,
            channel_count,
            format,
            pending: Vec::with_capacity(frame_size),
            frame: vec![0; frame_size],
        }
    }

    /// Create a stream using the rate, channel count and format of `config`.
    pub fn from_config(frequency: f64, duration: Duration, config: &StreamConfig) -> Self {
        Self::new(
            frequency,
            duration,
            config.channel_count,
            config.format,
            config.sample_rate,
        )
    }

    /// Fill the front of `buf` with the next bytes of the stream.
    ///
    /// Carry-over bytes from a previous call are always delivered first, on
    /// their own. The call that delivers the last byte reports
    /// `end_of_stream`, even when it writes fewer bytes than `buf` holds;
    /// every later call writes nothing and reports `end_of_stream` again.
    pub fn fill(&mut self, buf: &mut [u8]) -> Fill {
        if !self.pending.is_empty() {
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            return Fill {
                written: n,
                end_of_stream: false,
            };
        }

        if self.is_exhausted() {
            return Fill::END;
        }

        let remaining = self.total_len - self.cursor;
        let requested = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let end_of_stream = requested as u64 == remaining;

        let frame_size = self.frame_size();
        let whole = requested - requested % frame_size;
        let mut position = self.cursor / frame_size as u64;

        for out in buf[..whole].chunks_exact_mut(frame_size) {
            encode_frame(&self.tone, self.format, position, out);
            position += 1;
        }

        let mut generated = whole;
        if whole < requested {
            // The stream may end mid-frame; never generate past total_len.
            let frame_len = (remaining - whole as u64).min(frame_size as u64) as usize;
            encode_frame(&self.tone, self.format, position, &mut self.frame);

            let delivered = requested - whole;
            buf[whole..requested].copy_from_slice(&self.frame[..delivered]);
            self.pending
                .extend_from_slice(&self.frame[delivered..frame_len]);
            generated += frame_len;
        }

        self.cursor += generated as u64;

        if end_of_stream {
            debug!("tone stream at {} Hz exhausted", self.tone.frequency);
        }

        Fill {
            written: requested,
            end_of_stream,
        }
    }

    /// Total bytes this stream produces.
    pub fn total_length(&self) -> u64 {
        self.total_len
    }

    /// Bytes generated so far.
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Bytes not yet handed to the consumer.
    pub fn remaining(&self) -> u64 {
        self.total_len - self.cursor + self.pending.len() as u64
    }

    /// Bytes waiting in the carry-over buffer.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.total_len && self.pending.is_empty()
    }

    pub fn frame_size(&self) -> usize {
        self.channel_count as usize * self.format.bytes_per_sample()
    }

    pub fn frequency(&self) -> f64 {
        self.tone.frequency
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }
}

/// Encode the frame at `position` into `out`, one identical sample per channel.
fn encode_frame(tone: &Tone, format: SampleFormat, position: u64, out: &mut [u8]) {
    let (first, rest) = out.split_at_mut(format.bytes_per_sample());
    format.encode(tone.sample_at(position), first);
    for slot in rest.chunks_exact_mut(first.len()) {
        slot.copy_from_slice(first);
    }
}

impl io::Read for WaveformStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.fill(buf).written)
    }
}
