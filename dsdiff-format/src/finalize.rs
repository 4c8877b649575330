//! Values derived once the whole stream has been walked.

use crate::metadata::{keys, MetadataSink, StreamKind};

/// Oversampling ratios relative to 44.1 or 48 kHz, tried in order.
const MULTIPLIERS: [u32; 4] = [64, 128, 256, 512];

/// Play time of uncompressed DSD data: one bit per sample per channel.
pub fn duration_seconds(stream_size: u64, channels: u16, sampling_rate: u32) -> Option<f64> {
    if stream_size == 0 || channels == 0 || sampling_rate == 0 {
        return None;
    }
    Some(stream_size as f64 * 8.0 / channels as f64 / sampling_rate as f64)
}

/// `DSD64`, `DSD128`, ... for the usual DSD rates.
pub fn commercial_label(sampling_rate: u32) -> Option<String> {
    MULTIPLIERS
        .iter()
        .find(|&&m| matches!(sampling_rate / m, 44100 | 48000))
        .map(|m| format!("DSD{}", m))
}

pub fn finalize<S: MetadataSink + ?Sized>(sink: &mut S) {
    let stream_size: u64 = retrieve(sink, keys::STREAM_SIZE).unwrap_or(0);
    let sampling_rate: u32 = retrieve(sink, keys::SAMPLING_RATE).unwrap_or(0);
    let channels: u16 = retrieve(sink, keys::CHANNELS).unwrap_or(0);

    if let Some(duration) = duration_seconds(stream_size, channels, sampling_rate) {
        sink.fill(StreamKind::Audio, keys::DURATION, format!("{:.3}", duration));
    }

    if let Some(label) = commercial_label(sampling_rate) {
        sink.fill(StreamKind::Audio, keys::FORMAT_COMMERCIAL, label);
    }

    tracing::debug!(stream_size, sampling_rate, channels, "finalized audio stream");
}

fn retrieve<T: std::str::FromStr, S: MetadataSink + ?Sized>(sink: &S, key: &str) -> Option<T> {
    sink.retrieve(StreamKind::Audio, key)?.parse().ok()
}
