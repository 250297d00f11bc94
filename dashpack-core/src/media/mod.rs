//! Media inspection.
//!
//! Wraps ffprobe and exposes the stream metadata the rest of the pipeline
//! consumes.

pub mod probe;

pub use probe::{
    CodecType, ProbeData, StreamDescriptor, StreamDisposition, StreamTags, load_probe_data,
    probe_streams,
};
