// ============================================================================
// dashpack-core/src/packaging/command.rs
// ============================================================================
//
// PACKAGER COMMAND BUILDER: Manifest + Probe Data -> Packager Invocation
//
// This module joins the conversion manifest with the original probe data to
// build a single shaka packager invocation. Each converted track becomes one
// stream descriptor of the form
//
//   in=<path>,stream=<video|audio|text>,output=<path>[,language=<lang>,dash_label=<label>]
//
// and the invocation asks for a static MPD alongside the segmented output.
//
// AI-ASSISTANT-INFO: Packager argument building from conversion results

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::media::{CodecType, ProbeData, StreamDescriptor};
use crate::pipeline::RunContext;
use crate::processing::ConversionManifest;

// ---- Standard library imports ----
use std::fmt;
use std::path::{Path, PathBuf};

/// Language and label used when a stream carries no tags.
pub const UNDETERMINED: &str = "und";

/// Role of a rendition in the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRole {
    Video,
    Audio,
    Text,
}

impl StreamRole {
    pub fn from_codec_type(codec_type: &CodecType) -> Option<Self> {
        match codec_type {
            CodecType::Video => Some(StreamRole::Video),
            CodecType::Audio => Some(StreamRole::Audio),
            CodecType::Subtitle => Some(StreamRole::Text),
            CodecType::Other(_) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StreamRole::Video => "video",
            StreamRole::Audio => "audio",
            StreamRole::Text => "text",
        }
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendition handed to the packager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingEntry {
    pub input_path: PathBuf,
    pub role: StreamRole,
    pub output_path: PathBuf,
    pub language: String,
    pub label: String,
}

impl PackagingEntry {
    /// Formats the packager stream descriptor. Video descriptors carry only
    /// input and output.
    pub fn descriptor(&self) -> String {
        let mut descriptor = format!(
            "in={},stream={},output={}",
            self.input_path.display(),
            self.role,
            self.output_path.display()
        );
        if self.role != StreamRole::Video {
            descriptor.push_str(&format!(
                ",language={},dash_label={}",
                descriptor_value(&self.language),
                descriptor_value(&self.label)
            ));
        }
        descriptor
    }
}

/// Commas separate descriptor fields, so they cannot appear inside a value.
fn descriptor_value(value: &str) -> String {
    value.replace(',', " ")
}

/// A fully built packager invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerCommand {
    pub program: PathBuf,
    pub mpd_path: PathBuf,
    pub entries: Vec<PackagingEntry>,
}

impl PackagerCommand {
    /// Argument list: MPD flags followed by one descriptor per rendition.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--generate_static_live_mpd".to_string(),
            "--mpd_output".to_string(),
            self.mpd_path.to_string_lossy().into_owned(),
        ];
        args.extend(self.entries.iter().map(PackagingEntry::descriptor));
        args
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// Language tag of a stream, or `und`.
pub fn stream_language(stream: &StreamDescriptor) -> String {
    non_empty(stream.tags.language.as_ref())
        .unwrap_or(UNDETERMINED)
        .to_string()
}

/// Human-readable label: title, then language, then `und`.
pub fn stream_label(stream: &StreamDescriptor) -> String {
    non_empty(stream.tags.title.as_ref())
        .or_else(|| non_empty(stream.tags.language.as_ref()))
        .unwrap_or(UNDETERMINED)
        .to_string()
}

/// Builds the packager invocation for every manifest entry.
///
/// Fails with `MissingStreamMetadata` when an entry has no probe descriptor
/// with the same index. Entries whose stream has no packaging role are
/// logged and left out.
pub fn build_packager_command(
    packager_path: &Path,
    manifest: &ConversionManifest,
    probe: &ProbeData,
    ctx: &RunContext,
) -> CoreResult<PackagerCommand> {
    let mut entries = Vec::with_capacity(manifest.len());

    for converted in &manifest.streams {
        let stream = probe
            .find_stream(converted.index)
            .ok_or(CoreError::MissingStreamMetadata {
                index: converted.index,
            })?;

        let Some(role) = StreamRole::from_codec_type(&stream.codec_type) else {
            log::warn!(
                "Stream {} has codec type '{}' with no packaging role; leaving it out",
                stream.index,
                stream.codec_type
            );
            continue;
        };

        entries.push(PackagingEntry {
            input_path: converted.output_file.clone(),
            role,
            output_path: ctx.package_path_for(&converted.output_file),
            language: stream_language(stream),
            label: stream_label(stream),
        });
    }

    Ok(PackagerCommand {
        program: packager_path.to_path_buf(),
        mpd_path: ctx.mpd_path.clone(),
        entries,
    })
}
