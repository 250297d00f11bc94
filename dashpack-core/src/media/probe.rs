// ============================================================================
// dashpack-core/src/media/probe.rs
// ============================================================================
//
// PROBER: Container Stream Inspection via ffprobe
//
// This module runs ffprobe against the input container and turns its JSON
// output into StreamDescriptor values. The raw output is persisted so the
// packaging stage can read stream metadata again without re-probing.
//
// KEY COMPONENTS:
// - StreamDescriptor / CodecType / StreamTags: typed view of one stream
// - ProbeData: the `streams` array of the probe output
// - probe_streams: run ffprobe, parse, persist
// - load_probe_data: read previously persisted probe output
//
// AI-ASSISTANT-INFO: ffprobe invocation and stream metadata parsing

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult, describe_exit};
use crate::external::{ProcessRunner, stderr_summary};

// ---- External crate imports ----
use serde::{Deserialize, Serialize};

// ---- Standard library imports ----
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// STREAM TYPES
// ============================================================================

/// Stream category as reported in ffprobe's `codec_type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    /// Anything else, kept verbatim (e.g. `attachment`, `data`, `mjpeg`)
    Other(String),
}

impl CodecType {
    pub fn as_str(&self) -> &str {
        match self {
            CodecType::Video => "video",
            CodecType::Audio => "audio",
            CodecType::Subtitle => "subtitle",
            CodecType::Other(raw) => raw,
        }
    }
}

impl From<String> for CodecType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            _ => CodecType::Other(raw),
        }
    }
}

impl From<&str> for CodecType {
    fn from(raw: &str) -> Self {
        CodecType::from(raw.to_string())
    }
}

impl From<CodecType> for String {
    fn from(codec_type: CodecType) -> Self {
        codec_type.as_str().to_string()
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stream tags the pipeline reads. Other tags are ignored.
///
/// Matroska files may carry both a track property (`title`) and a SimpleTag
/// of the same name in upper case (`TITLE`), so the tags object is read as a
/// plain map and the lower-case key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>")]
pub struct StreamTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl From<HashMap<String, String>> for StreamTags {
    fn from(mut raw: HashMap<String, String>) -> Self {
        let mut take = |key: &str| match raw.remove(key) {
            Some(value) => Some(value),
            None => raw.remove(&key.to_ascii_uppercase()),
        };
        Self {
            title: take("title"),
            language: take("language"),
        }
    }
}

/// Subset of ffprobe's per-stream `disposition` flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDisposition {
    /// 1 when the stream is an attached picture (cover art)
    #[serde(default)]
    pub attached_pic: i64,
}

/// One stream of the probed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Container-assigned index, unique within one probe result
    pub index: i64,
    #[serde(default = "unknown_codec_type")]
    pub codec_type: CodecType,
    /// Decoder name, e.g. `mjpeg` for embedded cover art
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub tags: StreamTags,
    #[serde(default)]
    pub disposition: StreamDisposition,
}

fn unknown_codec_type() -> CodecType {
    CodecType::Other(String::new())
}

impl StreamDescriptor {
    pub fn new(index: i64, codec_type: impl Into<CodecType>) -> Self {
        Self {
            index,
            codec_type: codec_type.into(),
            codec_name: None,
            tags: StreamTags::default(),
            disposition: StreamDisposition::default(),
        }
    }

    /// True when ffprobe flags the stream as an attached picture.
    pub fn is_attached_pic(&self) -> bool {
        self.disposition.attached_pic == 1
    }

    pub fn with_attached_pic(mut self) -> Self {
        self.disposition.attached_pic = 1;
        self
    }

    pub fn with_codec_name(mut self, codec_name: &str) -> Self {
        self.codec_name = Some(codec_name.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.tags.title = Some(title.to_string());
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.tags.language = Some(language.to_string());
        self
    }
}

/// Parsed probe output. Only the `streams` array is retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeData {
    pub streams: Vec<StreamDescriptor>,
}

impl ProbeData {
    /// Parses probe JSON and checks that stream indices are unique.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let data: ProbeData = serde_json::from_str(json)?;

        let mut seen = HashSet::new();
        if let Some(dup) = data.streams.iter().find(|s| !seen.insert(s.index)) {
            return Err(CoreError::ProbeFailure(format!(
                "duplicate stream index {} in probe output",
                dup.index
            )));
        }

        Ok(data)
    }

    /// Finds the stream with the given container index.
    pub fn find_stream(&self, index: i64) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.index == index)
    }
}

// ============================================================================
// PROBE OPERATIONS
// ============================================================================

/// Builds the ffprobe argument list for `input`.
pub fn probe_args(input: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_streams".to_string(),
        "-show_format".to_string(),
        input.to_string_lossy().into_owned(),
    ]
}

/// Runs ffprobe against `input`, persists its raw output to `probe_path`,
/// and returns the parsed stream list.
///
/// Every failure (spawn error, non-zero exit, unparsable output, write
/// error) is reported as `CoreError::ProbeFailure`.
pub fn probe_streams<R: ProcessRunner>(
    runner: &R,
    ffprobe_path: &Path,
    input: &Path,
    probe_path: &Path,
) -> CoreResult<ProbeData> {
    log::debug!("Probing streams of {}", input.display());

    let output = runner
        .run(ffprobe_path, &probe_args(input))
        .map_err(|e| CoreError::ProbeFailure(e.to_string()))?;

    if !output.success() {
        return Err(CoreError::ProbeFailure(format!(
            "ffprobe failed with {}: {}",
            describe_exit(output.code),
            stderr_summary(&output)
        )));
    }

    let data = ProbeData::from_json(&output.stdout).map_err(|e| match e {
        CoreError::ProbeFailure(_) => e,
        other => CoreError::ProbeFailure(format!("unparsable ffprobe output: {other}")),
    })?;

    if let Some(parent) = probe_path.parent() {
        fs::create_dir_all(parent).map_err(|e| persist_error(probe_path, e))?;
    }
    fs::write(probe_path, &output.stdout).map_err(|e| persist_error(probe_path, e))?;

    log::debug!(
        "Probed {} stream(s); probe data written to {}",
        data.streams.len(),
        probe_path.display()
    );
    Ok(data)
}

/// Reads probe output previously persisted by `probe_streams`.
pub fn load_probe_data(probe_path: &Path) -> CoreResult<ProbeData> {
    let json = fs::read_to_string(probe_path).map_err(|e| {
        CoreError::ProbeFailure(format!(
            "failed to read probe data {}: {e}",
            probe_path.display()
        ))
    })?;
    ProbeData::from_json(&json).map_err(|e| match e {
        CoreError::ProbeFailure(_) => e,
        other => CoreError::ProbeFailure(format!(
            "invalid probe data {}: {other}",
            probe_path.display()
        )),
    })
}

fn persist_error(path: &Path, err: std::io::Error) -> CoreError {
    CoreError::ProbeFailure(format!(
        "failed to write probe data {}: {err}",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_name": "h264", "codec_type": "video", "tags": {}},
            {"index": 1, "codec_type": "audio", "tags": {"language": "eng", "title": "Commentary"}},
            {"index": 2, "codec_type": "subtitle", "tags": {"LANGUAGE": "fre"}},
            {"index": 3, "codec_type": "attachment"},
            {"index": 4, "codec_type": "mjpeg", "tags": {}}
        ],
        "format": {"filename": "in.mkv"}
    }"#;

    #[test]
    fn parses_streams_and_tags() {
        let data = ProbeData::from_json(SAMPLE).unwrap();
        assert_eq!(data.streams.len(), 5);
        assert_eq!(data.streams[0].codec_type, CodecType::Video);
        assert_eq!(data.streams[1].tags.title.as_deref(), Some("Commentary"));
        assert_eq!(data.streams[1].tags.language.as_deref(), Some("eng"));
        assert_eq!(data.streams[2].tags.language.as_deref(), Some("fre"));
        assert_eq!(data.streams[3].tags, StreamTags::default());
        assert_eq!(data.streams[4].codec_type, CodecType::Other("mjpeg".to_string()));
    }

    #[test]
    fn tags_present_in_both_cases_are_accepted() {
        let json = r#"{"streams":[{"index":0,"codec_type":"audio","tags":{"title":"Main","TITLE":"Main (SimpleTag)","LANGUAGE":"ger","language":"deu","DURATION":"01:00:00"}}]}"#;
        let data = ProbeData::from_json(json).unwrap();
        assert_eq!(data.streams[0].tags.title.as_deref(), Some("Main"));
        assert_eq!(data.streams[0].tags.language.as_deref(), Some("deu"));
    }

    #[test]
    fn upper_case_tags_are_used_when_alone() {
        let json = r#"{"streams":[{"index":0,"codec_type":"audio","tags":{"TITLE":"Director"}}]}"#;
        let data = ProbeData::from_json(json).unwrap();
        assert_eq!(data.streams[0].tags.title.as_deref(), Some("Director"));
        assert_eq!(data.streams[0].tags.language, None);
    }

    #[test]
    fn attached_pic_disposition_is_parsed() {
        let json = r#"{"streams":[
            {"index":0,"codec_type":"video","codec_name":"h264","disposition":{"default":1,"attached_pic":0}},
            {"index":1,"codec_type":"video","codec_name":"mjpeg","disposition":{"default":0,"attached_pic":1}}
        ]}"#;
        let data = ProbeData::from_json(json).unwrap();
        assert!(!data.streams[0].is_attached_pic());
        assert!(data.streams[1].is_attached_pic());
    }

    #[test]
    fn rejects_duplicate_indices() {
        let json = r#"{"streams":[{"index":0,"codec_type":"video"},{"index":0,"codec_type":"audio"}]}"#;
        assert!(matches!(
            ProbeData::from_json(json),
            Err(CoreError::ProbeFailure(_))
        ));
    }

    #[test]
    fn missing_streams_array_is_an_error() {
        assert!(ProbeData::from_json(r#"{"format":{}}"#).is_err());
    }

    #[test]
    fn find_stream_matches_index_not_position() {
        let json = r#"{"streams":[{"index":5,"codec_type":"audio"},{"index":2,"codec_type":"video"}]}"#;
        let data = ProbeData::from_json(json).unwrap();
        assert_eq!(data.find_stream(2).map(|s| &s.codec_type), Some(&CodecType::Video));
        assert!(data.find_stream(1).is_none());
    }

    #[test]
    fn codec_type_round_trips_through_strings() {
        assert_eq!(String::from(CodecType::from("subtitle")), "subtitle");
        assert_eq!(CodecType::from("ttf").as_str(), "ttf");
    }

    #[test]
    fn probe_args_end_with_input() {
        let args = probe_args(Path::new("movie.mkv"));
        assert_eq!(args.last().map(String::as_str), Some("movie.mkv"));
        assert!(args.contains(&"-show_streams".to_string()));
    }
}
