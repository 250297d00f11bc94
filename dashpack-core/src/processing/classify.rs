//! Stream classification.
//!
//! Decides, per probed stream, whether it is converted, skipped on purpose
//! (cover art, fonts), or reported as unsupported, and turns convertible
//! streams into conversion jobs.

use std::path::PathBuf;

use crate::config::SkipSet;
use crate::media::{CodecType, StreamDescriptor};
use crate::pipeline::RunContext;

/// Rendition kinds the converter has settings for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

impl TrackKind {
    pub fn from_codec_type(codec_type: &CodecType) -> Option<Self> {
        match codec_type {
            CodecType::Video => Some(TrackKind::Video),
            CodecType::Audio => Some(TrackKind::Audio),
            CodecType::Subtitle => Some(TrackKind::Subtitle),
            CodecType::Other(_) => None,
        }
    }

    /// File extension of the transcoded rendition.
    pub fn extension(self) -> &'static str {
        match self {
            TrackKind::Video => "mp4",
            TrackKind::Audio => "m4a",
            TrackKind::Subtitle => "vtt",
        }
    }
}

/// One stream scheduled for transcoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub stream_index: i64,
    pub codec_type: CodecType,
    pub output_path: PathBuf,
}

/// Result of classifying one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Attachment-like stream, intentionally left out of the package.
    /// `matched` is the skip-set entry that caught it.
    Skip { matched: String },
    /// Stream to transcode
    Convert(ConversionJob),
    /// Codec type with no conversion settings; track-level, non-fatal
    Unsupported,
}

/// Returns the skip-set entry matching the stream's codec type or, failing
/// that, its codec name.
///
/// A `video` stream is only matched by codec name when it is an attached
/// picture; an MJPEG or PNG video track is real content.
fn skip_match(stream: &StreamDescriptor, skip_set: &SkipSet) -> Option<String> {
    if skip_set.contains(stream.codec_type.as_str()) {
        return Some(stream.codec_type.to_string());
    }
    if stream.codec_type == CodecType::Video && !stream.is_attached_pic() {
        return None;
    }
    stream
        .codec_name
        .as_deref()
        .filter(|name| skip_set.contains(name))
        .map(str::to_string)
}

/// Classifies `stream` against the skip set.
///
/// The skip set is consulted first, so a configured type is skipped even if
/// it would otherwise be convertible. Cover art is reported by ffprobe as a
/// `video` stream with codec name `mjpeg` or `png` and the `attached_pic`
/// disposition, which is why the codec name is matched as well.
pub fn classify_stream(
    stream: &StreamDescriptor,
    skip_set: &SkipSet,
    ctx: &RunContext,
) -> Classification {
    if let Some(matched) = skip_match(stream, skip_set) {
        return Classification::Skip { matched };
    }

    match TrackKind::from_codec_type(&stream.codec_type) {
        Some(kind) => Classification::Convert(ConversionJob {
            stream_index: stream.index,
            codec_type: stream.codec_type.clone(),
            output_path: ctx.track_output_path(stream.index, kind.extension()),
        }),
        None => Classification::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;

    fn ctx() -> RunContext {
        RunContext::new(&CoreConfig::new(PathBuf::from("/w")), "run")
    }

    #[test]
    fn convertible_types_get_codec_specific_paths() {
        let skip = SkipSet::default();
        let cases = [
            (StreamDescriptor::new(0, "video"), "/w/uploads/run/track_0.mp4"),
            (StreamDescriptor::new(1, "audio"), "/w/uploads/run/track_1.m4a"),
            (StreamDescriptor::new(2, "subtitle"), "/w/uploads/run/track_2.vtt"),
        ];
        for (stream, expected) in cases {
            match classify_stream(&stream, &skip, &ctx()) {
                Classification::Convert(job) => {
                    assert_eq!(job.stream_index, stream.index);
                    assert_eq!(job.output_path, PathBuf::from(expected));
                }
                other => panic!("expected Convert, got {other:?}"),
            }
        }
    }

    #[test]
    fn attachment_types_are_skipped() {
        let skip = SkipSet::default();
        for codec in ["mjpeg", "ttf"] {
            let stream = StreamDescriptor::new(5, codec);
            assert_eq!(
                classify_stream(&stream, &skip, &ctx()),
                Classification::Skip {
                    matched: codec.to_string()
                }
            );
        }
    }

    #[test]
    fn cover_art_reported_as_video_is_skipped_by_codec_name() {
        let skip = SkipSet::default();
        let stream = StreamDescriptor::new(3, "video")
            .with_codec_name("mjpeg")
            .with_attached_pic();
        assert_eq!(
            classify_stream(&stream, &skip, &ctx()),
            Classification::Skip {
                matched: "mjpeg".to_string()
            }
        );

        let fonts = StreamDescriptor::new(4, "attachment").with_codec_name("ttf");
        assert!(matches!(
            classify_stream(&fonts, &skip, &ctx()),
            Classification::Skip { .. }
        ));
    }

    #[test]
    fn mjpeg_video_track_without_attached_pic_is_converted() {
        let skip = SkipSet::default();
        for codec in ["mjpeg", "png"] {
            let stream = StreamDescriptor::new(0, "video").with_codec_name(codec);
            assert!(
                matches!(
                    classify_stream(&stream, &skip, &ctx()),
                    Classification::Convert(_)
                ),
                "{codec} video track should be converted"
            );
        }
    }

    #[test]
    fn unknown_type_is_unsupported_not_skipped() {
        let skip = SkipSet::default();
        let stream = StreamDescriptor::new(3, "data");
        assert_eq!(
            classify_stream(&stream, &skip, &ctx()),
            Classification::Unsupported
        );
    }

    #[test]
    fn skip_set_can_exclude_a_convertible_type() {
        let skip = SkipSet::parse("subtitle");
        let stream = StreamDescriptor::new(2, "subtitle").with_codec_name("subrip");
        assert_eq!(
            classify_stream(&stream, &skip, &ctx()),
            Classification::Skip {
                matched: "subtitle".to_string()
            }
        );
    }
}
