// dashpack-core/tests/package_from_artifacts_tests.rs

mod common;

use common::{Harness, RUN_ID};
use dashpack_core::pipeline::{PipelineResult, RunContext, package_from_artifacts};
use dashpack_core::processing::{ConversionManifest, ConversionOutcome};
use std::fs;

fn write_artifacts(h: &Harness, probe_json: &str, indices: &[(i64, &str)]) {
    fs::create_dir_all(&h.config.work_dir).unwrap();
    fs::write(&h.ctx.probe_path, probe_json).unwrap();
    let manifest = ConversionManifest {
        streams: indices
            .iter()
            .map(|(index, ext)| ConversionOutcome {
                index: *index,
                output_file: h.ctx.track_output_path(*index, ext),
            })
            .collect(),
    };
    manifest.write(&h.ctx.manifest_path).unwrap();
}

#[test]
fn test_packages_existing_run_without_transcoding() {
    let h = Harness::new();
    write_artifacts(
        &h,
        r#"{"streams":[{"index":0,"codec_type":"video"},{"index":1,"codec_type":"audio","tags":{"language":"fr","title":"Francais"}}]}"#,
        &[(0, "mp4"), (1, "m4a")],
    );
    h.runner.add_success_expectation("--generate_static_live_mpd", "", false);

    let result = package_from_artifacts(&h.runner, &h.config, RUN_ID, &h.dispatcher);

    assert_eq!(
        result,
        PipelineResult::Success {
            output_dir: h.config.work_dir.join("output").join(RUN_ID)
        }
    );
    assert_eq!(h.runner.call_count(), 1);
    let descriptors = h.descriptors();
    assert!(descriptors[1].ends_with("language=fr,dash_label=Francais"));
    assert!(h.recorder.has_log("Packaging completed successfully."));
    assert!(h.ctx.package_dir.is_dir());
}

#[test]
fn test_missing_stream_metadata_prevents_packager_call() {
    let h = Harness::new();
    write_artifacts(
        &h,
        r#"{"streams":[{"index":0,"codec_type":"video"}]}"#,
        &[(0, "mp4"), (3, "m4a")],
    );

    let result = package_from_artifacts(&h.runner, &h.config, RUN_ID, &h.dispatcher);

    assert_eq!(
        result.error_message(),
        Some("No stream metadata found for stream index 3")
    );
    assert_eq!(h.runner.call_count(), 0);
    assert!(h.recorder.has_log(
        "Error during packaging: No stream metadata found for stream index 3"
    ));
}

#[test]
fn test_untagged_streams_are_labelled_und() {
    let h = Harness::new();
    write_artifacts(
        &h,
        r#"{"streams":[{"index":0,"codec_type":"audio","tags":{}},{"index":1,"codec_type":"subtitle"}]}"#,
        &[(0, "m4a"), (1, "vtt")],
    );
    h.runner.add_success_expectation("--generate_static_live_mpd", "", false);

    let result = package_from_artifacts(&h.runner, &h.config, RUN_ID, &h.dispatcher);

    assert!(result.is_success());
    for descriptor in h.descriptors() {
        assert!(
            descriptor.ends_with("language=und,dash_label=und"),
            "unexpected descriptor {descriptor}"
        );
    }
}

#[test]
fn test_missing_artifacts_are_invalid_input() {
    let h = Harness::new();

    let result = package_from_artifacts(&h.runner, &h.config, RUN_ID, &h.dispatcher);

    assert!(
        result
            .error_message()
            .unwrap()
            .starts_with("Conversion manifest not found:")
    );
    assert_eq!(h.runner.call_count(), 0);
}

#[test]
fn test_manifest_from_another_run_is_rejected() {
    let h = Harness::new();
    let later_run = RunContext::new(&h.config, "20990101000000");
    fs::create_dir_all(&h.config.work_dir).unwrap();
    fs::write(&h.ctx.probe_path, r#"{"streams":[{"index":0,"codec_type":"video"}]}"#).unwrap();
    ConversionManifest {
        streams: vec![ConversionOutcome {
            index: 0,
            output_file: later_run.track_output_path(0, "mp4"),
        }],
    }
    .write(&h.ctx.manifest_path)
    .unwrap();

    let result = package_from_artifacts(&h.runner, &h.config, RUN_ID, &h.dispatcher);

    let message = result.error_message().unwrap();
    assert!(
        message.starts_with(&format!("Conversion manifest does not belong to run {RUN_ID}")),
        "unexpected error {message}"
    );
    assert_eq!(h.runner.call_count(), 0);
    assert!(!h.ctx.package_dir.exists());
    assert!(!later_run.package_dir.exists());
}
