// ============================================================================
// dashpack-core/src/pipeline/orchestrator.rs
// ============================================================================
//
// ORCHESTRATOR: One Input File, End to End
//
// This module sequences the stages of a run and owns the reporting contract
// towards the caller.
//
// WORKFLOW:
// 1. Validate configuration and input path (no process is spawned on failure)
// 2. Probe the input and persist the probe data
// 3. Classify and convert every stream, one at a time in index order
// 4. Record the successful conversions in the conversion manifest
// 5. Build the packager invocation from the persisted artifacts
// 6. Run the packager
//
// Track-level failures (a failed transcode, an unsupported codec type) are
// logged and the run continues. Any stage-level failure ends the run with
// PipelineResult::Error. There is no retry anywhere.
//
// AI-ASSISTANT-INFO: Main pipeline orchestration

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::events::{EventDispatcher, RunEvents};
use crate::external::ProcessRunner;
use crate::media::{CodecType, ProbeData, StreamDescriptor, load_probe_data, probe_streams};
use crate::packaging::{build_packager_command, run_packager};
use crate::pipeline::{PipelineResult, PipelineState, RunContext};
use crate::processing::{
    Classification, ConversionManifest, TrackOutcome, classify_stream, convert_track,
};
use crate::utils::{display_name, has_extension};

// ---- Standard library imports ----
use std::fs;
use std::path::Path;

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Processes one input file in a new, timestamped run.
///
/// Blocks until the run reaches `Done` or `Error`. Events are delivered to
/// `dispatcher` on the calling thread, in order.
///
/// # Examples
///
/// ```rust,no_run
/// use dashpack_core::events::{CallbackHandler, EventDispatcher};
/// use dashpack_core::external::StdProcessRunner;
/// use dashpack_core::{CoreConfig, process_file};
/// use std::path::{Path, PathBuf};
/// use std::sync::Arc;
///
/// let config = CoreConfig::new(PathBuf::from("."));
/// let mut dispatcher = EventDispatcher::new();
/// dispatcher.add_handler(Arc::new(CallbackHandler::new(
///     |line| println!("{line}"),
///     |percent| println!("{percent}%"),
/// )));
///
/// let result = process_file(&StdProcessRunner, &config, Path::new("movie.mkv"), &dispatcher);
/// println!("{}", result.to_json());
/// ```
pub fn process_file<R: ProcessRunner>(
    runner: &R,
    config: &CoreConfig,
    input: &Path,
    dispatcher: &EventDispatcher,
) -> PipelineResult {
    let ctx = RunContext::for_new_run(config);
    process_file_with_context(runner, config, input, &ctx, dispatcher)
}

/// Processes one input file using the paths of an existing `RunContext`.
pub fn process_file_with_context<R: ProcessRunner>(
    runner: &R,
    config: &CoreConfig,
    input: &Path,
    ctx: &RunContext,
    dispatcher: &EventDispatcher,
) -> PipelineResult {
    let mut events = RunEvents::new(dispatcher);

    match run_all_stages(runner, config, input, ctx, &mut events) {
        Ok(()) => {
            events.enter(PipelineState::Done);
            events.log("Processing completed successfully.");
            PipelineResult::Success {
                output_dir: ctx.package_dir.clone(),
            }
        }
        Err(e) => fail(&mut events, e),
    }
}

/// Packages the artifacts of an earlier run without transcoding again.
///
/// Reads the conversion manifest and probe data from their well-known paths
/// and writes the package into the directory of run `run_id`.
pub fn package_from_artifacts<R: ProcessRunner>(
    runner: &R,
    config: &CoreConfig,
    run_id: &str,
    dispatcher: &EventDispatcher,
) -> PipelineResult {
    let mut events = RunEvents::new(dispatcher);

    let ctx = match check_packaging_inputs(config, run_id) {
        Ok(ctx) => ctx,
        Err(e) => return fail(&mut events, e),
    };

    match package_stage(runner, config, &ctx, &mut events) {
        Ok(()) => {
            events.enter(PipelineState::Done);
            events.progress(100);
            PipelineResult::Success {
                output_dir: ctx.package_dir,
            }
        }
        Err(e) => fail(&mut events, e),
    }
}

/// Checks the input path before any process is spawned: extension first,
/// then existence.
pub fn validate_input(config: &CoreConfig, input: &Path) -> CoreResult<()> {
    if !has_extension(input, &config.container_extension) {
        return Err(CoreError::InvalidInput("Invalid file type".to_string()));
    }
    if !input.exists() {
        return Err(CoreError::InvalidInput(format!(
            "File does not exist: {}",
            input.display()
        )));
    }
    Ok(())
}

// ============================================================================
// STAGES
// ============================================================================

fn run_all_stages<R: ProcessRunner>(
    runner: &R,
    config: &CoreConfig,
    input: &Path,
    ctx: &RunContext,
    events: &mut RunEvents<'_>,
) -> CoreResult<()> {
    config.validate()?;
    validate_input(config, input)?;
    log::debug!("Run {} for {}", ctx.run_id, display_name(input));

    events.enter(PipelineState::Probing);
    let probe = probe_streams(runner, &config.ffprobe_path, input, &ctx.probe_path)?;
    events.log(format!("Probe data written to {}.", ctx.probe_path.display()));

    events.enter(PipelineState::Converting);
    ctx.prepare_directories()?;
    let outcomes = convert_tracks(runner, config, input, &probe, ctx, events);

    events.enter(PipelineState::RecordingManifest);
    let manifest = ConversionManifest::from_outcomes(&outcomes);
    manifest.write(&ctx.manifest_path)?;
    events.log("Conversion completed successfully.");

    package_stage(runner, config, ctx, events)
}

/// Converts every probed stream, one at a time in ascending index order.
///
/// Emits `floor(i * 100 / N)` progress before track `i` and 100 after the
/// last one, and one log line per track. Never fails: track-level problems
/// become `TrackOutcome::Failed` or `TrackOutcome::Unsupported`.
pub fn convert_tracks<R: ProcessRunner>(
    runner: &R,
    config: &CoreConfig,
    input: &Path,
    probe: &ProbeData,
    ctx: &RunContext,
    events: &mut RunEvents<'_>,
) -> Vec<TrackOutcome> {
    let mut streams: Vec<&StreamDescriptor> = probe.streams.iter().collect();
    streams.sort_by_key(|s| s.index);

    let total = streams.len();
    let mut outcomes = Vec::with_capacity(total);

    for (position, stream) in streams.into_iter().enumerate() {
        events.progress((position * 100 / total) as i64);

        let outcome = match classify_stream(stream, &config.skip_codec_types, ctx) {
            Classification::Skip { matched } => TrackOutcome::Skipped {
                index: stream.index,
                codec_type: CodecType::from(matched),
            },
            Classification::Unsupported => TrackOutcome::Unsupported {
                index: stream.index,
                codec_type: stream.codec_type.clone(),
            },
            Classification::Convert(job) => convert_track(runner, config, input, &job),
        };

        match outcome {
            TrackOutcome::Failed { .. } | TrackOutcome::Unsupported { .. } => {
                events.log_error(outcome.log_message())
            }
            _ => events.log(outcome.log_message()),
        }
        outcomes.push(outcome);
    }

    events.progress(100);
    outcomes
}

fn package_stage<R: ProcessRunner>(
    runner: &R,
    config: &CoreConfig,
    ctx: &RunContext,
    events: &mut RunEvents<'_>,
) -> CoreResult<()> {
    events.enter(PipelineState::BuildingPackagerCommand);
    let manifest = ConversionManifest::load(&ctx.manifest_path)?;
    let probe = load_probe_data(&ctx.probe_path)?;
    let command = build_packager_command(&config.packager_path, &manifest, &probe, ctx)?;
    if command.entries.is_empty() {
        return Err(CoreError::PackagingFailure(
            "no converted tracks to package".to_string(),
        ));
    }

    events.enter(PipelineState::Packaging);
    fs::create_dir_all(&ctx.package_dir)?;
    run_packager(runner, &command)?;
    events.log("Packaging completed successfully.");
    Ok(())
}

fn check_packaging_inputs(config: &CoreConfig, run_id: &str) -> CoreResult<RunContext> {
    config.validate()?;

    let valid_id = !run_id.is_empty()
        && run_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_id {
        return Err(CoreError::InvalidInput(format!("Invalid run id: {run_id:?}")));
    }

    let ctx = RunContext::new(config, run_id);
    if !ctx.manifest_path.exists() {
        return Err(CoreError::InvalidInput(format!(
            "Conversion manifest not found: {}",
            ctx.manifest_path.display()
        )));
    }
    if !ctx.probe_path.exists() {
        return Err(CoreError::InvalidInput(format!(
            "Probe data not found: {}",
            ctx.probe_path.display()
        )));
    }

    // The manifest is shared by all runs; a later run overwrites it.
    let manifest = ConversionManifest::load(&ctx.manifest_path)?;
    if let Some(foreign) = manifest
        .streams
        .iter()
        .find(|s| !s.output_file.starts_with(&ctx.transcode_dir))
    {
        return Err(CoreError::InvalidInput(format!(
            "Conversion manifest does not belong to run {}: {} is outside {}",
            ctx.run_id,
            foreign.output_file.display(),
            ctx.transcode_dir.display()
        )));
    }
    Ok(ctx)
}

/// Reports a stage-level failure and moves the run into `Error`.
fn fail(events: &mut RunEvents<'_>, error: CoreError) -> PipelineResult {
    let message = error.to_string();
    if events.state().is_packaging() {
        events.log_error(format!("Error during packaging: {message}"));
    } else {
        events.log_error(message.clone());
    }
    events.enter(PipelineState::Error);
    PipelineResult::Error { error: message }
}
