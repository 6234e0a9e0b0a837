//! Sampling CPU profiler backed by the `pprof` crate.
//!
//! Writes gzip-free protobuf profiles readable by `go tool pprof` and
//! `pprof -http`.

use std::io::Write;

use packbench_core::{CpuProfiler, Phase, ResourceError};
use pprof::protos::Message;
use pprof::ProfilerGuard;

/// Samples per second.
const FREQUENCY: i32 = 997;

#[derive(Default)]
pub struct PprofProfiler {
    guard: Option<ProfilerGuard<'static>>,
}

impl PprofProfiler {
    pub fn new() -> Self {
        Self { guard: None }
    }
}

fn profiler_error(e: impl std::fmt::Display) -> ResourceError {
    ResourceError::Profiler(e.to_string())
}

impl CpuProfiler for PprofProfiler {
    fn start(&mut self, phase: Phase) -> Result<(), ResourceError> {
        let guard = ProfilerGuard::new(FREQUENCY).map_err(profiler_error)?;
        log::trace!("pprof sampling {phase} at {FREQUENCY} Hz");
        self.guard = Some(guard);
        Ok(())
    }

    fn stop(&mut self, sink: &mut dyn Write) -> Result<(), ResourceError> {
        let guard = self
            .guard
            .take()
            .ok_or_else(|| profiler_error("stop called before start"))?;
        let report = guard.report().build().map_err(profiler_error)?;
        let profile = report.pprof().map_err(profiler_error)?;

        let mut content = Vec::new();
        profile.write_to_vec(&mut content).map_err(profiler_error)?;
        sink.write_all(&content).map_err(profiler_error)
    }
}
