//! Scoped CPU profiling around a single compress or decompress call.
//!
//! A CPU profiler samples the whole process, so at most one session may be
//! active at any time. [`ProfileSession::begin`] claims a process-wide flag
//! and fails with [`ResourceError::ProfilerBusy`] when it is already held; the
//! flag is released when the session is finished or dropped, including on
//! early-return paths.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use cpu_time::ProcessTime;
use serde::Serialize;

use crate::error::ResourceError;

static PROFILER_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Which half of a round trip is being profiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Compress,
    Decompress,
}

impl Phase {
    /// Profile file name written for this phase.
    pub fn file_name(self) -> &'static str {
        match self {
            Phase::Compress => "cpu.compress.pprof",
            Phase::Decompress => "cpu.uncompress.pprof",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Compress => write!(f, "compress"),
            Phase::Decompress => write!(f, "decompress"),
        }
    }
}

/// Backend that collects CPU samples between `start` and `stop`.
///
/// `stop` writes whatever the backend collected into `sink`; the format is
/// owned by the backend.
pub trait CpuProfiler {
    fn start(&mut self, phase: Phase) -> Result<(), ResourceError>;

    fn stop(&mut self, sink: &mut dyn Write) -> Result<(), ResourceError>;
}

/// Minimal backend: records wall-clock and process CPU time between start and
/// stop and writes them as `key value` lines.
#[derive(Debug, Default)]
pub struct TimingProfiler {
    started: Option<Started>,
}

#[derive(Debug)]
struct Started {
    phase: Phase,
    wall: Instant,
    cpu: Duration,
}

impl TimingProfiler {
    pub fn new() -> Self {
        Self::default()
    }
}

/// CPU time consumed by the whole process so far.
fn process_cpu_time() -> Result<Duration, ResourceError> {
    ProcessTime::try_now()
        .map(|t| t.as_duration())
        .map_err(|e| ResourceError::Profiler(format!("reading process cpu time: {e}")))
}

impl CpuProfiler for TimingProfiler {
    fn start(&mut self, phase: Phase) -> Result<(), ResourceError> {
        self.started = Some(Started {
            phase,
            wall: Instant::now(),
            cpu: process_cpu_time()?,
        });
        Ok(())
    }

    fn stop(&mut self, sink: &mut dyn Write) -> Result<(), ResourceError> {
        let started = self
            .started
            .take()
            .ok_or_else(|| ResourceError::Profiler("stop called before start".to_string()))?;
        let wall = started.wall.elapsed();
        let cpu = process_cpu_time()?.saturating_sub(started.cpu);
        writeln!(sink, "phase {}", started.phase)
            .and_then(|_| writeln!(sink, "wall_ns {}", wall.as_nanos()))
            .and_then(|_| writeln!(sink, "cpu_ns {}", cpu.as_nanos()))
            .map_err(|e| ResourceError::Profiler(e.to_string()))
    }
}

/// One active profiling session writing to `dir/<phase file name>`.
pub struct ProfileSession<'p> {
    profiler: &'p mut dyn CpuProfiler,
    file: Option<BufWriter<File>>,
    path: PathBuf,
}

impl<'p> ProfileSession<'p> {
    /// Claim the process-wide profiler, create the profile file and start
    /// sampling.
    pub fn begin(
        profiler: &'p mut dyn CpuProfiler,
        dir: &Path,
        phase: Phase,
    ) -> Result<Self, ResourceError> {
        if PROFILER_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ResourceError::ProfilerBusy);
        }

        let path = dir.join(phase.file_name());
        let file = match File::create(&path) {
            Ok(f) => f,
            Err(source) => {
                PROFILER_ACTIVE.store(false, Ordering::Release);
                return Err(ResourceError::CreateFile { path, source });
            }
        };

        if let Err(e) = profiler.start(phase) {
            PROFILER_ACTIVE.store(false, Ordering::Release);
            return Err(e);
        }
        log::debug!("profiling {phase} into {path:?}");

        Ok(Self {
            profiler,
            file: Some(BufWriter::new(file)),
            path,
        })
    }

    /// Stop sampling, flush the profile file and release the profiler.
    ///
    /// Returns the path of the written profile.
    pub fn finish(mut self) -> Result<PathBuf, ResourceError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| ResourceError::Profiler("session already finished".to_string()))?;
        self.profiler.stop(&mut file)?;
        file.flush().map_err(|source| ResourceError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProfileSession<'_> {
    fn drop(&mut self) {
        // Unfinished session: stop the backend so it does not keep sampling.
        if let Some(mut file) = self.file.take() {
            if let Err(e) = self.profiler.stop(&mut file) {
                log::warn!("stopping abandoned profile session {:?}: {e}", self.path);
            }
        }
        PROFILER_ACTIVE.store(false, Ordering::Release);
    }
}

/// Returns `true` while a [`ProfileSession`] is alive.
pub fn is_active() -> bool {
    PROFILER_ACTIVE.load(Ordering::Acquire)
}
