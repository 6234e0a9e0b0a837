pub mod bytes;
pub mod codec;
pub mod composite;
pub mod config;
pub mod cursor;
pub mod error;
pub mod generators;
pub mod harness;
pub mod profile;

pub use codec::{ByteCodec, IntegerCodec};
pub use composite::Composite;
pub use config::{BenchConfig, Distribution};
pub use cursor::{Cursor, Progress};
pub use error::{BenchError, CodecError, GeneratorError, ResourceError, RoundTripMismatch};
pub use harness::{Harness, TrialReport};
pub use profile::{CpuProfiler, Phase, ProfileSession, TimingProfiler};
