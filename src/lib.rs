pub mod analysis;
pub mod io;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod stages;
pub mod video;

pub use analysis::{generate_call_review, write_call_review};
pub use io::{load_session_index, parse_transcript_file, write_json, ParsedTranscript};
pub use models::{
    CallReview, CallType, FrameRecord, SamplerConfig, SessionIndex, SpeakerAnalysis,
    TranscriptSegment,
};
pub use parsers::{TranscriptFormat, TranscriptParser};
pub use pipeline::{default_output_dir, run_session, SessionConfig, SessionOutcome, SessionRequest};
pub use video::{FfmpegConfig, FfmpegTool, VideoTool, VideoToolError};
