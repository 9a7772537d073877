pub mod stage0_ingest;
pub mod stage1_turns;
pub mod stage2_sample;
pub mod stage3_align;
pub mod stage4_index;

pub use stage0_ingest::*;
pub use stage1_turns::*;
pub use stage2_sample::*;
pub use stage3_align::*;
pub use stage4_index::*;
