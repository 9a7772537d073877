pub mod frame;
pub mod metrics;
pub mod review;
pub mod segment;
pub mod session;

pub use frame::*;
pub use metrics::*;
pub use review::*;
pub use segment::*;
pub use session::*;
