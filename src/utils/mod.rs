pub mod clock;
pub mod hash;

pub use clock::{Clock, FixedClock, SystemClock};
pub use hash::fnv1a_32;
