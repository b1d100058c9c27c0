pub mod detect;
pub mod sample;

pub use detect::{classify, Verdict};
pub use sample::{ContentSample, LEADING_LINES};
