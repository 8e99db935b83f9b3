//! Split-purchase advisor.

mod advisor;

pub use advisor::{
    advise, SplitAdvice, SplitAnalysis, SplitProposal, SplitStrategy, PLACEHOLDER_ITEMS,
    SPLIT_THRESHOLD_CENTS,
};
