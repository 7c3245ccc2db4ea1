mod splitter;

pub use splitter::{
    partition, split_charts, split_dataset, write_split_manifest, ClassSplitCounts,
    SplitPartition, SplitSummary, SplitTotals,
};
