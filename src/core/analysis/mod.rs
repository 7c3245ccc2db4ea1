mod class_counts;

pub use class_counts::{count_per_class, count_per_split, ClassDistribution, SplitDistribution};
