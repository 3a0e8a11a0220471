mod region;

pub use region::{level_label, LevelCount, Region};
