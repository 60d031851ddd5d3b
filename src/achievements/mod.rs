pub mod detector;

pub use detector::{detect_achievements, detect_result_achievements, AchievementType};
