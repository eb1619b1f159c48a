pub mod action;
pub mod assess;
pub mod paths;

pub use action::{canonical_name, ActionKind};
pub use assess::{Assessment, SafetyPolicy};
pub use paths::{normalize_path, normalize_path_with_home};
