pub mod caption;
pub mod scroll_anchor;

pub use caption::Caption;
pub use scroll_anchor::{ScrollAnchor, ScrollDirective};
