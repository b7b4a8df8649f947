pub mod button;
pub mod field;
pub mod notice;
pub mod panel;
pub mod sync_indicator;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use button::*;
pub use field::*;
pub use notice::*;
pub use panel::*;
pub use sync_indicator::*;
