mod note;
mod sort;

pub use note::{Note, DEFAULT_TITLE};
pub use sort::SortOrder;
