pub mod text;

pub use text::{mask, truncate_end, truncate_start};
