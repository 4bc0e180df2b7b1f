pub mod ascii;
pub mod case;
pub mod leet;
pub mod morse;
pub mod stats;

pub use ascii::{list_ascii_fonts, render_ascii_art, Align};
pub use case::{convert_case, CaseStyle};
pub use leet::{decode_leet, encode_leet, LeetLevel};
pub use morse::{decode_morse, encode_morse};
pub use stats::{text_stats, TextStats};
