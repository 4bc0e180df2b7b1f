pub mod color;
pub mod csv;
pub mod json;
pub mod markdown;

pub use color::{
    convert_color, hex_to_hsl, hex_to_rgb, hsl_to_hex, hsl_to_rgb, parse_hsl, parse_rgb,
    rgb_to_hex, rgb_to_hsl, ColorCodes, Hsl, Rgb,
};
pub use csv::{csv_to_json, json_to_csv, parse_csv, serialize_csv, CsvOptions, CsvTable};
pub use markdown::{html_to_markdown, markdown_to_html};
pub use json::{format_json, minify_json, parse_json, DEFAULT_INDENT, MAX_INDENT};
