use console_error_panic_hook::set_once as set_panic_hook;
use js_sys::Date;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod codec;
pub mod convert;
pub mod diff;
pub mod error;
pub mod hash;
pub mod ids;
pub mod password;
pub mod regex_tester;
pub mod subnet;
pub mod text;
pub mod timestamp;

pub use error::{Result, ToolError};

use convert::CsvOptions;
use diff::DiffOptions;
use password::PasswordOptions;
use text::{Align, CaseStyle, LeetLevel};
use timestamp::TimezoneMode;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    set_panic_hook();
}

fn seeded_rng() -> std::result::Result<Xoshiro256StarStar, JsValue> {
    let mut seed = [0u8; 32];
    getrandom::fill(&mut seed)
        .map_err(|err| JsValue::from_str(&format!("randomness unavailable: {err}")))?;
    Ok(Xoshiro256StarStar::from_seed(seed))
}

/// Sends `tracing` events from unit tests to the harness's captured output.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn now_millis() -> i64 {
    Date::now() as i64
}

fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// `undefined` and `null` fall back to the option type's defaults.
fn options_from<T: DeserializeOwned + Default>(value: JsValue) -> std::result::Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| JsValue::from(ToolError::format(format!("invalid options: {err}"))))
}

#[wasm_bindgen]
pub fn base64_encode(input: &str) -> String {
    codec::encode_base64(input)
}

#[wasm_bindgen]
pub fn base64_decode(input: &str) -> std::result::Result<String, JsValue> {
    Ok(codec::decode_base64(input)?)
}

#[wasm_bindgen]
pub fn base64url_encode(input: &str) -> String {
    codec::encode_base64url(input.as_bytes())
}

#[wasm_bindgen]
pub fn base64url_decode(input: &str) -> std::result::Result<String, JsValue> {
    Ok(codec::decode_base64url(input)?)
}

#[wasm_bindgen]
pub fn jwt_decode(token: &str) -> std::result::Result<JsValue, JsValue> {
    to_js(&codec::decode_jwt(token)?)
}

#[wasm_bindgen]
pub fn jwt_encode(
    payload: &str,
    secret: &str,
    algorithm: &str,
) -> std::result::Result<String, JsValue> {
    Ok(codec::encode_jwt(payload, secret, algorithm)?)
}

#[wasm_bindgen]
pub fn url_encode_component(input: &str) -> String {
    codec::url_encode(input)
}

#[wasm_bindgen]
pub fn url_decode_component(input: &str) -> std::result::Result<String, JsValue> {
    Ok(codec::url_decode(input)?)
}

#[wasm_bindgen]
pub fn cloudflare_email_decode(encoded: &str) -> std::result::Result<String, JsValue> {
    Ok(codec::decode_cloudflare_email(encoded)?)
}

#[wasm_bindgen]
pub fn morse_encode(input: &str) -> String {
    text::encode_morse(input)
}

#[wasm_bindgen]
pub fn morse_decode(input: &str) -> String {
    text::decode_morse(input)
}

#[wasm_bindgen]
pub fn leet_encode(input: &str, level: &str) -> std::result::Result<String, JsValue> {
    let level: LeetLevel = level.parse()?;
    let mut rng = seeded_rng()?;
    Ok(text::encode_leet(input, level, &mut rng))
}

#[wasm_bindgen]
pub fn leet_decode(input: &str) -> String {
    text::decode_leet(input)
}

#[wasm_bindgen]
pub fn convert_text_case(input: &str, style: &str) -> std::result::Result<String, JsValue> {
    let style: CaseStyle = style.parse()?;
    Ok(text::convert_case(input, style))
}

#[wasm_bindgen]
pub fn text_statistics(input: &str) -> std::result::Result<JsValue, JsValue> {
    to_js(&text::text_stats(input))
}

#[wasm_bindgen]
pub fn ascii_fonts() -> std::result::Result<JsValue, JsValue> {
    to_js(&text::list_ascii_fonts())
}

#[wasm_bindgen]
pub fn ascii_art(
    input: &str,
    font: &str,
    width: Option<u32>,
    align: &str,
) -> std::result::Result<String, JsValue> {
    let align: Align = align.parse()?;
    Ok(text::render_ascii_art(input, font, width, align)?)
}

#[wasm_bindgen]
pub fn json_format(input: &str, indent: Option<u32>) -> std::result::Result<String, JsValue> {
    let indent = indent.map_or(convert::DEFAULT_INDENT, |n| n as usize);
    Ok(convert::format_json(input, indent)?)
}

#[wasm_bindgen]
pub fn json_minify(input: &str) -> std::result::Result<String, JsValue> {
    Ok(convert::minify_json(input)?)
}

#[wasm_bindgen]
pub fn markdown_to_html_text(input: &str) -> String {
    convert::markdown_to_html(input)
}

#[wasm_bindgen]
pub fn html_to_markdown_text(input: &str) -> std::result::Result<String, JsValue> {
    Ok(convert::html_to_markdown(input)?)
}

#[wasm_bindgen]
pub fn csv_to_json_text(
    input: &str,
    delimiter: &str,
    has_header: bool,
) -> std::result::Result<String, JsValue> {
    let options = CsvOptions::new(delimiter, has_header)?;
    Ok(convert::csv_to_json(input, &options)?)
}

#[wasm_bindgen]
pub fn json_to_csv_text(
    input: &str,
    delimiter: &str,
    has_header: bool,
) -> std::result::Result<String, JsValue> {
    let options = CsvOptions::new(delimiter, has_header)?;
    Ok(convert::json_to_csv(input, &options)?)
}

#[wasm_bindgen]
pub fn color_convert(input: &str) -> std::result::Result<JsValue, JsValue> {
    to_js(&convert::convert_color(input)?)
}

/// Never fails on bad input: the page shows the placeholder instead.
#[wasm_bindgen]
pub fn subnet_calculate(
    cidr: &str,
    ip: &str,
    prefix: &str,
) -> std::result::Result<JsValue, JsValue> {
    let summary = subnet::calculate_subnet(cidr, ip, prefix).unwrap_or_else(|err| {
        tracing::debug!(%err, "subnet input rejected");
        subnet::SubnetSummary::placeholder()
    });
    to_js(&summary)
}

#[wasm_bindgen]
pub fn password_entropy(input: &str) -> std::result::Result<JsValue, JsValue> {
    to_js(&password::estimate_entropy(input))
}

#[wasm_bindgen]
pub fn password_generate(options: JsValue) -> std::result::Result<String, JsValue> {
    let options: PasswordOptions = options_from(options)?;
    let mut rng = seeded_rng()?;
    Ok(password::generate_password(&options, &mut rng))
}

#[wasm_bindgen]
pub fn hash_digests(input: &str) -> std::result::Result<JsValue, JsValue> {
    to_js(&hash::hash_all(input))
}

#[wasm_bindgen]
pub fn hash_digest(input: &str, algorithm: &str) -> std::result::Result<String, JsValue> {
    let algorithm: hash::HashAlgorithm = algorithm.parse()?;
    Ok(hash::hash_text(input, algorithm))
}

#[wasm_bindgen]
pub fn generate_uuid() -> std::result::Result<String, JsValue> {
    let mut rng = seeded_rng()?;
    Ok(ids::uuid_v4(&mut rng))
}

#[wasm_bindgen]
pub fn generate_uuid_batch(count: usize) -> std::result::Result<JsValue, JsValue> {
    let mut rng = seeded_rng()?;
    to_js(&ids::uuid_batch(count, &mut rng))
}

#[wasm_bindgen]
pub fn generate_ulid() -> std::result::Result<String, JsValue> {
    let mut rng = seeded_rng()?;
    let now = u64::try_from(now_millis()).unwrap_or(0);
    Ok(ids::ulid(now, &mut rng))
}

#[wasm_bindgen]
pub fn timestamp_to_date_info(input: &str, mode: &str) -> std::result::Result<JsValue, JsValue> {
    let mode: TimezoneMode = mode.parse()?;
    to_js(&timestamp::timestamp_to_date(input, mode)?)
}

#[wasm_bindgen]
pub fn date_to_timestamp_info(input: &str, mode: &str) -> std::result::Result<JsValue, JsValue> {
    let mode: TimezoneMode = mode.parse()?;
    to_js(&timestamp::date_to_timestamp(input, mode)?)
}

#[wasm_bindgen]
pub fn timestamp_now(mode: &str) -> std::result::Result<JsValue, JsValue> {
    let mode: TimezoneMode = mode.parse()?;
    to_js(&timestamp::describe_millis(now_millis(), mode)?)
}

#[wasm_bindgen]
pub fn regex_test(pattern: &str, flags: &str, input: &str) -> std::result::Result<JsValue, JsValue> {
    to_js(&regex_tester::test_regex(pattern, flags, input)?)
}

#[wasm_bindgen]
pub fn text_diff(
    old_text: &str,
    new_text: &str,
    options: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    let options: DiffOptions = options_from(options)?;
    to_js(&diff::diff_lines(old_text, new_text, &options))
}

#[wasm_bindgen]
pub fn text_unified_diff(
    old_text: &str,
    new_text: &str,
    old_name: &str,
    new_name: &str,
    options: JsValue,
) -> std::result::Result<String, JsValue> {
    let options: DiffOptions = options_from(options)?;
    Ok(diff::unified_diff(
        old_text, new_text, old_name, new_name, &options,
    ))
}
