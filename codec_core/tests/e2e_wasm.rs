#![cfg(target_arch = "wasm32")]

use js_sys::{Object, Reflect}; // Build JS option objects for wasm bindings.
use serde_json::Value as JsonValue;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use codec_core::{
    base64_decode, base64_encode, color_convert, csv_to_json_text, generate_ulid, generate_uuid,
    generate_uuid_batch, hash_digests, html_to_markdown_text, json_to_csv_text, jwt_decode,
    jwt_encode, leet_encode, markdown_to_html_text, morse_decode, morse_encode, password_entropy,
    password_generate, regex_test, subnet_calculate, text_diff, text_unified_diff, timestamp_now,
    timestamp_to_date_info, url_encode_component,
};

wasm_bindgen_test_configure!(run_in_browser);

fn js_to_json(value: JsValue) -> JsonValue {
    serde_wasm_bindgen::from_value(value).expect("JsValue -> JSON map")
}

fn field<'a>(map: &'a JsonValue, key: &str) -> &'a str {
    map.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("missing string field {key}"))
}

fn js_error(err: JsValue) -> String {
    err.as_string().expect("errors are strings")
}

#[wasm_bindgen_test]
fn base64_encode_and_decode_cycle() {
    assert_eq!(base64_encode("rust"), "cnVzdA==");
    assert_eq!(base64_decode("cnVzdA==").expect("decode"), "rust");
    assert!(js_error(base64_decode("@@").unwrap_err()).starts_with("decode error"));
}

#[wasm_bindgen_test]
fn jwt_encode_and_decode_roundtrip() {
    let token = jwt_encode(r#"{"sub":"42"}"#, "secret", "").expect("jwt encode");
    let decoded = js_to_json(jwt_decode(&token).expect("jwt decode"));
    assert_eq!(field(&decoded, "algorithm"), "HS256");
    assert_eq!(decoded["payload"]["sub"], "42");
    let err = js_error(jwt_decode("only-one-part").unwrap_err());
    assert!(err.starts_with("malformed token"), "{err}");
}

#[wasm_bindgen_test]
fn morse_round_trips_through_exports() {
    let code = morse_encode("sos 1");
    assert_eq!(code, "... --- ... / .----");
    assert_eq!(morse_decode(&code), "SOS 1");
}

#[wasm_bindgen_test]
fn leet_uses_browser_randomness() {
    assert_eq!(leet_encode("leet", "extreme").expect("leet"), "|_33|-|");
    assert!(leet_encode("leet", "ludicrous").is_err());
}

#[wasm_bindgen_test]
fn csv_and_json_convert_both_ways() {
    let json = csv_to_json_text("name,quote\nAda,\"He said, \"\"hi\"\"\"", ",", true)
        .expect("csv to json");
    let rows: JsonValue = serde_json::from_str(&json).expect("json output");
    assert_eq!(rows[0]["quote"], "He said, \"hi\"");
    let csv = json_to_csv_text(&json, ",", true).expect("json to csv");
    assert_eq!(csv, "name,quote\nAda,\"He said, \"\"hi\"\"\"");
    assert!(json_to_csv_text("{", ",", true).is_err());
}

#[wasm_bindgen_test]
fn markdown_and_html_convert_both_ways() {
    let html = markdown_to_html_text("# Notes\n\n- **one**\n- [two](/t)");
    assert_eq!(
        html,
        "<h1>Notes</h1>\n<ul>\n<li><strong>one</strong></li>\n<li><a href=\"/t\">two</a></li>\n</ul>\n"
    );
    let md = html_to_markdown_text(&html).expect("html to markdown");
    assert_eq!(md, "# Notes\n\n- **one**\n- [two](/t)");
    assert!(html_to_markdown_text("<p>cut <b").is_err());
}

#[wasm_bindgen_test]
fn url_encoding_matches_encode_uri_component() {
    assert_eq!(url_encode_component("(a b)!*'"), "(a%20b)!*'");
}

#[wasm_bindgen_test]
fn color_convert_reports_all_notations() {
    let map = js_to_json(color_convert("#336699").expect("color"));
    assert_eq!(field(&map, "rgb"), "rgb(51, 102, 153)");
    assert_eq!(field(&map, "hsl"), "hsl(210, 50%, 40%)");
}

#[wasm_bindgen_test]
fn subnet_renders_placeholder_for_bad_input() {
    let map = js_to_json(subnet_calculate("10.0.0.0/24", "", "").expect("subnet"));
    assert_eq!(field(&map, "hosts"), "254");
    assert_eq!(field(&map, "broadcast"), "10.0.0.255");
    let bad = js_to_json(subnet_calculate("10.0.0/24", "", "").expect("placeholder"));
    assert_eq!(field(&bad, "network"), "-");
}

#[wasm_bindgen_test]
fn password_tools_work_in_browser() {
    let report = js_to_json(password_entropy("aaaa").expect("entropy"));
    assert_eq!(report["pool"].as_f64(), Some(26.0));
    let options = Object::new();
    Reflect::set(&options, &"length".into(), &JsValue::from_f64(24.0)).unwrap();
    let pw = password_generate(options.into()).expect("password");
    assert_eq!(pw.chars().count(), 24);
    assert_eq!(password_generate(JsValue::UNDEFINED).unwrap().chars().count(), 16);
}

#[wasm_bindgen_test]
fn hash_digests_match_known_value() {
    let map = js_to_json(hash_digests("abc").expect("hash"));
    assert_eq!(
        field(&map, "sha256"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[wasm_bindgen_test]
fn id_generators_have_expected_shape() {
    assert_eq!(generate_uuid().expect("uuid").len(), 36);
    assert_eq!(generate_ulid().expect("ulid").len(), 26);
    let batch = js_to_json(generate_uuid_batch(3).expect("batch"));
    assert_eq!(batch.as_array().map(Vec::len), Some(3));
}

#[wasm_bindgen_test]
fn timestamps_convert_in_utc() {
    let map = js_to_json(timestamp_to_date_info("1234567890", "utc").expect("timestamp"));
    assert_eq!(field(&map, "iso"), "2009-02-13T23:31:30.000Z");
    let now = js_to_json(timestamp_now("local").expect("now"));
    assert!(now["millis"].as_f64().unwrap_or(0.0) > 1_234_567_890_000.0);
}

#[wasm_bindgen_test]
fn regex_test_returns_matches() {
    let matches = js_to_json(regex_test(r"(?P<n>\d+)", "g", "a1b22").expect("regex"));
    assert_eq!(matches[1]["text"], "22");
    assert_eq!(matches[1]["groups"]["n"], "22");
    assert!(regex_test("(", "", "x").is_err());
}

#[wasm_bindgen_test]
fn diff_exports_accept_options_object() {
    let options = Object::new();
    Reflect::set(&options, &"ignoreCase".into(), &JsValue::TRUE).unwrap();
    let result = js_to_json(text_diff("A\nb", "a\nc", options.into()).expect("diff"));
    let tags: Vec<&str> = result["ops"]
        .as_array()
        .expect("ops array")
        .iter()
        .filter_map(|op| op["tag"].as_str())
        .collect();
    assert_eq!(tags, vec!["equal", "delete", "insert"]);

    let unified =
        text_unified_diff("x\ny", "x\nz", "a/t", "b/t", JsValue::UNDEFINED).expect("unified");
    assert!(unified.contains("-y\n+z"));
}
