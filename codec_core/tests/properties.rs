use codec_core::codec::{
    decode_base64, decode_base64url, decode_jwt, encode_base64, encode_base64url, encode_jwt,
};
use codec_core::convert::{hsl_to_rgb, json_to_csv, parse_csv, rgb_to_hsl, CsvOptions, Rgb};
use codec_core::diff::{lcs_diff, DiffOp, DiffTag};
use codec_core::subnet::{mask_from_prefix_length, mask_to_prefix};
use codec_core::text::{decode_morse, encode_morse};
use proptest::prelude::*;
use serde_json::Value;

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "\\PC{0,8}".prop_map(Value::from),
    ]
}

fn json_object() -> impl Strategy<Value = Value> {
    let nested = json_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    });
    prop::collection::btree_map("[a-z_]{1,8}", nested, 0..5)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

fn rebuild(ops: &[DiffOp], keep: DiffTag) -> Vec<String> {
    ops.iter()
        .filter(|op| op.tag == DiffTag::Equal || op.tag == keep)
        .map(|op| op.text.clone())
        .collect()
}

proptest! {
    #[test]
    fn base64_round_trips_printable_ascii(s in "[ -~]*") {
        prop_assert_eq!(decode_base64(&encode_base64(&s)).unwrap(), s);
    }

    #[test]
    fn base64url_round_trips_any_text(s in "\\PC*") {
        prop_assert_eq!(decode_base64url(&encode_base64url(s.as_bytes())).unwrap(), s);
    }

    #[test]
    fn jwt_round_trips_generated_payloads(payload in json_object()) {
        let text = payload.to_string();
        prop_assert_eq!(decode_base64url(&encode_base64url(text.as_bytes())).unwrap(), text.clone());
        let token = encode_jwt(&text, "secret", "HS384").unwrap();
        prop_assert_eq!(decode_jwt(&token).unwrap().payload, payload);
    }

    #[test]
    fn morse_round_trips_letters_digits_and_single_spaces(
        words in prop::collection::vec("[A-Z0-9]{1,8}", 1..5)
    ) {
        let text = words.join(" ");
        prop_assert_eq!(decode_morse(&encode_morse(&text)), text);
    }

    #[test]
    fn csv_cells_survive_a_round_trip(
        cells in prop::collection::vec(
            prop::collection::vec("[a-z ,\"\n]{0,6}", 3),
            1..5,
        )
    ) {
        let options = CsvOptions { has_header: false, ..CsvOptions::default() };
        let json = Value::from(
            cells.iter().map(|row| Value::from(row.clone())).collect::<Vec<_>>()
        );
        let csv = json_to_csv(&json.to_string(), &options).unwrap();
        prop_assert_eq!(parse_csv(&csv, &options).rows, cells);
    }

    #[test]
    fn diff_rebuilds_both_inputs(
        a in prop::collection::vec("[abc]", 0..12),
        b in prop::collection::vec("[abc]", 0..12),
    ) {
        let a_refs: Vec<&str> = a.iter().map(String::as_str).collect();
        let b_refs: Vec<&str> = b.iter().map(String::as_str).collect();
        let ops = lcs_diff(&a_refs, &b_refs);
        prop_assert_eq!(rebuild(&ops, DiffTag::Delete), a);
        prop_assert_eq!(rebuild(&ops, DiffTag::Insert), b);
    }

    #[test]
    fn identical_inputs_diff_to_all_equal(a in prop::collection::vec("[a-z]{0,4}", 0..10)) {
        let refs: Vec<&str> = a.iter().map(String::as_str).collect();
        prop_assert!(lcs_diff(&refs, &refs).iter().all(|op| op.tag == DiffTag::Equal));
    }

    #[test]
    fn rgb_hsl_round_trip_within_one_unit(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let rgb = Rgb::new(r, g, b);
        let back = hsl_to_rgb(rgb_to_hsl(rgb));
        prop_assert!(rgb.r.abs_diff(back.r) <= 1);
        prop_assert!(rgb.g.abs_diff(back.g) <= 1);
        prop_assert!(rgb.b.abs_diff(back.b) <= 1);
    }

    #[test]
    fn prefix_masks_are_contiguous(len in 0u8..=32) {
        prop_assert_eq!(mask_to_prefix(mask_from_prefix_length(len)).unwrap(), len);
    }
}
