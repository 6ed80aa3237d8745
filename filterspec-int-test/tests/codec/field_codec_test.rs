//! Field name codec, on its own and as used by the compiler.

use filterspec::codec::{decode, decode_keys, encode, encode_keys, encode_path};
use filterspec::rule::field;
use filterspec_int_test::test_util::{cleanup, create_test_context, run_test};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

// characters that make escapes and near-misses likely
const ALPHABET: [char; 14] = ['.', '\\', 'u', '0', '2', 'e', 'E', '5', 'c', 'a', '_', ' ', 'é', '$'];

fn random_name(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..24);
    (0..len).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())]).collect()
}

#[test]
fn test_round_trip_random_names() {
    let mut rng = StdRng::seed_from_u64(0xf1e1d);
    for _ in 0..5_000 {
        let name = random_name(&mut rng);
        let encoded = encode(&name);
        assert!(!encoded.contains('.'), "{:?} -> {:?}", name, encoded);
        assert_eq!(decode(&encoded), name);
    }
}

#[test]
fn test_escape_text_in_user_input_survives() {
    let tricky = [
        r"a\u002eb",
        r"a\u005cb",
        r"\u002e",
        r"\\u002e.",
        r"trailing\",
        r"upper\u002E.case",
    ];
    for name in tricky {
        assert_eq!(decode(&encode(name)), name);
    }
}

#[test]
fn test_decode_leaves_near_misses_alone() {
    assert_eq!(decode(r"a\u002eb"), "a.b");
    assert_eq!(decode(r"a\u005cb"), r"a\b");
    assert_eq!(decode(r"a\u002Eb"), r"a\u002Eb");
    assert_eq!(decode(r"a\u02eb"), r"a\u02eb");
    assert_eq!(decode(r"a\nb"), r"a\nb");
    assert_eq!(decode("plain.name"), "plain.name");
}

#[test]
fn test_encode_path_escapes_inside_segments() {
    assert_eq!(encode_path(["meta", "host.name"]), r"meta.host\u002ename");
    assert_eq!(encode_path(["single"]), "single");
}

#[test]
fn test_document_keys_round_trip() {
    let original = json!({
        "cpu.load": 81.5,
        "host": {"fqdn.short": "web-1", "ports": [{"tls.on": true}]},
        "plain": [1, 2, {"x.y": null}]
    });

    let mut document = original.clone();
    encode_keys(&mut document);
    assert_eq!(
        document,
        json!({
            "cpu\\u002eload": 81.5,
            "host": {"fqdn\\u002eshort": "web-1", "ports": [{"tls\\u002eon": true}]},
            "plain": [1, 2, {"x\\u002ey": null}]
        })
    );

    decode_keys(&mut document);
    assert_eq!(document, original);
}

#[test]
fn test_compiled_keys_decode_to_schema_names() {
    run_test(
        create_test_context,
        |ctx| {
            let filter = ctx.compiler().compile(&field("cpu.load").lt(10))?;
            let keys: Vec<String> = filter.into_inner().keys().map(|k| decode(k)).collect();
            assert_eq!(keys, vec!["cpu.load"]);
            Ok(())
        },
        cleanup,
    )
}
