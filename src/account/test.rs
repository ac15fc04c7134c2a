use crate::account::{
    parse_account, validate_iban, verify_check_digit, AccountKind, AccountParser, DEFAULT_PARSER,
};
use crate::error::{AccountError, MalformedReason};
use crate::observability::labels::Labels;
use crate::registry::{PrefixRegistry, DEFAULT_REGISTRY};
use metrics::{Key, Label};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use metrics_util::CompositeKey;
use metrics_util::MetricKind::Counter;

const UNICEF_IBAN: &str = "PT50 0033 0000 5013 1901 2290 5";

#[test]
fn parse_portuguese_iban() {
    let record = parse_account(UNICEF_IBAN);
    assert_eq!(record.kind(), AccountKind::Iban);
    assert_eq!(record.account_number(), "PT50003300005013190122905");
    assert_eq!(record.nib(), "003300005013190122905");
    assert!(record.is_valid_nib());
    assert!(record.is_valid_crc());
    assert!(record.all_valid());
    assert_eq!(record.clutter(), "");
    assert_eq!(record.failure(), None);
    assert_eq!(record.readable_nib(), "0033 0000 50131901229 05");
}

#[test]
fn parse_bare_nib() {
    for input in [
        "003300005013190122905",
        "0033.0000.5013.1901.2290.5",
        " 0033 0000 50131901229 05 ",
    ] {
        let record = parse_account(input);
        assert_eq!(record.kind(), AccountKind::BareNib);
        assert_eq!(record.nib(), "003300005013190122905");
        assert!(record.all_valid(), "{input}");
    }
}

#[test]
fn parse_wrong_check_digits() {
    let record = parse_account("PT50 0033 0000 5013 1901 2290 6");
    assert!(record.is_valid_nib());
    assert!(!record.is_valid_crc());
    assert!(!record.all_valid());
    assert_eq!(record.readable_nib(), "");

    let record = parse_account("0033 0000 5013 1901 2290 6");
    assert_eq!(record.kind(), AccountKind::BareNib);
    assert!(!record.all_valid());
}

#[test]
fn iban_check_digits_are_not_part_of_the_nib() {
    let record = parse_account("PT51 0033 0000 5013 1901 2290 5");
    assert_eq!(record.kind(), AccountKind::Iban);
    assert!(record.all_valid());
}

#[test]
fn parse_clutter() {
    let record = parse_account("PT50 0033 0000 50A3 1901 2290 5");
    assert_eq!(record.clutter(), "A");
    assert!(!record.all_valid());
    assert_eq!(record.nib(), "");
    assert_eq!(
        record.failure(),
        Some(&AccountError::MalformedStructure(MalformedReason::Clutter(
            "A".to_string()
        )))
    );

    // the digits are right, but letters follow them
    let record = parse_account("003300005013190122905 EUR");
    assert_eq!(record.clutter(), "EUR");
    assert!(!record.all_valid());

    let record = parse_account("12A45");
    assert_eq!(record.clutter(), "A");
    assert!(!record.all_valid());
}

#[test]
fn parse_too_short() {
    let record = parse_account("0033 0000 5013");
    assert_eq!(
        record.failure(),
        Some(&AccountError::TooShort { len: 12, min: 21 })
    );
    assert_eq!(record.kind(), AccountKind::Unrecognized);
    assert_eq!(record.account_number(), "");
    assert!(!record.all_valid());

    assert!(!parse_account("").all_valid());
}

#[test]
fn parse_invalid_characters() {
    let record = parse_account("PT50-0033-0000-5013-1901-2290-5");
    assert_eq!(
        record.failure(),
        Some(&AccountError::InvalidCharacter {
            character: '-',
            position: 4
        })
    );
    assert!(!record.all_valid());

    let record = parse_account("pt50 0033 0000 5013 1901 2290 5");
    assert_eq!(
        record.failure(),
        Some(&AccountError::InvalidCharacter {
            character: 'p',
            position: 0
        })
    );
}

#[test]
fn parse_unregistered_country() {
    let record = parse_account("ES91 2100 0418 4502 0005 1332");
    assert_eq!(record.kind(), AccountKind::Unrecognized);
    assert_eq!(record.account_number(), "ES9121000418450200051332");
    assert_eq!(record.nib(), "9121000418450200051332");
    assert!(!record.is_valid_nib());
    assert!(!record.all_valid());
    assert_eq!(record.failure(), None);
}

#[test]
fn parse_with_custom_registry() {
    let registry = PrefixRegistry::new([("ES91", "Spain")]).unwrap();
    let parser = AccountParser::new(&registry);

    let record = parser.parse("ES91 2100 0418 4502 0005 1332");
    assert_eq!(record.kind(), AccountKind::Iban);
    assert_eq!(record.nib(), "21000418450200051332");
    assert!(record.is_valid_nib());
    assert!(!record.is_valid_crc());

    let record = parser.parse(UNICEF_IBAN);
    assert_eq!(record.kind(), AccountKind::Unrecognized);
    assert!(!record.all_valid());
}

#[test]
fn parse_batch_keeps_order() {
    let inputs = vec![
        UNICEF_IBAN,
        "0033 0000 5013",
        "003300005013190122905",
        "PT50 0033 0000 50A3 1901 2290 5",
        "PT50 0033 0000 5013 1901 2290 6",
    ];
    let parser = AccountParser::default();
    let records = parser.parse_batch(&inputs);
    assert_eq!(records.len(), inputs.len());
    for (record, input) in records.iter().zip(&inputs) {
        assert_eq!(record, &parser.parse(input));
    }
    assert_eq!(
        records.iter().map(|r| r.all_valid()).collect::<Vec<_>>(),
        vec![true, false, true, false, false]
    );
}

#[test]
fn verify_check_digit_of_nib_and_iban() {
    let verdict = verify_check_digit("003300005013190122905");
    assert!(verdict.is_valid);
    assert!(verdict.is_bare_nib);
    assert_eq!(verdict.check_digits, "05");

    let verdict = verify_check_digit("  PT50003300005013190122905\n");
    assert!(verdict.is_valid);
    assert!(!verdict.is_bare_nib);
    assert_eq!(verdict.check_digits, "05");

    let verdict = verify_check_digit("003300005013190122906");
    assert!(!verdict.is_valid);
    assert!(verdict.is_bare_nib);
    assert_eq!(verdict.check_digits, "05");
}

#[test]
fn verify_check_digit_rejects_other_shapes() {
    for input in [
        // inner separators are not removed
        UNICEF_IBAN,
        "XX99003300005013190122905",
        "0033000050131901229",
        "",
    ] {
        let verdict = verify_check_digit(input);
        assert!(!verdict.is_valid);
        assert!(!verdict.is_bare_nib);
        assert_eq!(verdict.check_digits, "");
    }

    let verdict = verify_check_digit("00330000501319012X905");
    assert!(!verdict.is_valid);
    assert!(verdict.is_bare_nib);
    assert_eq!(verdict.check_digits, "");
}

#[test]
fn validate_iban_residue() {
    assert_eq!(validate_iban("PT50003300005013190122905"), Ok(1));
    assert_eq!(validate_iban("PT50003300005013190122906"), Ok(28));
    // shorter than any IBAN
    assert_eq!(validate_iban("PT500033000050"), Ok(-1));
    assert_eq!(validate_iban("PT50"), Ok(-1));
    // unknown prefixes, even with correct arithmetic
    assert_eq!(validate_iban("XX99003300005013190122905"), Ok(-1));
    assert_eq!(validate_iban("DE75512108001245126199"), Ok(-1));
    assert_eq!(validate_iban("PT51003300005013190122905"), Ok(-1));

    assert_eq!(
        validate_iban(UNICEF_IBAN),
        Err(AccountError::InvalidCharacter {
            character: ' ',
            position: 4
        })
    );
}

#[test]
fn validate_iban_longer_than_any_iban() {
    let long = format!("PT50{}", "0".repeat(31));
    assert_eq!(validate_iban(&long), Ok(71));
    assert_eq!(AccountParser::default().check_iban(&long), Ok(71));

    let long = format!("PT50{}", "0".repeat(60));
    let residue = crate::encoding::encoded_mod97(&format!("{}PT50", "0".repeat(60))).unwrap();
    assert_eq!(validate_iban(&long), Ok(residue as i32));
}

#[test]
fn free_functions_share_the_default_parser() {
    assert!(std::ptr::eq(DEFAULT_PARSER.registry(), &*DEFAULT_REGISTRY));
    assert_eq!(parse_account(UNICEF_IBAN), DEFAULT_PARSER.parse(UNICEF_IBAN));
    assert_eq!(
        verify_check_digit("003300005013190122905"),
        DEFAULT_PARSER.verify_check_digit("003300005013190122905")
    );
}

#[test]
fn kind_names_match_metric_labels() {
    assert_eq!(<&str>::from(AccountKind::Iban), "iban");
    assert_eq!(<&str>::from(AccountKind::BareNib), "nib");
    assert_eq!(<&str>::from(AccountKind::Unrecognized), "unrecognized");
}

#[test]
fn check_iban_errors() {
    let parser = AccountParser::default();
    assert_eq!(
        parser.check_iban("XX99003300005013190122905"),
        Err(AccountError::UnrecognizedPrefix("XX99".to_string()))
    );
    assert_eq!(
        parser.check_iban("PT50"),
        Err(AccountError::TooShort { len: 4, min: 15 })
    );

    let registry = PrefixRegistry::new([("DE75", "Germany")]).unwrap();
    let parser = AccountParser::new(&registry);
    assert_eq!(parser.check_iban("DE75512108001245126199"), Ok(1));
    assert_eq!(parser.validate_iban("DE75512108001245126199"), Ok(1));
}

#[test]
fn should_submit_parsing_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let parser = AccountParser::default();
        parser.parse(UNICEF_IBAN);
        parser.parse("003300005013190122905");
        parser.parse("003300005013190122906");
        parser.parse("PT50 0033 0000 50A3 1901 2290 5");
        parser.parse("0033");
        parser.parse("ES91 2100 0418 4502 0005 1332");
    });

    let snapshot = snapshotter.snapshot().into_hashmap();
    let expected = vec![
        ("account.parsed", Some(("type", "iban")), 1),
        ("account.parsed", Some(("type", "nib")), 2),
        ("account.parsed", Some(("type", "unrecognized")), 1),
        ("account.rejected", Some(("reason", "clutter")), 1),
        ("account.rejected", Some(("reason", "too_short")), 1),
        ("account.check_digit_mismatch", None, 2),
    ];
    for (name, label, count) in expected {
        let labels: Vec<Label> = label
            .map(|(key, value)| Label::new(key, value))
            .into_iter()
            .collect();
        let metric_value = snapshot
            .get(&CompositeKey::new(Counter, Key::from_parts(name, labels)))
            .expect("metric not found");
        assert_eq!(
            metric_value,
            &(None, None, DebugValue::Counter(count)),
            "{name} {label:?}"
        );
    }
}

#[test]
fn metrics_carry_parser_labels() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let registry = PrefixRegistry::default();
        let parser = AccountParser::with_labels(&registry, &Labels::new(&[("source", "batch")]));
        parser.parse(UNICEF_IBAN);
    });

    let snapshot = snapshotter.snapshot().into_hashmap();
    let key = Key::from_parts(
        "account.parsed",
        vec![Label::new("source", "batch"), Label::new("type", "iban")],
    );
    assert_eq!(
        snapshot.get(&CompositeKey::new(Counter, key)),
        Some(&(None, None, DebugValue::Counter(1)))
    );
}
