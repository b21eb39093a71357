//! Custom setter hook behavior.

use remodel_core::{
    deep_copy, deep_copy_slice_with_setter, deep_copy_with_setter, CopyError, CopyResult, Record,
    Shape, Slot, Value,
};

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct TextSource {
    pub title: String,
    pub votes: String,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct ParsedDestination {
    pub title: String,
    pub votes: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Outer {
    pub inner: TextSource,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct OuterDestination {
    pub inner: ParsedDestination,
}

/// Helper: a hook that parses string sources into i64 destinations.
fn parse_votes(value: &Value, slot: &mut Slot<'_>) -> CopyResult<bool> {
    if let (Value::Str(text), Shape::I64) = (value, &slot.shape()) {
        match text.parse::<i64>() {
            Ok(parsed) => {
                slot.set(Value::I64(parsed))?;
                return Ok(true);
            }
            Err(_) => return Err(CopyError::setter(format!("bad number {text}"))),
        }
    }
    Ok(false)
}

#[test]
fn hook_claims_fields_the_rules_decline() {
    let src = TextSource {
        title: "tally".to_string(),
        votes: "41".to_string(),
    };
    let mut dst = ParsedDestination::default();
    deep_copy_with_setter(&src, &mut dst, parse_votes).unwrap();

    assert_eq!(dst.title, "tally");
    assert_eq!(dst.votes, 41);
}

#[test]
fn always_declining_hook_matches_deep_copy() {
    let src = TextSource {
        title: "tally".to_string(),
        votes: "41".to_string(),
    };

    let mut plain = ParsedDestination::default();
    deep_copy(&src, &mut plain).unwrap();

    let mut with_hook = ParsedDestination::default();
    deep_copy_with_setter(&src, &mut with_hook, |_, _| Ok(false)).unwrap();

    assert_eq!(plain, with_hook);
    assert_eq!(plain.votes, 0, "no rule converts string to i64 on its own");
}

#[test]
fn hook_errors_abort_with_the_field_name() {
    let src = TextSource {
        title: "kept".to_string(),
        votes: "x".to_string(),
    };
    let mut dst = ParsedDestination::default();
    let err = deep_copy_with_setter(&src, &mut dst, parse_votes).unwrap_err();

    assert_eq!(err.to_string(), "field votes: custom setter: bad number x");
    assert_eq!(
        dst.title, "kept",
        "fields copied before the failure keep their new values"
    );
}

#[test]
fn nested_hook_errors_carry_the_full_path() {
    let src = Outer {
        inner: TextSource {
            title: "t".to_string(),
            votes: "x".to_string(),
        },
    };
    let mut dst = OuterDestination::default();
    let err = deep_copy_with_setter(&src, &mut dst, parse_votes).unwrap_err();

    assert_eq!(
        err.to_string(),
        "field inner: field votes: custom setter: bad number x"
    );
}

#[test]
fn hook_reaches_fields_inside_nested_records() {
    let src = Outer {
        inner: TextSource {
            title: "t".to_string(),
            votes: "12".to_string(),
        },
    };
    let mut dst = OuterDestination::default();
    deep_copy_with_setter(&src, &mut dst, parse_votes).unwrap();

    assert_eq!(dst.inner.votes, 12);
}

#[test]
fn hook_sees_only_declined_fields() {
    let src = TextSource {
        title: "tally".to_string(),
        votes: "41".to_string(),
    };
    let mut dst = ParsedDestination::default();
    let mut seen = Vec::new();
    deep_copy_with_setter(&src, &mut dst, |value, slot| {
        seen.push((slot.name(), value.kind_name(), slot.shape().to_string()));
        Ok(false)
    })
    .unwrap();

    assert_eq!(
        seen,
        vec![("votes", "string", "i64".to_string())],
        "same-kind fields convert before the hook runs"
    );
}

#[test]
fn hook_may_claim_without_writing() {
    let src = TextSource {
        title: "tally".to_string(),
        votes: "41".to_string(),
    };
    let mut dst = ParsedDestination {
        title: String::new(),
        votes: 7,
    };
    deep_copy_with_setter(&src, &mut dst, |_, slot| {
        assert_eq!(slot.get(), Some(Value::I64(7)));
        Ok(true)
    })
    .unwrap();

    assert_eq!(dst.votes, 7, "a claim without a write leaves the field as is");
}

#[test]
fn slice_hook_errors_carry_the_element_index() {
    let src = vec![
        TextSource {
            title: "ok".to_string(),
            votes: "1".to_string(),
        },
        TextSource {
            title: "bad".to_string(),
            votes: "x".to_string(),
        },
    ];
    let mut dst: Vec<ParsedDestination> = Vec::new();
    let err = deep_copy_slice_with_setter(&src, &mut dst, parse_votes).unwrap_err();

    assert_eq!(
        err.to_string(),
        "element 1: field votes: custom setter: bad number x"
    );
}
