use hypemcli::hypem::params::*;
use hypemcli::types::{ParamValue, Params, TokenArg};

fn text(value: &str) -> ParamValue {
    ParamValue::Text(value.to_string())
}

#[test]
fn test_format_param_truthy_values() {
    assert_eq!(format_param("q", &text("jazz"), None), "q=jazz&");
    assert_eq!(format_param("count", &ParamValue::Int(20), None), "count=20&");
    assert_eq!(format_param("hydrate", &ParamValue::Bool(true), None), "hydrate=1&");
}

#[test]
fn test_format_param_falsy_values_are_dropped() {
    assert_eq!(format_param("q", &ParamValue::Absent, None), "");
    assert_eq!(format_param("q", &text(""), None), "");
    assert_eq!(format_param("page", &ParamValue::Int(0), None), "");
    assert_eq!(format_param("hydrate", &ParamValue::Bool(false), None), "");
}

#[test]
fn test_format_param_encodes_values() {
    assert_eq!(
        format_param("q", &text("drum & bass"), None),
        "q=drum%20%26%20bass&"
    );
}

#[test]
fn test_format_param_token_placeholder() {
    // The placeholder takes the stored token
    assert_eq!(
        format_param(TOKEN_PARAM, &ParamValue::Bool(true), Some("abc123")),
        "hm_token=abc123&"
    );

    // Without a stored token nothing is sent
    assert_eq!(format_param(TOKEN_PARAM, &ParamValue::Bool(true), None), "");

    // An explicit token wins over the stored one
    assert_eq!(
        format_param(TOKEN_PARAM, &text("explicit"), Some("stored")),
        "hm_token=explicit&"
    );

    // Other parameters never read the stored token
    assert_eq!(format_param("hydrate", &ParamValue::Bool(true), Some("stored")), "hydrate=1&");
}

#[test]
fn test_resolve_placeholder() {
    assert_eq!(
        resolve_placeholder(TOKEN_PARAM, &ParamValue::from(TokenArg::Stored), Some("t")),
        text("t")
    );
    assert_eq!(
        resolve_placeholder(TOKEN_PARAM, &ParamValue::from(TokenArg::Stored), None),
        ParamValue::Absent
    );
    assert_eq!(
        resolve_placeholder(TOKEN_PARAM, &ParamValue::from(TokenArg::None), Some("t")),
        ParamValue::Absent
    );
}

#[test]
fn test_format_many_keeps_order_and_skips_excluded() {
    let params = Params::new()
        .with("siteid", "123")
        .with("q", "house")
        .with("page", 2u32)
        .with("count", ParamValue::Absent)
        .with(TOKEN_PARAM, true);

    let query = format_many(&params, &["siteid".to_string()], Some("tok"));
    assert_eq!(query, "q=house&page=2&hm_token=tok&");

    assert_eq!(format_many(&Params::new(), &[], None), "");
}

#[test]
fn test_payload() {
    let params = Params::new()
        .with("playlist_id", 1u8)
        .with("itemid", "2fv7a")
        .with("newsletter", false)
        .with(TOKEN_PARAM, "tok");

    let form = payload(&params, &["playlist_id".to_string()], None);
    assert_eq!(
        form,
        vec![
            ("itemid".to_string(), "2fv7a".to_string()),
            ("hm_token".to_string(), "tok".to_string()),
        ]
    );
}

#[test]
fn test_params_set_keeps_position() {
    let mut params = Params::new().with("a", 1i64).with("b", 2i64);
    params.set("a", 3i64);

    let names: Vec<&str> = params.names().collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(params.get("a"), Some(&ParamValue::Int(3)));

    assert_eq!(params.remove("a"), Some(ParamValue::Int(3)));
    assert_eq!(params.len(), 1);
    assert!(params.remove("missing").is_none());
}

#[test]
fn test_param_value_presence() {
    // Zero is present (playlist 0) but falsy
    assert!(ParamValue::Int(0).is_present());
    assert!(!ParamValue::Int(0).is_truthy());

    assert!(ParamValue::Bool(false).is_present());
    assert!(!ParamValue::Absent.is_present());
    assert!(!text("").is_present());

    assert_eq!(ParamValue::from(None::<&str>), ParamValue::Absent);
    assert_eq!(ParamValue::from(Some(5u32)), ParamValue::Int(5));
}
