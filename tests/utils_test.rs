use hypemcli::types::{ParamValue, Params};
use hypemcli::utils::*;

#[test]
fn test_generate_device_id() {
    let id = generate_device_id();

    // 64 random bits rendered as 16 lowercase hex characters
    assert_eq!(id.len(), 16);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    // Two generated ids should be different
    let id2 = generate_device_id();
    assert_ne!(id, id2);
}

#[test]
fn test_path_params() {
    assert_eq!(path_params("/tracks"), Vec::<String>::new());
    assert_eq!(path_params("/tracks/{itemid}"), vec!["itemid"]);
    assert_eq!(
        path_params("/me/playlists/{playlist_id}/items/{itemid}"),
        vec!["playlist_id", "itemid"]
    );

    // An unterminated placeholder is ignored
    assert_eq!(path_params("/broken/{oops"), Vec::<String>::new());
}

#[test]
fn test_render_path() {
    let params = Params::new().with("itemid", "2fv7a");
    assert_eq!(render_path("/tracks/{itemid}", &params).unwrap(), "/tracks/2fv7a");

    // Templates without placeholders pass through
    assert_eq!(render_path("/popular", &Params::new()).unwrap(), "/popular");
}

#[test]
fn test_render_path_keeps_zero_identifiers() {
    let params = Params::new().with("username", "someone").with("playlist_id", 0u8);

    assert_eq!(
        render_path("/users/{username}/playlists/{playlist_id}", &params).unwrap(),
        "/users/someone/playlists/0"
    );
}

#[test]
fn test_render_path_encodes_values() {
    let params = Params::new().with("artist", "Simon & Garfunkel");

    assert_eq!(
        render_path("/artists/{artist}", &params).unwrap(),
        "/artists/Simon%20%26%20Garfunkel"
    );
}

#[test]
fn test_render_path_reports_missing_placeholder() {
    let params = Params::new().with("playlist_id", 1u8);

    let err = render_path("/me/playlists/{playlist_id}/items/{itemid}", &params).unwrap_err();
    assert_eq!(err, "itemid");

    // Empty text counts as missing
    let params = Params::new().with("itemid", "");
    assert_eq!(render_path("/tracks/{itemid}", &params).unwrap_err(), "itemid");
}

#[test]
fn test_parse_key_value() {
    assert_eq!(
        parse_key_value("q=jazz").unwrap(),
        ("q".to_string(), ParamValue::Text("jazz".to_string()))
    );
    assert_eq!(
        parse_key_value("count=20").unwrap(),
        ("count".to_string(), ParamValue::Int(20))
    );
    assert_eq!(
        parse_key_value("playlist_id=0").unwrap(),
        ("playlist_id".to_string(), ParamValue::Int(0))
    );
    assert_eq!(
        parse_key_value("hydrate=true").unwrap(),
        ("hydrate".to_string(), ParamValue::Bool(true))
    );
    assert_eq!(
        parse_key_value("hydrate=false").unwrap(),
        ("hydrate".to_string(), ParamValue::Bool(false))
    );
}

#[test]
fn test_parse_key_value_edge_cases() {
    // Identifiers with leading zeros stay text
    assert_eq!(
        parse_key_value("itemid=007").unwrap().1,
        ParamValue::Text("007".to_string())
    );

    // Only the first '=' splits
    assert_eq!(
        parse_key_value("q=a=b").unwrap().1,
        ParamValue::Text("a=b".to_string())
    );

    // Empty value is allowed and falsy
    assert_eq!(parse_key_value("q=").unwrap().1, ParamValue::Text(String::new()));

    assert!(parse_key_value("no_equals_sign").is_err());
    assert!(parse_key_value("=value").is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is too long", 8), "this is…");
    assert_eq!(truncate("", 5), "");
}
