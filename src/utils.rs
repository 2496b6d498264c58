use rand::Rng;

use crate::types::{ParamValue, Params};

/// 16 hex characters (64 random bits) identifying this client device.
pub fn generate_device_id() -> String {
    format!("{:016x}", rand::rng().random::<u64>())
}

/// Names of the `{placeholder}` segments of a path template, in order.
pub fn path_params(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        names.push(rest[start + 1..start + len].to_string());
        rest = &rest[start + len + 1..];
    }
    names
}

/// Fills the placeholders of `template` from `params`, percent-encoding each
/// value. Returns the name of the first placeholder without a value.
pub fn render_path(template: &str, params: &Params) -> Result<String, String> {
    let mut path = template.to_string();
    for name in path_params(template) {
        let value = match params.get(&name) {
            Some(v) if v.is_present() => v.to_string(),
            _ => return Err(name),
        };
        path = path.replace(
            &format!("{{{name}}}"),
            &urlencoding::encode(&value),
        );
    }
    Ok(path)
}

/// Parses a `name=value` command-line argument. Integers become
/// [`ParamValue::Int`], `true`/`false` become booleans.
pub fn parse_key_value(arg: &str) -> Result<(String, ParamValue), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got \"{arg}\""))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in \"{arg}\""));
    }

    let value = match value {
        "true" => ParamValue::Bool(true),
        "false" => ParamValue::Bool(false),
        // keep identifiers like "007" as text
        v if v.len() > 1 && v.starts_with('0') => ParamValue::Text(v.to_string()),
        v => match v.parse::<i64>() {
            Ok(i) => ParamValue::Int(i),
            Err(_) => ParamValue::Text(v.to_string()),
        },
    };
    Ok((name.to_string(), value))
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
