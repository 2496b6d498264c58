use crate::{
    error,
    types::{ParamValue, Params},
};

use super::{build_client, spinner};

pub async fn call(
    operation: String,
    params: Vec<(String, ParamValue)>,
    token: Option<String>,
    use_session: bool,
) {
    let client = build_client(use_session).await;

    let mut params: Params = params.into_iter().collect();
    if let Some(token) = token {
        params.set("hm_token", token);
    } else if use_session && client.session_token().is_some() {
        // only endpoints declaring hm_token accept it
        let accepts_token = client
            .endpoints()
            .resolve(&operation)
            .is_some_and(|e| e.param("hm_token").is_some());
        if accepts_token && params.get("hm_token").is_none() {
            params.set("hm_token", true);
        }
    }

    let pb = spinner(&format!("Calling {}...", operation));
    let result = client.call(&operation, params).await;
    pb.finish_and_clear();

    match result {
        Ok(json) => match serde_json::to_string_pretty(&json) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Cannot render response. Err: {}", e),
        },
        Err(e) => error!("{} failed. Err: {}", operation, e),
    }
}
