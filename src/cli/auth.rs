use crate::{
    error,
    management::SessionManager,
    success,
    types::{LoginCredentials, Signup},
};

use super::{build_client, spinner};

pub async fn login(credentials: LoginCredentials) {
    let mut client = build_client(false).await;
    let username = credentials.username.clone();

    let pb = spinner("Requesting session token...");
    let result = client.login(credentials).await;
    pb.finish_and_clear();

    match result {
        Ok(token) => persist(&token, username).await,
        Err(e) => error!("Login failed. Err: {}", e),
    }
}

pub async fn signup(signup: Signup) {
    let mut client = build_client(false).await;
    let username = Some(signup.username.clone());

    let pb = spinner("Creating account...");
    let result = client.register(signup).await;
    pb.finish_and_clear();

    match result {
        Ok(token) => persist(&token, username).await,
        Err(e) => error!("Signup failed. Err: {}", e),
    }
}

pub async fn logout() {
    match SessionManager::clear().await {
        Ok(()) => success!("Session removed."),
        Err(e) => error!("Cannot remove session. Err: {}", e),
    }
}

async fn persist(token: &str, username: Option<String>) {
    let session = SessionManager::new(token, username);
    if let Err(e) = session.persist().await {
        error!("Failed to save session token: {}", e);
    }
    success!("Logged in. Session token saved.");
}
