use crate::{error, success, warning};

use super::{build_client, spinner};

pub async fn tags(track_id: String) {
    let client = build_client(false).await;

    let pb = spinner("Reading track page...");
    let result = client.get_track_tags(&track_id).await;
    pb.finish_and_clear();

    match result {
        Ok(tags) if tags.is_empty() => warning!("No tags for track {}", track_id),
        Ok(tags) => {
            for tag in tags {
                println!("{}", tag);
            }
        }
        Err(e) => error!("Cannot read tags. Err: {}", e),
    }
}

pub async fn stream(track_id: String) {
    let client = build_client(false).await;

    let pb = spinner("Resolving stream...");
    let result = client.get_track_stream(&track_id).await;
    pb.finish_and_clear();

    match result {
        Ok(url) if url.is_empty() => warning!("Track {} is not streamable", track_id),
        Ok(url) => success!("{}", url),
        Err(e) => error!("Cannot resolve stream. Err: {}", e),
    }
}
