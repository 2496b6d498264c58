use tabled::Table;

use crate::{
    error, info,
    types::{EndpointDef, EndpointTableRow},
    utils,
};

use super::{build_client, spinner};

pub async fn endpoints(refresh: bool) {
    let mut client = build_client(false).await;

    if refresh {
        let pb = spinner("Fetching API documentation...");
        let result = client.fetch_endpoint_table().await;
        pb.finish_and_clear();

        match result {
            Ok(table) => client.set_endpoints(table),
            Err(e) => error!("Cannot load API documentation. Err: {}", e),
        }
    }

    let mut defs: Vec<&EndpointDef> = client.endpoints().iter().collect();
    defs.sort_by(|a, b| a.path.cmp(&b.path).then(a.name.cmp(&b.name)));

    let rows: Vec<EndpointTableRow> = defs.into_iter().map(row).collect();
    let count = rows.len();
    println!("{}", Table::new(rows));
    info!("{} endpoints", count);
}

fn row(def: &EndpointDef) -> EndpointTableRow {
    let params = def
        .params
        .iter()
        .filter(|p| p.name != "hm_token")
        .map(|p| {
            let mut name = p.name.clone();
            if p.required {
                name.push('*');
            }
            if !p.allowed.is_empty() {
                name.push_str(&format!("[{}]", p.allowed.join("|")));
            }
            name
        })
        .collect::<Vec<_>>()
        .join(", ");

    EndpointTableRow {
        name: def.name.clone(),
        verb: def.verb.to_string(),
        path: def.path.clone(),
        auth: if def.requires_token() { "yes" } else { "" }.to_string(),
        params: utils::truncate(&params, 60),
    }
}
