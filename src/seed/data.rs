use anyhow::Result;
use serde_json::json;

use crate::model::{Id, NewEndpoint, NewExampleSchema, NewProxy, RequirementDescriptor};
use crate::store::traits::Store;

/// Ids of the demo rows created by [`load_seed_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededSandbox {
    pub proxy_id: Id,
    pub create_transfer_id: Id,
    pub get_account_id: Id,
    pub list_payments_id: Id,
}

/// Load a published "Payments" proxy with three playable endpoints
pub async fn load_seed_data<S: Store>(store: &S) -> Result<SeededSandbox> {
    let proxy = store
        .create_proxy(NewProxy {
            name: "Payments API".to_string(),
            is_published: true,
        })
        .await?;
    log::info!("Seeded proxy '{}' ({})", proxy.name, proxy.id);

    // Plays back purely on the request body
    let create_transfer = store
        .create_endpoint(NewEndpoint {
            proxy_id: proxy.id,
            name: "Create transfer".to_string(),
            method: "POST".to_string(),
            path: "/v1/transfers".to_string(),
            path_params: vec![],
            header_param: vec![],
        })
        .await?;
    store
        .create_schema(NewExampleSchema::new(
            create_transfer.id,
            "200",
            r#"{"amount":1000,"currency":"EUR","to":"acc_2"}"#,
            r#"{"id":"tr_1","status":"pending"}"#,
        ))
        .await?;
    store
        .create_schema(NewExampleSchema::new(
            create_transfer.id,
            "400",
            r#"{"amount":-1,"currency":"EUR","to":"acc_2"}"#,
            r#"{"error":"amount must be positive"}"#,
        ))
        .await?;

    let get_account = store
        .create_endpoint(NewEndpoint {
            proxy_id: proxy.id,
            name: "Get account".to_string(),
            method: "GET".to_string(),
            path: "/v1/accounts/{id}".to_string(),
            path_params: vec![RequirementDescriptor::required("id", json!("acc_1"))],
            header_param: vec![],
        })
        .await?;
    store
        .create_schema(NewExampleSchema::new(
            get_account.id,
            "200",
            "null",
            r#"{"id":"acc_1","balance":2500}"#,
        ))
        .await?;
    store
        .create_schema(NewExampleSchema::new(
            get_account.id,
            "401",
            "null",
            r#"{"error":"unknown account"}"#,
        ))
        .await?;

    let list_payments = store
        .create_endpoint(NewEndpoint {
            proxy_id: proxy.id,
            name: "List payments".to_string(),
            method: "GET".to_string(),
            path: "/v1/payments".to_string(),
            path_params: vec![],
            header_param: vec![
                RequirementDescriptor::required("Authorization", json!("Bearer sandbox-token")),
                RequirementDescriptor::optional("X-Request-Id", json!("")),
            ],
        })
        .await?;
    store
        .create_schema(NewExampleSchema::new(
            list_payments.id,
            "200",
            "null",
            r#"{"items":[{"id":"pay_1","amount":1000}],"total":1}"#,
        ))
        .await?;
    store
        .create_schema(NewExampleSchema::new(
            list_payments.id,
            "401",
            "null",
            r#"{"error":"missing or invalid token"}"#,
        ))
        .await?;

    Ok(SeededSandbox {
        proxy_id: proxy.id,
        create_transfer_id: create_transfer.id,
        get_account_id: get_account.id,
        list_payments_id: list_payments.id,
    })
}
