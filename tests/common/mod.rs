//! Common test utilities

use berthwatch::config::Config;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock terminal serves the schedule search on
pub const SCHEDULE_PATH: &str = "/programacao-navios/pesquisar";

/// Raw terminal entry in the shape the search API returns
pub fn schedule_entry(vessel: &str, voyage: &str, carrier: &str, forecast: &str) -> Value {
    json!({
        "Navio": vessel,
        "Viagem": voyage,
        "ViagemArmador": format!("{voyage}-C"),
        "ArmadorNome": carrier,
        "PrevisaoAtracacao": forecast,
        "Situacao": "PREVISTO",
    })
}

/// Wrap entries the way the terminal does
pub fn wrapped(entries: Vec<Value>) -> Value {
    json!({ "Objeto": entries, "Sucesso": true })
}

/// Configuration pointed at a mock server
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.url = format!("{}{SCHEDULE_PATH}", server.uri());
    config.api.request_timeout_secs = 2;
    config
}

/// Serve `body` for one page number
pub async fn mount_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(SCHEDULE_PATH))
        .and(query_param("PaginaAtual", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve the given pages followed by an empty page
#[allow(dead_code)]
pub async fn mount_schedule(server: &MockServer, pages: Vec<Vec<Value>>) {
    let last = u32::try_from(pages.len()).expect("page count") + 1;
    for (index, entries) in pages.into_iter().enumerate() {
        let page = u32::try_from(index).expect("page index") + 1;
        mount_page(server, page, wrapped(entries)).await;
    }
    mount_page(server, last, wrapped(Vec::new())).await;
}

/// Two entries for the same voyage, differing only in case and forecast
#[allow(dead_code)]
pub fn bruna_duplicates() -> Vec<Value> {
    vec![
        schedule_entry("MSC BRUNA", "123e", "MSC", "2025-01-10T10:00Z"),
        schedule_entry("MSC BRUNA", "123E", "MSC", "2025-01-12T08:00Z"),
    ]
}
