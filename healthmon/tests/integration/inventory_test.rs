//! Integration Test: インベントリ取り込み → チェック

use crate::support::monitor::{create_test_state, test_config};
use healthmon::db::{endpoints, services};
use healthmon::inventory::{import_inventory, Inventory};
use healthmon::types::ServiceStatus;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_imported_default_endpoint_is_checked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let yaml = format!("services:\n  - name: reddit\n    url: {}/\n", server.uri());
    let inventory = Inventory::from_yaml(&yaml).unwrap();

    let state = create_test_state(test_config()).await;
    let summary = import_inventory(&state.db_pool, &inventory).await.unwrap();
    assert_eq!(summary.endpoints_created, 1);

    let service = services::get_service_by_name(&state.db_pool, "reddit")
        .await
        .unwrap()
        .unwrap();
    let list = endpoints::list_endpoints_for_service(&state.db_pool, service.id)
        .await
        .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].url, format!("{}/health", server.uri()));
    assert_eq!(list[0].timeout_ms, 3000);

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 1);
    let service = services::get_service(&state.db_pool, service.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(service.status, ServiceStatus::Healthy);
}
