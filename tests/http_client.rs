use serde_json::json;
use solex::{
    Diagram, HttpManagementApiFactory, Identity, ManagementApiRepository, Solution,
    SolutionRepository,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROUTE: &str = "/app/api/management/v1";

async fn engine_with_models(ids: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    let models: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "xml": format!("<definitions id=\"{}\"/>", id)}))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("{}/process_models", ROUTE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "processModels": models })))
        .mount(&server)
        .await;
    server
}

async fn open(server: &MockServer) -> ManagementApiRepository<HttpManagementApiFactory> {
    let mut repo = ManagementApiRepository::new(HttpManagementApiFactory::default());
    repo.open_path(&format!("{}/app/", server.uri()), Identity::new("tok"))
        .await
        .unwrap();
    repo
}

#[tokio::test]
async fn open_path_probes_list_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/process_models", ROUTE)))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"processModels": []})))
        .expect(1)
        .mount(&server)
        .await;

    let repo = open(&server).await;
    assert_eq!(repo.location(), Some(format!("{}/app", server.uri()).as_str()));
}

#[tokio::test]
async fn open_path_fails_when_engine_is_down() {
    let mut repo = ManagementApiRepository::new(HttpManagementApiFactory::default());
    let err = repo
        .open_path("http://127.0.0.1:1/app", Identity::new("tok"))
        .await
        .unwrap_err();
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn open_path_fails_when_no_management_api_is_served() {
    let server = MockServer::start().await;
    let mut repo = ManagementApiRepository::new(HttpManagementApiFactory::default());
    let err = repo
        .open_path(&format!("{}/app", server.uri()), Identity::new("tok"))
        .await
        .unwrap_err();
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn get_diagrams_maps_remote_models() {
    let server = engine_with_models(&["invoice-flow", "onboarding"]).await;
    let repo = open(&server).await;

    let diagrams = repo.get_diagrams().await.unwrap();
    assert_eq!(diagrams.len(), 2);
    assert_eq!(diagrams[0].id, "invoice-flow");
    assert_eq!(
        diagrams[1].uri,
        format!("{}/app/onboarding", server.uri())
    );
    assert_eq!(diagrams[1].xml, "<definitions id=\"onboarding\"/>");
}

#[tokio::test]
async fn get_diagram_by_name_found_and_missing() {
    let server = engine_with_models(&["invoice-flow"]).await;
    Mock::given(method("GET"))
        .and(path(format!("{}/process_models/invoice-flow", ROUTE)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "invoice-flow", "xml": "<x/>"})),
        )
        .mount(&server)
        .await;
    let repo = open(&server).await;

    let d = repo.get_diagram_by_name("invoice-flow").await.unwrap();
    assert_eq!(d.id, "invoice-flow");
    assert_eq!(d.xml, "<x/>");

    let err = repo.get_diagram_by_name("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn save_diagram_posts_overwrite_payload() {
    let server = engine_with_models(&["invoice-flow"]).await;
    Mock::given(method("POST"))
        .and(path(format!("{}/process_models/invoice-flow/update", ROUTE)))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"xml": "<new/>", "overwriteExisting": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let repo = open(&server).await;

    let d = Diagram {
        id: "invoice-flow".into(),
        name: "invoice-flow".into(),
        xml: "<new/>".into(),
        uri: format!("{}/app/invoice-flow", server.uri()),
    };
    repo.save_diagram(&d, None).await.unwrap();
}

#[tokio::test]
async fn save_solution_fails_when_one_upsert_is_refused() {
    let server = engine_with_models(&[]).await;
    for (id, status) in [("a", 204), ("b", 500), ("c", 204)] {
        Mock::given(method("POST"))
            .and(path(format!("{}/process_models/{}/update", ROUTE, id)))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;
    }
    let repo = open(&server).await;

    let diagram = |id: &str| Diagram {
        id: id.into(),
        name: id.into(),
        xml: "<x/>".into(),
        uri: format!("local/{}", id),
    };
    let mut solution = Solution {
        uri: "local".into(),
        diagrams: vec![diagram("a"), diagram("b"), diagram("c")],
    };
    let err = repo
        .save_solution(&mut solution, Some(&format!("{}/app", server.uri())))
        .await
        .unwrap_err();
    assert!(err.is_rejected());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn delete_diagram_calls_delete_route() {
    let server = engine_with_models(&["a"]).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/process_models/a/delete", ROUTE)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let repo = open(&server).await;

    let a = repo.get_diagrams().await.unwrap().remove(0);
    repo.delete_diagram(&a).await.unwrap();
}
