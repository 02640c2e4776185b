//! MCP round trips over an in-memory duplex transport.

use bold_core::{FetchConfig, FetchPipeline};
use bold_mcp::BoldMcp;
use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo, ErrorCode};
use rmcp::service::{RoleClient, RunningService};
use rmcp::{ClientHandler, ServiceError, ServiceExt};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, Default)]
struct TestClient;

impl ClientHandler for TestClient {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

type ServerTask = JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>;

async fn connect(base_url: String) -> (RunningService<RoleClient, TestClient>, ServerTask) {
    let pipeline = FetchPipeline::new(FetchConfig::new(base_url))
        .unwrap_or_else(|err| panic!("failed to build pipeline: {err}"));
    let server = BoldMcp::new(pipeline);
    let (server_transport, client_transport) = tokio::io::duplex(64 * 1024);

    let server_task: ServerTask = tokio::spawn(async move {
        let service = server.serve(server_transport).await?;
        service.waiting().await?;
        Ok(())
    });
    let client = TestClient
        .serve(client_transport)
        .await
        .unwrap_or_else(|err| panic!("client failed to connect: {err}"));
    (client, server_task)
}

async fn shutdown(client: RunningService<RoleClient, TestClient>, server_task: ServerTask) {
    client.cancel().await.expect("client shuts down");
    let _ = server_task.await;
}

fn call(name: &str, arguments: Value) -> CallToolRequestParams {
    CallToolRequestParams {
        meta: None,
        name: name.to_string().into(),
        arguments: arguments.as_object().cloned(),
        task: None,
    }
}

fn text_of(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|content| content.raw.as_text())
        .map(|text| text.text.as_str())
        .expect("tool result has text content")
}

#[tokio::test]
async fn lists_search_and_support_tools() {
    let (client, server_task) = connect("http://127.0.0.1:9/API_Public".to_string()).await;

    let tools = client.list_tools(None).await.expect("list_tools succeeds");
    let mut names: Vec<&str> = tools.tools.iter().map(|tool| tool.name.as_ref()).collect();
    names.sort_unstable();

    assert_eq!(names, ["combined-search", "health", "help", "specimen-search"]);
    shutdown(client, server_task).await;
}

#[tokio::test]
async fn unknown_tool_fails_the_call() {
    let (client, server_task) = connect("http://127.0.0.1:9/API_Public".to_string()).await;

    let err = client
        .call_tool(call("sequence-search", json!({"taxon": "Aves"})))
        .await
        .expect_err("unknown tools are protocol errors");

    match err {
        ServiceError::McpError(data) => {
            assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
            assert_eq!(data.message, "unknown tool: sequence-search");
        }
        other => panic!("expected an MCP error, got {other}"),
    }
    shutdown(client, server_task).await;
}

#[tokio::test]
async fn specimen_search_round_trip() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/API_Public/specimen"))
        .and(query_param("bin", "BOLD:AAA4474"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("processid\tbin_uri\nP-7\tBOLD:AAA4474\n"),
        )
        .expect(1)
        .mount(&mock)
        .await;

    let (client, server_task) = connect(format!("{}/API_Public", mock.uri())).await;
    let result = client
        .call_tool(call("specimen-search", json!({"bin": "BOLD:AAA4474", "geo": null})))
        .await
        .expect("search succeeds");

    let (label, payload) = text_of(&result)
        .split_once('\n')
        .expect("label line precedes payload");
    assert_eq!(label, "Specimen returned:");
    let payload: Value = serde_json::from_str(payload).expect("payload is JSON");
    assert_eq!(payload, json!([{"processid": "P-7", "bin_uri": "BOLD:AAA4474"}]));
    shutdown(client, server_task).await;
}

#[tokio::test]
async fn unsupported_format_is_a_message_payload() {
    let (client, server_task) = connect("http://127.0.0.1:9/API_Public".to_string()).await;

    let result = client
        .call_tool(call("combined-search", json!({"taxon": "Aves", "format": "csv"})))
        .await
        .expect("classified failures are not protocol errors");

    assert_eq!(
        text_of(&result),
        "Specimen with sequences returned:\n{\"message\":\"unsupported format requested: csv\"}"
    );
    shutdown(client, server_task).await;
}
