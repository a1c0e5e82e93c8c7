use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::image::MediaType;
use crate::prompt::WorkflowCategory;

fn test_image() -> DiagramImage {
    DiagramImage::new(MediaType::Jpeg, vec![0xFF, 0xD8, 0xFF, 0xE0]).unwrap()
}

fn options() -> PromptOptions {
    PromptOptions {
        project_name: "Test Project".to_string(),
        category: WorkflowCategory::General,
        description: None,
        transcript: None,
    }
}

fn generator_for(server: &MockServer) -> WorkflowGenerator {
    let client = AnthropicClient::new("test-key", Duration::from_secs(5))
        .with_base_url(server.uri());
    WorkflowGenerator::new(client, "claude-3-5-sonnet-20241022", 2000)
}

fn model_reply(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_gen",
        "model": "claude-3-5-sonnet-20241022",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 1500, "output_tokens": 400}
    })
}

fn workflow_text() -> String {
    json!({
        "name": "Lead Pipeline",
        "nodes": [
            {
                "id": "chatTrigger",
                "type": "n8n-nodes-base.webhook",
                "name": "When chat message received",
                "position": [100, 100],
                "parameters": {"path": "chat-webhook"}
            },
            {
                "id": "researchAgent",
                "type": "n8n-nodes-base.aiAgent",
                "name": "Research Agent",
                "position": [300, 100],
                "parameters": {"agentType": "tools"}
            }
        ],
        "connections": {
            "chatTrigger": {
                "main": [[{"node": "researchAgent", "type": "main", "index": 0}]]
            }
        }
    })
    .to_string()
}

#[test]
fn test_build_request_shape() {
    let client = AnthropicClient::new("k", Duration::from_secs(1));
    let generator = WorkflowGenerator::new(client, "claude-3-5-sonnet-20241022", 2000);

    let request = generator.build_request(&test_image(), &options());
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["model"], "claude-3-5-sonnet-20241022");
    assert_eq!(json["max_tokens"], 2000);
    let blocks = json["messages"][0]["content"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["type"], "text");
    assert!(blocks[0]["text"].as_str().unwrap().contains("Test Project"));
    assert_eq!(blocks[1]["type"], "image");
    assert_eq!(blocks[1]["source"]["media_type"], "image/jpeg");
    assert_eq!(blocks[1]["source"]["data"], "/9j/4A==");
}

#[tokio::test]
async fn test_generate_with_unfenced_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(&workflow_text())))
        .mount(&server)
        .await;

    let generated = generator_for(&server)
        .generate(&test_image(), &options())
        .await
        .unwrap();

    assert_eq!(generated.node_count(), 2);
    assert_eq!(generated.workflow.name.as_deref(), Some("Lead Pipeline"));
    assert!(generated.report.is_valid());
    assert_eq!(generated.project_name, "Test Project");
    assert_eq!(generated.placements.len(), 2);
}

#[tokio::test]
async fn test_generate_with_fenced_json_matches_unfenced() {
    let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", workflow_text());
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(&fenced)))
        .mount(&server)
        .await;

    let generated = generator_for(&server)
        .generate(&test_image(), &options())
        .await
        .unwrap();

    assert_eq!(generated.node_count(), 2);
    assert_eq!(generated.workflow.name.as_deref(), Some("Lead Pipeline"));
}

#[tokio::test]
async fn test_generate_repairs_node_mapping() {
    let server = MockServer::start().await;
    let text = json!({
        "nodes": {
            "trigger": {"type": "n8n-nodes-base.webhook", "name": "Webhook"},
            "step": {"type": "n8n-nodes-base.set"}
        },
        "connections": {
            "trigger": {"main": [{"node": "step"}]}
        }
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(&text)))
        .mount(&server)
        .await;

    let generated = generator_for(&server)
        .generate(&test_image(), &options())
        .await
        .unwrap();

    assert_eq!(generated.node_count(), 2);
    assert!(generated.report.is_valid());
    // Repaired documents carry every invariant the importer needs.
    for node in &generated.workflow.nodes {
        assert!(!node.name.is_empty());
    }
    let edges = &generated.workflow.connections["trigger"].main;
    assert_eq!(edges[0][0].node, "step");
    assert_eq!(edges[0][0].kind, "main");
}

#[tokio::test]
async fn test_generate_corrects_unprefixed_kinds() {
    let server = MockServer::start().await;
    let text = json!({
        "nodes": [
            {"id": "a", "name": "Chat Trigger", "type": "chat trigger", "position": [0, 0]},
            {"id": "b", "name": "Mystery Step", "type": "???", "position": [0, 0]}
        ],
        "connections": {}
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(&text)))
        .mount(&server)
        .await;

    let generated = generator_for(&server)
        .generate(&test_image(), &options())
        .await
        .unwrap();

    // "chat trigger" is a webhook alias; the mystery node takes the fallback.
    assert_eq!(generated.workflow.nodes[0].kind, "n8n-nodes-base.webhook");
    assert_eq!(generated.workflow.nodes[1].kind, "n8n-nodes-base.function");
    // Corrected nodes with empty bags inherit catalog defaults.
    assert_eq!(generated.workflow.nodes[0].parameters["httpMethod"], "POST");
}

#[tokio::test]
async fn test_generate_trusts_prefixed_kinds_outside_the_catalog() {
    let server = MockServer::start().await;
    let text = json!({
        "nodes": [
            {"id": "a", "name": "Chain", "type": "n8n-nodes-base.chainLlm", "position": [0, 0], "parameters": {}}
        ],
        "connections": {}
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(&text)))
        .mount(&server)
        .await;

    let generated = generator_for(&server)
        .generate(&test_image(), &options())
        .await
        .unwrap();

    assert_eq!(generated.workflow.nodes[0].kind, "n8n-nodes-base.chainLlm");
}

#[tokio::test]
async fn test_generate_surfaces_malformed_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply("sorry, no diagram")))
        .mount(&server)
        .await;

    let err = generator_for(&server)
        .generate(&test_image(), &options())
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::MalformedJson(_)));
}

#[tokio::test]
async fn test_generate_surfaces_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply("")))
        .mount(&server)
        .await;

    let err = generator_for(&server)
        .generate(&test_image(), &options())
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::EmptyResponse));
}

#[tokio::test]
async fn test_generate_surfaces_provider_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let err = generator_for(&server)
        .generate(&test_image(), &options())
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Provider(_)));
}
