//! Integration tests for a supervisor handing work to agents and receiving it back
//!
//! The host side (model output parsing, history, graph scopes) is simulated
//! with plain values so the tests exercise only what this crate produces.

use std::collections::HashSet;

use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestMessage, ChatCompletionToolType,
    FunctionCall,
};
use serde_json::json;
use tower::{Service, ServiceBuilder, ServiceExt};

use tower_llm_handoff::{
    create_handoff_back_messages, GraphScope, HandoffConfig, HandoffError, Message, Role,
    ToolInvocation, ToolOutput, ToolRoster,
};

/// What a host would build from a model's tool call.
fn invocation_from(call: &ChatCompletionMessageToolCall) -> ToolInvocation {
    ToolInvocation::new(
        call.id.clone(),
        call.function.name.clone(),
        serde_json::from_str(&call.function.arguments).unwrap_or(json!({})),
    )
}

/// Every tool result must answer a tool call issued earlier in the transcript.
fn assert_tool_results_correlate(transcript: &[ChatCompletionRequestMessage]) {
    let mut issued = HashSet::new();
    for msg in transcript {
        match msg {
            ChatCompletionRequestMessage::Assistant(a) => {
                for tc in a.tool_calls.iter().flatten() {
                    issued.insert(tc.id.clone());
                }
            }
            ChatCompletionRequestMessage::Tool(t) => {
                assert!(
                    issued.contains(&t.tool_call_id),
                    "tool result {} has no matching call",
                    t.tool_call_id
                );
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_supervisor_round_trip() {
    let mut roster =
        ToolRoster::for_agents(["billing", "research"], &HandoffConfig::default()).unwrap();

    let specs = roster.specs();
    let names: Vec<_> = specs.iter().map(|s| s.function.name.as_str()).collect();
    assert_eq!(names, vec!["transfer_to_billing", "transfer_to_research"]);
    for spec in &specs {
        let params = spec.function.parameters.as_ref().unwrap();
        assert_eq!(params["properties"], json!({}));
    }

    // Model output: supervisor decides to hand off to billing
    let model_call = ChatCompletionMessageToolCall {
        id: "call_billing_1".to_string(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: "transfer_to_billing".to_string(),
            arguments: "{}".to_string(),
        },
    };
    let mut history = vec![
        Message::user("I was charged twice"),
        Message::assistant_with_tool_calls(
            "",
            vec![tower_llm_handoff::ToolCall::new(
                model_call.id.clone(),
                model_call.function.name.clone(),
                json!({}),
            )],
        ),
    ];

    let output = ServiceExt::ready(&mut roster)
        .await
        .unwrap()
        .call(invocation_from(&model_call))
        .await
        .unwrap();
    let cmd = output.into_command().expect("handoff returns a command");
    assert_eq!(cmd.graph, GraphScope::Parent);

    // The supervisor's agent subgraph surfaces the command to the outer graph
    let cmd = cmd.lift().expect("parent-scoped");
    assert_eq!(cmd.goto.as_deref(), Some("billing"));
    cmd.update.append_to(&mut history);

    // Billing finishes and control returns to the supervisor
    let (back_call, back_result) = create_handoff_back_messages("supervisor");
    history.push(Message::assistant("Refund issued"));
    history.push(back_call);
    history.push(back_result);

    let roles: Vec<_> = history.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::User,
            Role::Assistant,
            Role::Tool,
            Role::Assistant,
            Role::Assistant,
            Role::Tool
        ]
    );
    assert_eq!(history[2].content, "Successfully transferred to billing");
    assert_eq!(history[5].content, "Successfully transferred back to supervisor");

    let transcript = history
        .iter()
        .map(Message::to_openai)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_tool_results_correlate(&transcript);
}

#[tokio::test]
async fn test_roster_composes_with_tower_layers() {
    let roster = ToolRoster::for_agents(["writer"], &HandoffConfig::default()).unwrap();
    let svc = ServiceBuilder::new()
        .map_response(|out: ToolOutput| out.into_command().and_then(|c| c.goto))
        .service(roster);

    let target = svc
        .oneshot(ToolInvocation::new("c", "transfer_to_writer", json!({})))
        .await
        .unwrap();
    assert_eq!(target.as_deref(), Some("writer"));
}

#[tokio::test]
async fn test_unknown_tool_surfaces_as_handoff_error() {
    let roster = ToolRoster::for_agents(["writer"], &HandoffConfig::default()).unwrap();
    let err = roster
        .oneshot(ToolInvocation::new("c", "transfer_to_editor", json!({})))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HandoffError>(),
        Some(HandoffError::UnknownTool(name)) if name == "transfer_to_editor"
    ));
}

#[tokio::test]
async fn test_handoff_back_ids_unique_across_tasks() {
    let handles: Vec<_> = (0..64)
        .map(|_| tokio::spawn(async { create_handoff_back_messages("supervisor") }))
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let (call, result) = handle.await.unwrap();
        let id = call.tool_calls()[0].id.clone();
        assert_eq!(result.tool_call_id.as_deref(), Some(id.as_str()));
        assert!(ids.insert(id), "duplicate handoff-back id");
    }
    assert_eq!(ids.len(), 64);
}

#[test]
fn test_roster_shared_across_threads() {
    let roster = std::sync::Arc::new(
        ToolRoster::for_agents(["a", "b", "c"], &HandoffConfig::default()).unwrap(),
    );
    let threads: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .enumerate()
        .map(|(i, agent)| {
            let roster = roster.clone();
            std::thread::spawn(move || {
                let out = roster
                    .dispatch(ToolInvocation::new(
                        format!("call_{i}"),
                        format!("transfer_to_{agent}"),
                        json!({}),
                    ))
                    .unwrap();
                out.into_command().unwrap()
            })
        })
        .collect();

    for (i, t) in threads.into_iter().enumerate() {
        let cmd = t.join().unwrap();
        let msg = &cmd.update.messages[0];
        assert_eq!(msg.tool_call_id.as_deref(), Some(format!("call_{i}").as_str()));
    }
}
