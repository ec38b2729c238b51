//! Supervisor handoff walkthrough.
//!
//! A supervisor exposes one handoff tool per worker. A scripted "model" picks
//! `transfer_to_research`; the host dispatches it, applies the returned
//! command, lets the worker answer, then records the return to the supervisor.
//!
//! Run with `RUST_LOG=debug` to see tool registration and dispatch events.

use serde_json::json;
use tower::{Service, ServiceExt};
use tower_llm_handoff::{
    create_handoff_back_messages, normalize_agent_name, HandoffConfig, Message, ToolCall,
    ToolInvocation, ToolRoster,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    println!("=== Supervisor Handoff Demo ===\n");

    let workers: Vec<String> = ["Research Team", "Math Expert"]
        .iter()
        .map(|name| normalize_agent_name(name))
        .collect();
    let config = HandoffConfig::default().with_validation(true);
    let mut roster = ToolRoster::for_agents(&workers, &config)?;

    println!("Tools offered to the supervisor model:");
    for spec in roster.specs() {
        println!(
            "  - {} ({})",
            spec.function.name,
            spec.function.description.unwrap_or_default()
        );
    }

    // Scripted model turn
    let call = ToolCall::new("call_001", "transfer_to_research_team", json!({}));
    let mut history = vec![
        Message::user("Find the GDP of France in 2023"),
        Message::assistant_with_tool_calls("", vec![call.clone()]),
    ];

    let output = roster
        .ready()
        .await?
        .call(ToolInvocation::new(call.id, call.name, call.arguments))
        .await?;

    if let Some(cmd) = output.into_command() {
        println!(
            "\nCommand: goto={:?} scope={:?}",
            cmd.goto.as_deref().unwrap_or("-"),
            cmd.graph
        );
        cmd.update.append_to(&mut history);
    }

    history.push(Message::assistant("France's 2023 GDP was about 3.0 trillion USD."));
    let (back_call, back_result) = create_handoff_back_messages("supervisor");
    history.push(back_call);
    history.push(back_result);

    println!("\nTranscript:");
    for msg in &history {
        let openai = msg.to_openai()?;
        println!("  {}", serde_json::to_string(&openai)?);
    }

    Ok(())
}
