use std::io::Write;

use anyhow::{Context, Result, bail};
use tritan_core::{
    EdgeChange, Editor, ExecutionResult, LlmProvider, NodeChange, NodeKind, NodePatch, Position,
    RunOutcome, ValidationResult,
};

use crate::cli::Command;

/// Run one command against an open editor session, writing human output to `out`.
pub async fn dispatch(editor: &Editor, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::New { name } => {
            editor.clear();
            if let Some(name) = name {
                editor.set_workflow_name(name);
            }
            let workflow = editor.workflow();
            writeln!(out, "created {} ({})", workflow.name, workflow.id)?;
        }
        Command::Show { json } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&editor.snapshot())?)?;
            } else {
                show(editor, out)?;
            }
        }
        Command::Rename { name } => {
            editor.set_workflow_name(name);
            writeln!(out, "renamed to {}", editor.workflow().name)?;
        }
        Command::Add { kind, x, y } => {
            let id = editor.add_node(kind, Position::new(x, y));
            writeln!(out, "{id}")?;
        }
        Command::Connect {
            source,
            target,
            source_handle,
            target_handle,
        } => {
            for endpoint in [&source, &target] {
                if editor.node(endpoint).is_none() {
                    tracing::warn!(event = "cli.dangling_edge", domain = "cli", node_id = %endpoint);
                }
            }
            let id = editor.connect(source, target, source_handle, target_handle);
            writeln!(out, "{id}")?;
        }
        Command::Set {
            node_id,
            label,
            prompt,
            model,
            provider,
            temperature,
            config,
        } => {
            let Some(node) = editor.node(&node_id) else {
                bail!("no node with id {node_id}");
            };
            let mut patch = NodePatch {
                label,
                provider: provider.map(Some),
                model: model.map(Some),
                prompt: prompt.map(Some),
                temperature: temperature.map(Some),
                config: None,
            };
            if !config.is_empty() {
                let mut merged = node.data.config.clone();
                for pair in &config {
                    let (key, value) = parse_config_pair(pair)?;
                    merged.insert(key, value);
                }
                patch = patch.config(merged);
            }
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            editor.update_node_data(&node_id, patch);
            writeln!(out, "updated {node_id}")?;
        }
        Command::Remove { node_id } => {
            let summary = editor.apply_node_changes([NodeChange::remove(&*node_id)]);
            if summary.applied == 0 {
                bail!("no node with id {node_id}");
            }
            writeln!(out, "removed {node_id}")?;
        }
        Command::Disconnect { edge_id } => {
            let summary = editor.apply_edge_changes([EdgeChange::remove(&*edge_id)]);
            if summary.applied == 0 {
                bail!("no edge with id {edge_id}");
            }
            writeln!(out, "removed {edge_id}")?;
        }
        Command::Validate => {
            let result = editor.validate().await;
            print_validation(&result, out)?;
            if !result.valid {
                bail!("workflow is invalid");
            }
        }
        Command::Run => match editor.run().await? {
            RunOutcome::Rejected(result) => {
                print_validation(&result, out)?;
                bail!("workflow is invalid; not executed");
            }
            RunOutcome::Executed(result) => {
                print_execution(&result, out)?;
                if result.error.is_some() {
                    bail!("execution reported an error");
                }
            }
        },
        Command::Export { dir } => {
            let path = editor.export_to(&dir)?;
            writeln!(out, "{}", path.display())?;
        }
        Command::Import { file } => {
            editor
                .import_file(&file)
                .with_context(|| format!("failed to import {}", file.display()))?;
            let workflow = editor.workflow();
            writeln!(out, "imported {} ({})", workflow.name, workflow.id)?;
        }
        Command::Health => {
            let value = editor.health().await.context("engine health check failed")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
        Command::Kinds => kinds(out)?,
    }
    Ok(())
}

/// `key=value`; the value is JSON when it parses, otherwise a plain string.
pub fn parse_config_pair(pair: &str) -> Result<(String, serde_json::Value)> {
    let Some((key, raw)) = pair.split_once('=') else {
        bail!("config entry {pair:?} must look like key=value");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("config entry {pair:?} has an empty key");
    }
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn show(editor: &Editor, out: &mut impl Write) -> Result<()> {
    let workflow = editor.workflow();
    writeln!(out, "{} ({})", workflow.name, workflow.id)?;
    if !workflow.description.is_empty() {
        writeln!(out, "  {}", workflow.description)?;
    }
    if let Some(saved) = workflow.updated_at {
        writeln!(out, "  saved {}", saved.to_rfc3339())?;
    }
    let nodes = editor.nodes();
    writeln!(out, "nodes: {}", nodes.len())?;
    for node in &nodes {
        writeln!(
            out,
            "  {} [{}] {:?} at ({}, {})",
            node.id,
            node.kind(),
            node.data.label,
            node.position.x,
            node.position.y
        )?;
        if !node.data.config.is_empty() {
            writeln!(out, "    config {}", serde_json::Value::Object(node.data.config.clone()))?;
        }
    }
    let edges = editor.edges();
    writeln!(out, "edges: {}", edges.len())?;
    for edge in &edges {
        let handle = edge
            .source_handle
            .as_deref()
            .map(|h| format!(" ({h})"))
            .unwrap_or_default();
        writeln!(out, "  {} {} -> {}{handle}", edge.id, edge.source, edge.target)?;
    }
    if let Some(result) = editor.execution_result() {
        writeln!(out, "last execution: {:?}", result.status)?;
    }
    Ok(())
}

fn print_validation(result: &ValidationResult, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", if result.valid { "valid" } else { "invalid" })?;
    for issue in &result.errors {
        writeln!(out, "  error: {}", issue.message)?;
        if let Some(hint) = &issue.suggestion {
            writeln!(out, "    hint: {hint}")?;
        }
    }
    for issue in &result.warnings {
        writeln!(out, "  warning: {}", issue.message)?;
    }
    for suggestion in &result.suggestions {
        writeln!(out, "  suggestion: {}", suggestion.message)?;
    }
    Ok(())
}

fn print_execution(result: &ExecutionResult, out: &mut impl Write) -> Result<()> {
    write!(out, "{:?}", result.status)?;
    if let Some(ms) = result.total_duration_ms {
        write!(out, " in {ms:.0}ms")?;
    }
    writeln!(out)?;
    if let Some(error) = &result.error {
        writeln!(out, "  error: {error}")?;
    }
    for node in &result.node_results {
        writeln!(out, "  {} {}", node.node_id, node.status)?;
        if let Some(error) = &node.error {
            writeln!(out, "    error: {error}")?;
        }
    }
    Ok(())
}

fn kinds(out: &mut impl Write) -> Result<()> {
    for kind in NodeKind::ALL {
        let info = kind.info();
        writeln!(out, "{:<10} {} {}", kind.as_str(), info.icon, info.description)?;
    }
    writeln!(out)?;
    for provider in LlmProvider::ALL {
        writeln!(out, "{} ({})", provider.as_str(), provider.display_name())?;
        for model in provider.models() {
            writeln!(out, "  {model}")?;
        }
    }
    Ok(())
}
