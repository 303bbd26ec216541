//! Settings command implementation

use std::collections::HashSet;

use colored::Colorize;
use deploy_core::{Recommendation, SettingNode, scalar_text};
use serde_json::{Map, Value};

use crate::error::Result;

/// Run the settings command
pub fn run_settings(recommendation: &Recommendation, all: bool, json: bool) -> Result<()> {
    let hidden = hidden_settings(recommendation);

    if json {
        let mut values = Map::new();
        for node in recommendation.tree().roots() {
            if all || !hidden.contains(node.fully_qualified_id.as_str()) {
                values.insert(node.id().to_string(), recommendation.get_value(node));
            }
        }
        println!("{}", serde_json::to_string_pretty(&Value::Object(values))?);
        return Ok(());
    }

    println!(
        "{} ({})",
        recommendation.name().bold(),
        recommendation.recipe_id().cyan()
    );
    println!();
    for node in recommendation.tree().iter() {
        let is_hidden = hidden.contains(node.fully_qualified_id.as_str());
        if is_hidden && !all {
            continue;
        }
        let line = describe(recommendation, node);
        if is_hidden {
            println!("{} {}", line.dimmed(), "(hidden)".dimmed());
        } else {
            println!("{line}");
        }
    }
    Ok(())
}

/// Settings that are not displayable, or sit under one that is not.
fn hidden_settings(recommendation: &Recommendation) -> HashSet<&str> {
    let mut hidden = HashSet::new();
    // Pre-order: a parent is decided before its children
    for node in recommendation.tree().iter() {
        let parent_hidden = node
            .parent
            .as_deref()
            .is_some_and(|parent| hidden.contains(parent));
        if parent_hidden || !recommendation.is_displayable(node) {
            hidden.insert(node.fully_qualified_id.as_str());
        }
    }
    hidden
}

fn describe(recommendation: &Recommendation, node: &SettingNode) -> String {
    let depth = node.fully_qualified_id.matches('.').count();
    let indent = "  ".repeat(depth + 1);
    let label = format!("{} ({})", node.item.name, node.id().dimmed());

    if node.is_object() && !node.children.is_empty() {
        return format!("{indent}{label}:");
    }

    let value = recommendation.get_value(node);
    let text = match scalar_text(&value) {
        Some(text) if text.is_empty() => "(empty)".dimmed().to_string(),
        Some(text) => text,
        None => value.to_string(),
    };
    let text = if recommendation
        .override_value(&node.fully_qualified_id)
        .is_some()
    {
        text.cyan().to_string()
    } else {
        text
    };
    format!("{indent}{label}: {text}")
}
