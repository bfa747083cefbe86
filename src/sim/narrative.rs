//! Narrative trigger engine
//!
//! A directed graph of named beats plus a bag of numeric variables. The engine
//! never walks edges or checks thresholds on its own: callers decide when a
//! beat happens and request the transition explicitly. Edges are metadata only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::definitions::NarrativeText;

/// A beat in the narrative graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeGraph {
    pub nodes: Vec<BeatNode>,
    pub edges: Vec<BeatEdge>,
}

impl NarrativeGraph {
    /// Beats reachable in one step from `node`
    pub fn successors<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.from == node)
            .map(|e| e.to.as_str())
    }
}

/// Start node, initial variables and graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub start_node: String,
    pub variables: BTreeMap<String, f64>,
    pub graph: NarrativeGraph,
}

/// The message currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMessage {
    pub text: String,
    pub color: String,
    /// Seconds left; hidden once this reaches zero
    pub life: f32,
}

/// Mutable narrative state owned by the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Narrative {
    pub current_node: String,
    pub variables: BTreeMap<String, f64>,
    pub active_message: Option<ActiveMessage>,
}

impl Narrative {
    /// Reset to the configured start node and initial variables
    pub fn init(&mut self, config: &NarrativeConfig) {
        self.current_node = config.start_node.clone();
        self.variables = config.variables.clone();
        self.active_message = None;
    }

    /// Move to `node_id`.
    ///
    /// If `text` is given it replaces whatever message is showing (newest
    /// wins, no queue). Returns whether a message was surfaced.
    pub fn transition(&mut self, node_id: &str, text: Option<&NarrativeText>, life: f32) -> bool {
        self.current_node = node_id.to_string();
        match text {
            Some(text) => {
                self.active_message = Some(ActiveMessage {
                    text: text.text.clone(),
                    color: text.color.clone(),
                    life,
                });
                true
            }
            None => false,
        }
    }

    /// Overwrite a variable. `reason` is for diagnostics only.
    pub fn set_var(&mut self, name: &str, value: f64, reason: &str) {
        log::debug!("narrative var {} = {} ({})", name, value, reason);
        self.variables.insert(name.to_string(), value);
    }

    pub fn var(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    /// Age the active message by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if let Some(msg) = &mut self.active_message {
            if msg.life > 0.0 {
                msg.life -= dt;
            }
        }
    }

    /// The message to display, if it has not expired
    pub fn visible_message(&self) -> Option<&ActiveMessage> {
        self.active_message.as_ref().filter(|m| m.life > 0.0)
    }
}
