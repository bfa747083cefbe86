//! Static definitions
//!
//! Immutable lookup tables for part types, ship layouts, asteroid types and
//! narrative text. The simulation only ever reads these; a miss is reported as
//! `None` and the caller decides what to skip.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::narrative::{BeatEdge, BeatNode, NarrativeConfig, NarrativeGraph};
use crate::sim::state::{AsteroidKind, PartKind};
use crate::tuning::{GameConfig, ScoringConfig, Tuning};

/// Errors raised while loading definition files
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The document is not valid JSON or does not match the schema
    #[error("Invalid definition file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An asteroid type splits into a type that is not defined
    #[error("Asteroid type '{from}' splits into unknown type '{into}'")]
    UnknownSplitTarget { from: String, into: String },

    /// Small asteroids are the end of the fission chain
    #[error("Asteroid type 'small' must not split")]
    SmallSplits,

    /// Narrative start node is missing from the graph
    #[error("Narrative start node '{0}' is not in the graph")]
    UnknownStartNode(String),

    /// Narrative edge references a node that is not declared
    #[error("Narrative edge {from} -> {to} references an unknown node")]
    UnknownEdgeNode { from: String, to: String },

    /// A ship layout without a core part could never be destroyed
    #[error("Ship layout '{0}' has no core part")]
    CorelessLayout(String),
}

/// Per-kind part properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartType {
    pub name: String,
    pub mass: f32,
    pub max_hp: u32,
}

/// One part slot in a ship layout (ship-local coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPart {
    pub x: f32,
    pub y: f32,
    pub kind: PartKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipLayout {
    pub parts: Vec<LayoutPart>,
}

/// Per-kind asteroid properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidType {
    pub hp: u32,
    pub radius: f32,
    /// Speed factor, multiplied by `asteroid_base_speed`
    pub speed: f32,
    pub score: u64,
    /// Child type produced on destruction
    pub splits: Option<AsteroidKind>,
    pub split_count: u32,
}

/// Display text for a narrative beat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeText {
    pub text: String,
    pub color: String,
}

/// Every lookup table the simulation consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definitions {
    pub part_types: BTreeMap<String, PartType>,
    pub ship_layouts: BTreeMap<String, ShipLayout>,
    pub asteroid_types: BTreeMap<String, AsteroidType>,
    pub narrative_text: BTreeMap<String, NarrativeText>,
    pub narrative: NarrativeConfig,
    pub tuning: Tuning,
}

impl Default for Definitions {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Definitions {
    /// Load definitions from JSON.
    ///
    /// Top-level tables that are absent keep their built-in contents, so a file
    /// may override only `tuning` or only `narrative_text`.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let defs: Definitions = serde_json::from_str(json)?;
        defs.validate()?;
        Ok(defs)
    }

    /// Check cross-references between tables
    pub fn validate(&self) -> Result<(), DefinitionError> {
        for (id, layout) in &self.ship_layouts {
            if !layout.parts.iter().any(|p| p.kind == PartKind::Core) {
                return Err(DefinitionError::CorelessLayout(id.clone()));
            }
        }

        for (id, def) in &self.asteroid_types {
            let Some(into) = def.splits else { continue };
            if def.split_count == 0 {
                continue;
            }
            if id == AsteroidKind::Small.as_str() {
                return Err(DefinitionError::SmallSplits);
            }
            if !self.asteroid_types.contains_key(into.as_str()) {
                return Err(DefinitionError::UnknownSplitTarget {
                    from: id.clone(),
                    into: into.as_str().to_string(),
                });
            }
        }

        let nodes: BTreeSet<&str> =
            self.narrative.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        if !nodes.contains(self.narrative.start_node.as_str()) {
            return Err(DefinitionError::UnknownStartNode(
                self.narrative.start_node.clone(),
            ));
        }
        for edge in &self.narrative.graph.edges {
            if !nodes.contains(edge.from.as_str()) || !nodes.contains(edge.to.as_str()) {
                return Err(DefinitionError::UnknownEdgeNode {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn part_type(&self, kind: PartKind) -> Option<&PartType> {
        self.part_types.get(kind.as_str())
    }

    pub fn ship_layout(&self, id: &str) -> Option<&ShipLayout> {
        self.ship_layouts.get(id)
    }

    pub fn asteroid_type(&self, kind: AsteroidKind) -> Option<&AsteroidType> {
        self.asteroid_types.get(kind.as_str())
    }

    pub fn narrative_text(&self, id: &str) -> Option<&NarrativeText> {
        self.narrative_text.get(id)
    }

    #[inline]
    pub fn game(&self) -> &GameConfig {
        &self.tuning.game
    }

    #[inline]
    pub fn scoring(&self) -> &ScoringConfig {
        &self.tuning.scoring
    }

    /// The stock game data
    pub fn builtin() -> Self {
        let part_types = [
            (PartKind::Core, "Core", 10.0, 8),
            (PartKind::Engine, "Engine", 5.0, 3),
            (PartKind::Gun, "Gun", 5.0, 2),
        ]
        .into_iter()
        .map(|(kind, name, mass, max_hp)| {
            (
                kind.as_str().to_string(),
                PartType {
                    name: name.to_string(),
                    mass,
                    max_hp,
                },
            )
        })
        .collect();

        let layout = ShipLayout {
            parts: vec![
                LayoutPart { x: 0.0, y: 0.0, kind: PartKind::Core },
                LayoutPart { x: -30.0, y: 30.0, kind: PartKind::Engine },
                LayoutPart { x: 30.0, y: 30.0, kind: PartKind::Engine },
                LayoutPart { x: 0.0, y: -30.0, kind: PartKind::Gun },
            ],
        };
        let ship_layouts = BTreeMap::from([(crate::consts::PLAYER_LAYOUT.to_string(), layout)]);

        let asteroid_types = [
            (AsteroidKind::Large, 3, 40.0, 1.0, 50, Some(AsteroidKind::Medium), 2),
            (AsteroidKind::Medium, 2, 25.0, 1.5, 100, Some(AsteroidKind::Small), 2),
            (AsteroidKind::Small, 1, 14.0, 2.0, 150, None, 0),
        ]
        .into_iter()
        .map(|(kind, hp, radius, speed, score, splits, split_count)| {
            (
                kind.as_str().to_string(),
                AsteroidType {
                    hp,
                    radius,
                    speed,
                    score,
                    splits,
                    split_count,
                },
            )
        })
        .collect();

        Self {
            part_types,
            ship_layouts,
            asteroid_types,
            narrative_text: builtin_narrative_text(),
            narrative: builtin_narrative_config(),
            tuning: Tuning::default(),
        }
    }
}

const COMMS: &str = "#c8b4ff";
const ALERT: &str = "#f88";
const DANGER: &str = "#f44";
const GOOD: &str = "#4f8";
const CAUTION: &str = "#f80";

fn builtin_narrative_text() -> BTreeMap<String, NarrativeText> {
    let entries: [(&str, &str, &str); 24] = [
        ("launch", "[ COMMS ] Station Coriolis-7 online. Gravitational anchor active. Defend at all costs, pilot.", COMMS),
        ("first_kill", "[ COMMS ] First contact neutralized. The station's gravity well is pulling debris inward. Stay sharp.", COMMS),
        ("wave_clear", "[ COMMS ] Sector clear. Dock with the station to refuel and repair before the next wave.", GOOD),
        ("getting_intense", "[ WARNING ] Asteroid density rising. Station gravity pulling them in faster. Intercept early!", ALERT),
        ("wave_5", "[ ALERT ] Deep field breach! Swarm density critical. The station cannot survive this alone!", ALERT),
        ("wave_7", "[ ALERT ] Asteroid storm forming! Multiple vectors, they're coming from everywhere!", ALERT),
        ("wave_10", "[ MAYDAY ] Uncharted density level! This is beyond anything we've seen. Hold the line, pilot!", DANGER),
        ("wave_15", "[ MAYDAY ] Gravitational cascade! The entire belt is collapsing inward!", DANGER),
        ("station_damaged", "[ STATION ] Impact detected! Asteroids breaking through defense perimeter!", CAUTION),
        ("station_critical", "[ STATION ] HULL CRITICAL! Structural integrity below 30%! We're losing her!", DANGER),
        ("station_destroyed", "[ STATION ] Core breach. Coriolis-7 lost. All hands... mission failed.", DANGER),
        ("boundary_warning", "[ NAV ] You are leaving the operational zone! Return to station immediately!", DANGER),
        ("repair_docking", "[ STATION ] Repair field engaged. Refueling in progress. Hull restoring...", GOOD),
        ("fuel_low", "[ ENGINE ] Fuel reserves at 30%. Recommend returning to station for refueling.", CAUTION),
        ("fuel_critical", "[ ENGINE ] FUEL CRITICAL! 10% remaining! Dock immediately or you'll be adrift!", DANGER),
        ("fuel_empty", "[ ENGINE ] Fuel depleted. Engines offline. Drifting... station gravity is your only hope.", DANGER),
        ("refueling", "[ ENGINE ] Fuel transfer active. Tanks replenishing.", GOOD),
        ("survivor_60", "[ COMMS ] One minute in the field. Station sensors calibrating to your flight pattern.", COMMS),
        ("survivor_180", "[ COMMS ] Three minutes. You're setting records out there, pilot. Command is watching.", COMMS),
        ("survivor_300", "[ COMMS ] Five minutes of continuous combat. They'll write songs about you, pilot.", COMMS),
        ("ship_damaged", "[ HULL ] Ship integrity compromised! Dock for repairs before you lose more systems!", CAUTION),
        ("last_part", "[ HULL ] CRITICAL! Core exposed, one more hit and it's over! GET TO THE STATION!", DANGER),
        ("player_destroyed", "[ COMMS ] We've lost the pilot. Station Coriolis-7 is now undefended.", DANGER),
        ("gravity_warning", "[ NAV ] Station gravitational pull detected. Use it to your advantage, pilot.", COMMS),
    ];
    entries
        .into_iter()
        .map(|(id, text, color)| {
            (
                id.to_string(),
                NarrativeText {
                    text: text.to_string(),
                    color: color.to_string(),
                },
            )
        })
        .collect()
}

fn builtin_narrative_config() -> NarrativeConfig {
    let nodes = [
        ("launch", "Launch"),
        ("first_kill", "First asteroid"),
        ("wave_clear", "Wave cleared"),
        ("getting_intense", "Getting intense"),
        ("wave_5", "Deep field"),
        ("wave_7", "Asteroid storm"),
        ("wave_10", "Hell wave"),
        ("wave_15", "Beyond limits"),
        ("station_damaged", "Station hit"),
        ("station_critical", "Station critical"),
        ("station_destroyed", "Station lost"),
        ("boundary_warning", "Boundary"),
        ("repair_docking", "Repair dock"),
        ("fuel_low", "Fuel low"),
        ("fuel_critical", "Fuel critical"),
        ("fuel_empty", "Fuel empty"),
        ("refueling", "Refueling"),
        ("gravity_warning", "Gravity pull"),
        ("survivor_60", "One minute"),
        ("survivor_180", "Three minutes"),
        ("survivor_300", "Five minutes"),
        ("ship_damaged", "Ship damaged"),
        ("last_part", "Last stand"),
        ("player_destroyed", "Player destroyed"),
    ]
    .into_iter()
    .map(|(id, label)| BeatNode {
        id: id.to_string(),
        label: label.to_string(),
    })
    .collect();

    let edges = [
        ("launch", "first_kill"),
        ("first_kill", "wave_clear"),
        ("wave_clear", "getting_intense"),
        ("getting_intense", "wave_5"),
        ("wave_5", "wave_7"),
        ("wave_7", "wave_10"),
        ("wave_10", "wave_15"),
        ("launch", "station_damaged"),
        ("station_damaged", "station_critical"),
        ("station_critical", "station_destroyed"),
        ("launch", "boundary_warning"),
        ("launch", "repair_docking"),
        ("launch", "fuel_low"),
        ("fuel_low", "fuel_critical"),
        ("fuel_critical", "fuel_empty"),
        ("launch", "refueling"),
        ("launch", "gravity_warning"),
        ("launch", "survivor_60"),
        ("survivor_60", "survivor_180"),
        ("survivor_180", "survivor_300"),
        ("launch", "ship_damaged"),
        ("ship_damaged", "last_part"),
        ("launch", "player_destroyed"),
    ]
    .into_iter()
    .map(|(from, to)| BeatEdge {
        from: from.to_string(),
        to: to.to_string(),
    })
    .collect();

    NarrativeConfig {
        start_node: "launch".to_string(),
        variables: BTreeMap::from([
            ("asteroids_destroyed".to_string(), 0.0),
            ("waves_survived".to_string(), 0.0),
            ("station_hp".to_string(), 20.0),
            ("fuel".to_string(), 100.0),
        ]),
        graph: NarrativeGraph { nodes, edges },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let defs = Definitions::builtin();
        defs.validate().unwrap();
        assert_eq!(defs.ship_layout(crate::consts::PLAYER_LAYOUT).unwrap().parts.len(), 4);
        assert_eq!(defs.part_type(PartKind::Core).unwrap().max_hp, 8);
    }

    #[test]
    fn test_fission_chain_terminates_at_small() {
        let defs = Definitions::builtin();
        let large = defs.asteroid_type(AsteroidKind::Large).unwrap();
        assert_eq!(large.splits, Some(AsteroidKind::Medium));
        assert_eq!(large.split_count, 2);
        let small = defs.asteroid_type(AsteroidKind::Small).unwrap();
        assert_eq!(small.splits, None);
    }

    #[test]
    fn test_every_graph_node_has_text() {
        let defs = Definitions::builtin();
        for node in &defs.narrative.graph.nodes {
            assert!(defs.narrative_text(&node.id).is_some(), "missing text for {}", node.id);
        }
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let mut defs = Definitions::builtin();
        defs.asteroid_types.remove("medium");
        assert!(defs.asteroid_type(AsteroidKind::Medium).is_none());
        assert!(defs.ship_layout("no_such_layout").is_none());
        assert!(defs.narrative_text("no_such_beat").is_none());
    }

    #[test]
    fn test_partial_json_keeps_builtin_tables() {
        let json = r#"{ "tuning": { "game": { "station_hp": 5 } } }"#;
        let defs = Definitions::from_json(json).unwrap();
        assert_eq!(defs.game().station_hp, 5);
        assert_eq!(defs.asteroid_types.len(), 3);
        assert!(defs.narrative_text("launch").is_some());
    }

    #[test]
    fn test_rejects_unknown_split_target() {
        let json = r#"{
            "asteroid_types": {
                "large": { "hp": 3, "radius": 40.0, "speed": 1.0, "score": 50, "splits": "medium", "split_count": 2 }
            }
        }"#;
        let err = Definitions::from_json(json).unwrap_err();
        assert!(matches!(err, DefinitionError::UnknownSplitTarget { .. }));
    }

    #[test]
    fn test_rejects_splitting_small() {
        let json = r#"{
            "asteroid_types": {
                "small": { "hp": 1, "radius": 14.0, "speed": 2.0, "score": 150, "splits": "small", "split_count": 2 }
            }
        }"#;
        let err = Definitions::from_json(json).unwrap_err();
        assert!(matches!(err, DefinitionError::SmallSplits));
    }

    #[test]
    fn test_rejects_coreless_layout() {
        let json = r#"{
            "ship_layouts": {
                "player_default": { "parts": [
                    { "x": 0.0, "y": 0.0, "kind": "engine" },
                    { "x": 30.0, "y": 0.0, "kind": "gun" }
                ] }
            }
        }"#;
        let err = Definitions::from_json(json).unwrap_err();
        assert!(matches!(err, DefinitionError::CorelessLayout(ref id) if id == "player_default"));
    }

    #[test]
    fn test_rejects_bad_edge_and_garbage() {
        let json = r#"{
            "narrative": {
                "start_node": "launch",
                "variables": {},
                "graph": { "nodes": [{ "id": "launch", "label": "Launch" }], "edges": [{ "from": "launch", "to": "nowhere" }] }
            }
        }"#;
        assert!(matches!(
            Definitions::from_json(json).unwrap_err(),
            DefinitionError::UnknownEdgeNode { .. }
        ));
        assert!(matches!(
            Definitions::from_json("not json").unwrap_err(),
            DefinitionError::Parse(_)
        ));
    }
}
