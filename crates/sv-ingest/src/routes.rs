//! Static route table: which OSM relation carries which direction of which
//! line.
//!
//! The table is plain JSON keyed by route id:
//!
//! ```json
//! { "T1": { "shortName": "T1", "longName": "…", "kind": "trolleybus",
//!           "relations": { "forward": 2074460, "backward": 2074461 } } }
//! ```
//!
//! [`RouteTable::default_nancy`] returns the embedded table for the Tempo
//! lines of the Stan network in Nancy.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use sv_core::{Direction, OsmId, RouteId};

use crate::IngestResult;

const NANCY_ROUTES_JSON: &str = include_str!("../data/nancy_routes.json");

/// Vehicle family operating a line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Tram,
    Bus,
    Trolleybus,
}

/// One relation id per direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionRelations {
    pub forward:  OsmId,
    pub backward: OsmId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDefinition {
    pub short_name: String,
    pub long_name:  String,
    pub kind:       RouteKind,
    pub relations:  DirectionRelations,
}

impl RouteDefinition {
    /// The OSM relation describing `direction` of this line.
    pub fn relation(&self, direction: Direction) -> OsmId {
        match direction {
            Direction::Forward  => self.relations.forward,
            Direction::Backward => self.relations.backward,
        }
    }
}

/// Read-only map from route id to its definition, iterated in id order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteTable {
    routes: BTreeMap<RouteId, RouteDefinition>,
}

impl RouteTable {
    /// The embedded Nancy Tempo table (T1–T5).
    pub fn default_nancy() -> IngestResult<Self> {
        Self::from_json_str(NANCY_ROUTES_JSON)
    }

    pub fn from_json_str(json: &str) -> IngestResult<Self> {
        let routes: BTreeMap<RouteId, RouteDefinition> = serde_json::from_str(json)?;
        Ok(Self { routes })
    }

    pub fn from_path(path: impl AsRef<Path>) -> IngestResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, route_id: &str) -> Option<&RouteDefinition> {
        self.routes.get(route_id)
    }

    pub fn contains(&self, route_id: &str) -> bool {
        self.routes.contains_key(route_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouteId, &RouteDefinition)> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<(RouteId, RouteDefinition)> for RouteTable {
    fn from_iter<I: IntoIterator<Item = (RouteId, RouteDefinition)>>(iter: I) -> Self {
        Self { routes: iter.into_iter().collect() }
    }
}
