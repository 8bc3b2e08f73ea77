//! Raw Overpass element model.
//!
//! An Overpass `[out:json]` answer is `{ "version": …, "elements": [ … ] }`
//! where every element carries a `"type"` discriminator.  The element kinds
//! form a closed set, so they are deserialised straight into a tagged enum;
//! anything else Overpass may emit (areas, counts) lands in
//! [`RawElement::Unknown`] and is ignored by the assembler.
//!
//! These values live only for the duration of one ingestion call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use sv_core::OsmId;

/// Free-form OSM tags.
pub type Tags = HashMap<String, String>;

/// Top-level Overpass JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub version: f64,
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

/// One node, way or relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawElement {
    Node(RawNode),
    Way(RawWay),
    Relation(RawRelation),
    #[serde(other)]
    Unknown,
}

impl RawElement {
    /// Element id, `None` for [`RawElement::Unknown`].
    pub fn id(&self) -> Option<OsmId> {
        match self {
            RawElement::Node(n)     => Some(n.id),
            RawElement::Way(w)      => Some(w.id),
            RawElement::Relation(r) => Some(r.id),
            RawElement::Unknown     => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id:   OsmId,
    pub lat:  f64,
    pub lon:  f64,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWay {
    pub id:       OsmId,
    #[serde(default)]
    pub nodes:    Vec<OsmId>,
    /// Resolved coordinates, present when the query used `out geom`.
    #[serde(default)]
    pub geometry: Option<Vec<LatLon>>,
    #[serde(default)]
    pub tags:     Tags,
}

/// Overpass emits way geometry as `{lat, lon}` objects, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRelation {
    pub id:      OsmId,
    #[serde(default)]
    pub members: Vec<RelationMember>,
    #[serde(default)]
    pub tags:    Tags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationMember {
    #[serde(rename = "type")]
    pub kind:   MemberKind,
    #[serde(rename = "ref")]
    pub ref_id: OsmId,
    #[serde(default)]
    pub role:   String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Node,
    Way,
    Relation,
}
