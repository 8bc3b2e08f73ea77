//! Relation → route geometry assembly.
//!
//! # Algorithm
//!
//! 1. Take the first relation in the element set (the queried line).
//! 2. Keep its `way` members whose role is `""`, `"forward"` or
//!    `"backward"`, **in member order**; that order is the traversal order
//!    and is never re-sorted.
//! 3. Append each way's resolved geometry to the path, skipping ways without
//!    geometry.  When the incoming way starts exactly where the path ends,
//!    its first point is dropped so junctions never produce a zero-length
//!    segment.
//! 4. Resolve `node` members with role `"stop"` or `"platform"` to [`Stop`]s.
//! 5. Sum the planar segment lengths for the total distance.
//!
//! A relation whose path comes out empty is rejected with
//! [`GeometryError::NoUsableWays`] rather than returned as a useless
//! zero-length geometry.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use sv_core::{Direction, GeoPoint, OsmId, RouteId};

use crate::osm::{MemberKind, RawElement, RawNode, RawRelation, RawWay};
use crate::{path_length, GeometryError, GeometryResult, RouteGeometry, Stop};

/// Roles that mark a way member as part of the travelled path.
const PATH_ROLES: [&str; 3] = ["", "forward", "backward"];

/// Roles that mark a node member as a stop.
const STOP_ROLES: [&str; 2] = ["stop", "platform"];

/// Network-specific stop reference tag (Nancy's Stan network).
const NETWORK_REF_TAG: &str = "ref:FR:STAN";

// ── Public entry point ────────────────────────────────────────────────────────

/// Assemble the geometry of `route_id` / `direction` from a raw element set.
///
/// # Errors
///
/// - [`GeometryError::MissingRelation`] if no relation is present.
/// - [`GeometryError::NoUsableWays`] if no path member carries geometry.
pub fn assemble(
    elements:  &[RawElement],
    route_id:  RouteId,
    direction: Direction,
) -> GeometryResult<RouteGeometry> {
    let relation = elements
        .iter()
        .find_map(|e| match e {
            RawElement::Relation(r) => Some(r),
            _ => None,
        })
        .ok_or(GeometryError::MissingRelation)?;

    // Index once; the member walks below are then linear.
    let mut ways:  HashMap<OsmId, &RawWay>  = HashMap::new();
    let mut nodes: HashMap<OsmId, &RawNode> = HashMap::new();
    for element in elements {
        match element {
            RawElement::Way(w)  => { ways.insert(w.id, w); }
            RawElement::Node(n) => { nodes.insert(n.id, n); }
            _ => {}
        }
    }

    let path = assemble_path(relation, &ways);
    if path.is_empty() {
        return Err(GeometryError::NoUsableWays { relation: relation.id });
    }
    let stops = collect_stops(relation, &nodes);
    let total_distance_m = path_length(&path);

    Ok(RouteGeometry {
        route_id,
        direction,
        relation_id: relation.id,
        path,
        stops,
        total_distance_m,
    })
}

// ── Path ──────────────────────────────────────────────────────────────────────

fn assemble_path(relation: &RawRelation, ways: &HashMap<OsmId, &RawWay>) -> Vec<GeoPoint> {
    let mut path: Vec<GeoPoint> = Vec::new();

    let path_members = relation
        .members
        .iter()
        .filter(|m| m.kind == MemberKind::Way && PATH_ROLES.contains(&m.role.as_str()));

    for member in path_members {
        let Some(geometry) = ways.get(&member.ref_id).and_then(|w| w.geometry.as_ref()) else {
            debug!(relation = %relation.id, way = %member.ref_id, "way member without geometry, skipped");
            continue;
        };

        let coords: Vec<GeoPoint> = geometry.iter().map(|p| GeoPoint::new(p.lon, p.lat)).collect();
        let junction = matches!((path.last(), coords.first()), (Some(last), Some(first)) if last == first);
        path.extend_from_slice(&coords[usize::from(junction)..]);
    }

    path
}

// ── Stops ─────────────────────────────────────────────────────────────────────

fn collect_stops(relation: &RawRelation, nodes: &HashMap<OsmId, &RawNode>) -> Vec<Stop> {
    let mut seen: HashSet<OsmId> = HashSet::new();

    relation
        .members
        .iter()
        .filter(|m| m.kind == MemberKind::Node && STOP_ROLES.contains(&m.role.as_str()))
        .filter(|m| seen.insert(m.ref_id))
        .filter_map(|m| nodes.get(&m.ref_id).copied())
        .map(stop_from_node)
        .collect()
}

fn stop_from_node(node: &RawNode) -> Stop {
    let tag = |k: &str| node.tags.get(k).filter(|v| !v.trim().is_empty()).cloned();

    let name = tag("name")
        .or_else(|| tag(NETWORK_REF_TAG))
        .unwrap_or_else(|| format!("Stop {}", node.id));
    let code = tag(NETWORK_REF_TAG).or_else(|| tag("ref"));

    Stop {
        id: format!("osm-node-{}", node.id),
        name,
        position: GeoPoint::new(node.lon, node.lat),
        code,
    }
}
