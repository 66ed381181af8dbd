//! io::osm
//!
//! Built-in base loader for lanelet OSM files.
//!
//! # Supported subset
//!
//! - `node`: position from the `local_x`, `local_y` and `ele` tags (metric
//!   map frame; `ele` defaults to 0)
//! - `way`: ordered `nd` references, loaded as boundary curves
//! - `relation` tagged `type=lanelet`: `way` members with roles `left` and
//!   `right`; remaining tags are kept on the lanelet
//!
//! Everything else is ignored. Problems with individual elements are
//! collected in [`LoadedMap::errors`] and the element is skipped; only a file
//! that cannot be read or parsed as OSM XML fails the load.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::loader::{BaseLoadError, BaseLoader, LoadedMap};
use crate::core::graph::{LaneGraph, Lanelet};
use crate::core::types::{Id, LineString3d, Point3d};

/// Reads the lanelet subset of OSM XML into a [`LaneGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsmLaneletLoader;

impl OsmLaneletLoader {
    /// Create the loader.
    pub fn new() -> Self {
        Self
    }

    /// Parse OSM markup already in memory.
    ///
    /// # Errors
    ///
    /// `BaseLoadError::Malformed` if the markup is not well-formed XML or the
    /// root element is not `osm`.
    pub fn parse_str(&self, xml: &str) -> Result<LoadedMap, BaseLoadError> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| BaseLoadError::Malformed(e.to_string()))?;

        let root = doc.root_element();
        if !root.has_tag_name("osm") {
            return Err(BaseLoadError::Malformed(format!(
                "expected <osm> root element, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut errors = Vec::new();
        let mut graph = LaneGraph::new();

        let nodes = read_nodes(root, &mut errors);
        for curve in read_ways(root, &nodes, &mut errors) {
            graph.add_curve(curve);
        }
        for lanelet in read_lanelets(root, &mut errors) {
            let id = lanelet.id();
            if !graph.add_lanelet(lanelet) {
                errors.push(format!("lanelet {}: bound refers to an unknown way", id));
            }
        }

        Ok(LoadedMap { graph, errors })
    }
}

impl BaseLoader for OsmLaneletLoader {
    fn name(&self) -> &'static str {
        "osm"
    }

    fn parse(&self, path: &Path) -> Result<LoadedMap, BaseLoadError> {
        let contents = fs::read_to_string(path).map_err(|e| BaseLoadError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_str(&contents)
    }
}

fn parse_id(node: roxmltree::Node<'_, '_>, attr: &str) -> Option<Id> {
    node.attribute(attr)?.trim().parse().ok()
}

fn tags<'a>(node: roxmltree::Node<'a, '_>) -> HashMap<&'a str, &'a str> {
    node.children()
        .filter(|c| c.has_tag_name("tag"))
        .filter_map(|t| Some((t.attribute("k")?, t.attribute("v")?)))
        .collect()
}

fn children<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    node.children().filter(move |c| c.has_tag_name(name))
}

fn read_nodes(root: roxmltree::Node<'_, '_>, errors: &mut Vec<String>) -> HashMap<Id, Point3d> {
    let mut nodes = HashMap::new();

    for node in children(root, "node") {
        let Some(id) = parse_id(node, "id") else {
            errors.push("node without a valid id".to_string());
            continue;
        };

        let tags = tags(node);
        let coord = |key: &str| tags.get(key).and_then(|v| v.trim().parse::<f64>().ok());
        match (coord("local_x"), coord("local_y")) {
            (Some(x), Some(y)) => {
                let z = coord("ele").unwrap_or(0.0);
                nodes.insert(id, Point3d::new(x, y, z));
            }
            _ => errors.push(format!("node {}: missing or invalid local_x/local_y", id)),
        }
    }

    nodes
}

fn read_ways(
    root: roxmltree::Node<'_, '_>,
    nodes: &HashMap<Id, Point3d>,
    errors: &mut Vec<String>,
) -> Vec<LineString3d> {
    let mut curves = Vec::new();

    for way in children(root, "way") {
        let Some(id) = parse_id(way, "id") else {
            errors.push("way without a valid id".to_string());
            continue;
        };

        let mut points = Vec::new();
        for nd in children(way, "nd") {
            match parse_id(nd, "ref").and_then(|r| nodes.get(&r)) {
                Some(point) => points.push(*point),
                None => errors.push(format!(
                    "way {}: reference to unknown node {}",
                    id,
                    nd.attribute("ref").unwrap_or("?")
                )),
            }
        }
        curves.push(LineString3d::new(id, points));
    }

    curves
}

fn read_lanelets(root: roxmltree::Node<'_, '_>, errors: &mut Vec<String>) -> Vec<Lanelet> {
    let mut lanelets = Vec::new();

    for relation in children(root, "relation") {
        let tags = tags(relation);
        if tags.get("type") != Some(&"lanelet") {
            continue;
        }
        let Some(id) = parse_id(relation, "id") else {
            errors.push("lanelet without a valid id".to_string());
            continue;
        };

        let member = |role: &str| {
            children(relation, "member")
                .filter(|m| {
                    m.attribute("type") == Some("way") && m.attribute("role") == Some(role)
                })
                .find_map(|m| parse_id(m, "ref"))
        };

        let (Some(left), Some(right)) = (member("left"), member("right")) else {
            errors.push(format!("lanelet {}: missing left or right bound", id));
            continue;
        };

        let mut lanelet = Lanelet::new(id, left, right);
        lanelet.tags = tags
            .iter()
            .filter(|(k, _)| **k != "type")
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        lanelets.push(lanelet);
    }

    lanelets
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <MetaInfo format_version="1" map_version="1"/>
  <node id="1" lat="0" lon="0"><tag k="local_x" v="0"/><tag k="local_y" v="3"/><tag k="ele" v="1.5"/></node>
  <node id="2" lat="0" lon="0"><tag k="local_x" v="10"/><tag k="local_y" v="3"/></node>
  <node id="3" lat="0" lon="0"><tag k="local_x" v="0"/><tag k="local_y" v="0"/></node>
  <node id="4" lat="0" lon="0"><tag k="local_x" v="10"/><tag k="local_y" v="0"/></node>
  <way id="10"><nd ref="1"/><nd ref="2"/><tag k="type" v="line_thin"/></way>
  <way id="11"><nd ref="3"/><nd ref="4"/></way>
  <relation id="100">
    <member type="way" role="left" ref="10"/>
    <member type="way" role="right" ref="11"/>
    <tag k="type" v="lanelet"/>
    <tag k="subtype" v="road"/>
  </relation>
  <relation id="200">
    <member type="relation" role="refers" ref="100"/>
    <tag k="type" v="regulatory_element"/>
  </relation>
</osm>
"#;

    #[test]
    fn parses_lanelet_with_bounds() {
        let loaded = OsmLaneletLoader::new().parse_str(MAP).unwrap();
        assert!(loaded.errors.is_empty(), "{:?}", loaded.errors);

        let graph = &loaded.graph;
        assert_eq!(graph.lanelet_count(), 1);
        assert_eq!(graph.curve_count(), 2);

        let lanelet = graph.lanelet(100).unwrap();
        assert_eq!(lanelet.tag("subtype"), Some("road"));
        assert_eq!(lanelet.tag("type"), None);

        let (left, right) = graph.bounds(100).unwrap();
        assert_eq!(left.points()[0], Point3d::new(0.0, 3.0, 1.5));
        assert_eq!(right.points()[1], Point3d::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn node_without_local_coordinates_is_reported() {
        let xml = r#"<osm><node id="5" lat="35.0" lon="139.0"/></osm>"#;
        let loaded = OsmLaneletLoader::new().parse_str(xml).unwrap();
        assert_eq!(loaded.errors.len(), 1);
        assert!(loaded.errors[0].contains("node 5"));
    }

    #[test]
    fn unknown_node_reference_is_reported() {
        let xml = r#"<osm>
  <node id="1"><tag k="local_x" v="0"/><tag k="local_y" v="0"/></node>
  <way id="10"><nd ref="1"/><nd ref="99"/></way>
</osm>"#;
        let loaded = OsmLaneletLoader::new().parse_str(xml).unwrap();
        assert_eq!(loaded.graph.curve(10).unwrap().len(), 1);
        assert!(loaded.errors[0].contains("unknown node 99"));
    }

    #[test]
    fn lanelet_missing_bound_is_skipped() {
        let xml = r#"<osm>
  <way id="10"/>
  <relation id="100">
    <member type="way" role="left" ref="10"/>
    <tag k="type" v="lanelet"/>
  </relation>
  <relation id="101">
    <member type="way" role="left" ref="10"/>
    <member type="way" role="right" ref="77"/>
    <tag k="type" v="lanelet"/>
  </relation>
</osm>"#;
        let loaded = OsmLaneletLoader::new().parse_str(xml).unwrap();
        assert_eq!(loaded.graph.lanelet_count(), 0);
        assert_eq!(loaded.errors.len(), 2);
        assert!(loaded.errors[0].contains("lanelet 100"));
        assert!(loaded.errors[1].contains("lanelet 101"));
    }

    #[test]
    fn malformed_xml_fails() {
        let result = OsmLaneletLoader::new().parse_str("<osm><node></osm>");
        assert!(matches!(result, Err(BaseLoadError::Malformed(_))));
    }

    #[test]
    fn wrong_root_fails() {
        let result = OsmLaneletLoader::new().parse_str("<gpx/>");
        match result {
            Err(BaseLoadError::Malformed(msg)) => assert!(msg.contains("<gpx>")),
            other => panic!("expected malformed, got {:?}", other),
        }
    }
}
