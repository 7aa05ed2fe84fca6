//! Loader for the airport route network.
//!
//! The dataset follows the OpenFlights layout: a `routes.csv` file with (at least) the columns
//! `Source airport ID` and `Destination airport ID`, and optionally an `airports.csv` file with
//! an `Airport ID` column. Missing values are written `\N`.
//!
//! Each airport appearing in a kept route becomes a node, numbered in order of first appearance.
//! Routes are undirected edges; a route flown by several airlines, or in both directions, is a
//! single edge. Routes with a missing endpoint, a self-route, or (when an airport list is given)
//! an endpoint absent from that list are dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::error::NetSirError;
use crate::hashing::{HashMap, HashSet};
use crate::network::{Graph, NodeId};

/// A loaded route network and the dataset id of each node.
#[derive(Clone, Debug)]
pub struct AirportNetwork {
    pub graph: Graph,
    /// `airport_ids[node.index()]` is the dataset id of `node`.
    pub airport_ids: Vec<u32>,
}

impl AirportNetwork {
    #[must_use]
    pub fn airport_id(&self, node: NodeId) -> Option<u32> {
        self.airport_ids.get(node.index()).copied()
    }
}

#[derive(Debug, Deserialize)]
struct RouteRecord {
    #[serde(rename = "Source airport ID")]
    source: String,
    #[serde(rename = "Destination airport ID")]
    destination: String,
}

#[derive(Debug, Deserialize)]
struct AirportRecord {
    #[serde(rename = "Airport ID")]
    id: String,
}

fn parse_id(field: &str) -> Option<u32> {
    let field = field.trim();
    if field == "\\N" {
        return None;
    }
    field.parse().ok()
}

/// Reads the set of valid airport ids from an `airports.csv` table.
///
/// # Errors
/// Returns [`NetSirError::CSVError`] if the table cannot be parsed.
pub fn read_airport_ids<R: Read>(reader: R) -> Result<HashSet<u32>, NetSirError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut ids = HashSet::default();
    for record in reader.deserialize() {
        let record: AirportRecord = record?;
        if let Some(id) = parse_id(&record.id) {
            ids.insert(id);
        }
    }
    Ok(ids)
}

/// Builds the route network from a `routes.csv` table. If `known_airports` is given, routes
/// touching an airport outside it are dropped.
///
/// # Errors
/// Returns [`NetSirError::CSVError`] if the table cannot be parsed.
pub fn read_routes<R: Read>(
    reader: R,
    known_airports: Option<&HashSet<u32>>,
) -> Result<AirportNetwork, NetSirError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut graph = Graph::new();
    let mut airport_ids = Vec::new();
    let mut nodes: HashMap<u32, NodeId> = HashMap::default();
    let mut dropped = 0usize;

    for record in reader.deserialize() {
        let record: RouteRecord = record?;
        let (Some(source), Some(destination)) =
            (parse_id(&record.source), parse_id(&record.destination))
        else {
            dropped += 1;
            continue;
        };
        if source == destination {
            dropped += 1;
            continue;
        }
        if let Some(known) = known_airports {
            if !known.contains(&source) || !known.contains(&destination) {
                dropped += 1;
                continue;
            }
        }

        let mut node_for = |id: u32| {
            *nodes.entry(id).or_insert_with(|| {
                airport_ids.push(id);
                graph.add_node()
            })
        };
        let a = node_for(source);
        let b = node_for(destination);
        if !graph.contains_edge(a, b) {
            graph.add_edge(a, b)?;
        }
    }

    if dropped > 0 {
        warn!("dropped {dropped} routes with a missing, repeated or unknown airport");
    }
    info!(
        "loaded airport network: {} airports, {} routes",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(AirportNetwork { graph, airport_ids })
}

/// Loads the route network from files on disk.
///
/// # Errors
/// Returns [`NetSirError::IoError`] if a file cannot be opened and
/// [`NetSirError::CSVError`] if a table cannot be parsed.
pub fn load_airport_network(
    routes: &Path,
    airports: Option<&Path>,
) -> Result<AirportNetwork, NetSirError> {
    let known = airports
        .map(|path| read_airport_ids(File::open(path)?))
        .transpose()?;
    read_routes(File::open(routes)?, known.as_ref())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const ROUTES: &str = "\
Airline,Airline ID,Source airport,Source airport ID,Destination airport,Destination airport ID
2B,410,AER,2965,KZN,2990
2B,410,KZN,2990,AER,2965
2B,410,ASF,2966,KZN,2990
2B,410,ASF,2966,MRV,2962
2B,410,CEK,\\N,KZN,2990
ZZ,1,XXX,2962,XXX,2962
ZZ,1,MRV,2962,AAA,9999
";

    const AIRPORTS: &str = "\
Airport ID,Name
2965,Sochi
2990,Kazan
2966,Astrakhan
2962,Mineralnye Vody
";

    #[test]
    fn builds_a_simple_graph() {
        let network = read_routes(ROUTES.as_bytes(), None).unwrap();
        // 2965, 2990, 2966, 2962, 9999
        assert_eq!(network.graph.node_count(), 5);
        // AER-KZN (twice), ASF-KZN, ASF-MRV, MRV-AAA
        assert_eq!(network.graph.edge_count(), 4);
        assert_eq!(network.airport_ids, vec![2965, 2990, 2966, 2962, 9999]);
        assert_eq!(network.airport_id(NodeId(2)), Some(2966));
    }

    #[test]
    fn unknown_airports_are_dropped() {
        let known = read_airport_ids(AIRPORTS.as_bytes()).unwrap();
        assert_eq!(known.len(), 4);
        let network = read_routes(ROUTES.as_bytes(), Some(&known)).unwrap();
        assert_eq!(network.graph.node_count(), 4);
        assert_eq!(network.graph.edge_count(), 3);
        assert!(!network.airport_ids.contains(&9999));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("routes.csv");
        let airports = dir.path().join("airports.csv");
        File::create(&routes)
            .unwrap()
            .write_all(ROUTES.as_bytes())
            .unwrap();
        File::create(&airports)
            .unwrap()
            .write_all(AIRPORTS.as_bytes())
            .unwrap();

        let network = load_airport_network(&routes, Some(&airports)).unwrap();
        assert_eq!(network.graph.node_count(), 4);

        let missing = load_airport_network(&dir.path().join("nope.csv"), None);
        assert!(matches!(missing, Err(NetSirError::IoError(_))));
    }

    #[test]
    fn missing_columns_are_an_error() {
        let result = read_routes("a,b\n1,2\n".as_bytes(), None);
        assert!(matches!(result, Err(NetSirError::CSVError(_))));
    }
}
