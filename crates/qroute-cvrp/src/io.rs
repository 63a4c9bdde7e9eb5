use std::collections::HashMap;
use std::{fs, path::Path};

use log::debug;

use crate::{Instance, InstanceDef, InstanceError, NodeDef, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Coords,
    Demands,
    Depot,
}

/// Parse a TSPLIB-style `.vrp` text into an instance definition.
///
/// Only `EUC_2D` CVRP files with a single depot are accepted. Unknown header
/// keys are skipped. A `COMMENT` containing `Optimal value: N` fills
/// `known_optimum`.
pub fn parse_vrp(text: &str) -> Result<InstanceDef, InstanceError> {
    let mut section = Section::Header;
    let mut name = None;
    let mut capacity = None;
    let mut dimension: Option<usize> = None;
    let mut known_optimum = None;
    let mut coords: Vec<(u32, f64, f64)> = Vec::new();
    let mut demands: HashMap<u32, (usize, i64)> = HashMap::new();
    let mut depot: Option<u32> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("EOF") {
            break;
        }
        if line.starts_with("NODE_COORD_SECTION") {
            section = Section::Coords;
            continue;
        }
        if line.starts_with("DEMAND_SECTION") {
            section = Section::Demands;
            continue;
        }
        if line.starts_with("DEPOT_SECTION") {
            section = Section::Depot;
            continue;
        }

        match section {
            Section::Header => {
                let Some((key, value)) = line.split_once(':') else {
                    return Err(parse_error(
                        line_no,
                        format!("expected 'KEY : VALUE', got '{line}'"),
                    ));
                };
                let value = value.trim();
                match key.trim() {
                    "NAME" => name = Some(value.to_string()),
                    "COMMENT" => known_optimum = parse_optimum(value),
                    "TYPE" if value != "CVRP" => {
                        return Err(parse_error(
                            line_no,
                            format!("expected TYPE 'CVRP', got '{value}'"),
                        ));
                    }
                    "EDGE_WEIGHT_TYPE" if value != "EUC_2D" => {
                        return Err(parse_error(
                            line_no,
                            format!("expected EDGE_WEIGHT_TYPE 'EUC_2D', got '{value}'"),
                        ));
                    }
                    "DIMENSION" => dimension = Some(parse_number(value, line_no, "DIMENSION")?),
                    "CAPACITY" => capacity = Some(parse_number(value, line_no, "CAPACITY")?),
                    other => debug!("skipping header key '{other}' on line {line_no}"),
                }
            }
            Section::Coords => {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() != 3 {
                    return Err(parse_error(line_no, format!("unexpected coord data: '{line}'")));
                }
                let id = parse_number(parts[0], line_no, "node id")?;
                let x = parse_number(parts[1], line_no, "x coordinate")?;
                let y = parse_number(parts[2], line_no, "y coordinate")?;
                coords.push((id, x, y));
            }
            Section::Demands => {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() != 2 {
                    return Err(parse_error(line_no, format!("unexpected demand data: '{line}'")));
                }
                let id = parse_number(parts[0], line_no, "node id")?;
                let demand = parse_number(parts[1], line_no, "demand")?;
                demands.insert(id, (line_no, demand));
            }
            Section::Depot => {
                let id: i64 = parse_number(line, line_no, "depot id")?;
                if id == -1 {
                    section = Section::Header;
                    continue;
                }
                if depot.is_some() {
                    return Err(parse_error(
                        line_no,
                        "multiple depots are not supported".to_string(),
                    ));
                }
                let id = u32::try_from(id)
                    .map_err(|_| parse_error(line_no, format!("invalid depot id {id}")))?;
                depot = Some(id);
            }
        }
    }

    if let Some(dimension) = dimension {
        if dimension != coords.len() {
            return Err(format_error(format!(
                "DIMENSION is {dimension} but {} nodes were listed",
                coords.len()
            )));
        }
    }

    let mut nodes = Vec::with_capacity(coords.len());
    for (id, x, y) in coords {
        let (_, demand) = demands
            .remove(&id)
            .ok_or_else(|| format_error(format!("cannot find demand for node {id}")))?;
        nodes.push(NodeDef { id, x, y, demand });
    }
    if let Some((id, (line_no, _))) = demands.into_iter().min_by_key(|(_, (line, _))| *line) {
        return Err(parse_error(line_no, format!("demand given for unknown node {id}")));
    }

    debug!(
        "parsed {} nodes, capacity {:?}, depot {:?}",
        nodes.len(),
        capacity,
        depot
    );

    Ok(InstanceDef {
        name,
        capacity,
        depot,
        known_optimum,
        nodes,
    })
}

/// Load a `.vrp` file from disk.
pub fn load_vrp(path: impl AsRef<Path>) -> Result<InstanceDef, InstanceError> {
    let text = fs::read_to_string(path)?;
    parse_vrp(&text)
}

/// Load and validate a `.vrp` file.
pub fn compile_vrp(
    path: impl AsRef<Path>,
    fallback_capacity: Option<u32>,
) -> Result<Instance, InstanceError> {
    load_vrp(path)?.compile(fallback_capacity)
}

/// Load an instance definition from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<InstanceDef, InstanceError> {
    let yaml = fs::read_to_string(path)?;
    let def: InstanceDef = serde_yaml::from_str(&yaml)?;
    Ok(def)
}

/// Serialize and write an instance definition to YAML.
pub fn save_yaml(path: impl AsRef<Path>, def: &InstanceDef) -> Result<(), InstanceError> {
    let yaml = serde_yaml::to_string(def)?;
    fs::write(path, yaml)?;
    Ok(())
}

/// Parse a CVRPLIB `.sol` text into a route and its declared cost.
///
/// Each `Route #N: a b c` line is one trip. Customers are numbered the
/// CVRPLIB way, counting the depot as 0, so number `k` names node id `k + 1`.
/// The depot is added at both ends of every trip. A `Cost N` line fills the
/// cost; other lines are skipped. Feasibility is not checked here, use
/// `Route::validate`.
pub fn parse_sol(text: &str, instance: &Instance) -> Result<(Route, Option<f64>), InstanceError> {
    let depot_id = instance.depot().id;
    let mut ids = vec![depot_id];
    let mut trips = 0;
    let mut cost = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.starts_with("Route") {
            let Some((_, numbers)) = line.split_once(':') else {
                return Err(parse_error(line_no, format!("expected 'Route #N: ...', got '{line}'")));
            };
            let start = ids.len();
            for number in numbers.split_whitespace() {
                let number: u32 = parse_number(number, line_no, "customer number")?;
                let id = number
                    .checked_add(1)
                    .filter(|id| *id != depot_id && instance.index_of(*id).is_some())
                    .ok_or_else(|| parse_error(line_no, format!("unknown customer {number}")))?;
                ids.push(id);
            }
            if ids.len() == start {
                return Err(parse_error(line_no, "route lists no customers".to_string()));
            }
            ids.push(depot_id);
            trips += 1;
        } else if line.starts_with("Cost") || line.starts_with("cost") {
            let value = line.split_whitespace().nth(1).unwrap_or_default();
            let value: f64 = parse_number(value, line_no, "cost")?;
            if !value.is_finite() || value <= 0.0 {
                return Err(parse_error(line_no, format!("cost must be positive, got {value}")));
            }
            cost = Some(value);
        } else if !line.is_empty() {
            debug!("skipping solution line {line_no}: '{line}'");
        }
    }

    if trips == 0 {
        return Err(format_error("solution lists no routes".to_string()));
    }

    let route = Route::from_node_ids(instance, &ids)
        .map_err(|err| format_error(err.to_string()))?;
    Ok((route, cost))
}

/// Load a `.sol` file for an already compiled instance.
pub fn load_sol(
    path: impl AsRef<Path>,
    instance: &Instance,
) -> Result<(Route, Option<f64>), InstanceError> {
    let text = fs::read_to_string(path)?;
    parse_sol(&text, instance)
}

fn parse_error(line: usize, message: String) -> InstanceError {
    InstanceError::Parse { line, message }
}

fn format_error(message: String) -> InstanceError {
    InstanceError::Format { message }
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    line: usize,
    what: &str,
) -> Result<T, InstanceError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| parse_error(line, format!("cannot parse {what}: '{value}'")))
}

/// Extract `N` from a comment such as `(Augerat et al, No of trucks: 5, Optimal value: 784)`.
fn parse_optimum(comment: &str) -> Option<f64> {
    let (_, rest) = comment.split_once("Optimal value:")?;
    let number: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}
