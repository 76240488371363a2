use std::fs::File;
use std::path::Path;

use anyhow::Context as _;
use polars::prelude::{Column, CsvReader, DataFrame, DataType, SerReader};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::io::require_file;
use crate::map::cities::{CityNode, CityTable, NodeId};

/// Column names of the city registry CSV.
///
/// `id`, `lat` and `lng` are required; the descriptive columns are read when present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CityCsvSchema {
    pub id: String,
    pub lat: String,
    pub lng: String,
    pub name: String,
    pub state: String,
    pub population: String,
}

impl Default for CityCsvSchema {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            lat: "lat".to_string(),
            lng: "lng".to_string(),
            name: "city".to_string(),
            state: "state_id".to_string(),
            population: "population".to_string(),
        }
    }
}

/// Load the city registry and build the id lookup table.
#[tracing::instrument(skip(schema))]
pub fn load_cities(path: &Path, schema: &CityCsvSchema) -> CityweaveResult<CityTable> {
    require_file(path, "csv")?;
    let file = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    let df = CsvReader::new(file)
        .finish()
        .with_context(|| format!("read CSV '{}'", path.display()))?;

    let nodes = nodes_from_frame(&df, schema)
        .map_err(|e| match e {
            CityweaveError::Input(msg) => {
                CityweaveError::input(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
    let table = CityTable::from_nodes(nodes)?;
    tracing::info!(cities = table.len(), dense = table.is_dense(), "loaded city registry");
    Ok(table)
}

fn required<'a>(df: &'a DataFrame, name: &str) -> CityweaveResult<&'a Column> {
    df.column(name)
        .map_err(|_| CityweaveError::input(format!("missing required column '{name}'")))
}

fn as_f64s(col: &Column) -> CityweaveResult<Vec<Option<f64>>> {
    let cast = col
        .cast(&DataType::Float64)
        .with_context(|| format!("cast column '{}' to float", col.name()))?;
    let values = cast
        .f64()
        .with_context(|| format!("column '{}'", col.name()))?;
    Ok(values.into_iter().collect())
}

fn as_strings(df: &DataFrame, name: &str) -> CityweaveResult<Option<Vec<Option<String>>>> {
    let Ok(col) = df.column(name) else {
        return Ok(None);
    };
    let cast = col
        .cast(&DataType::String)
        .with_context(|| format!("cast column '{name}' to string"))?;
    let values = cast.str().with_context(|| format!("column '{name}'"))?;
    Ok(Some(
        values.into_iter().map(|v| v.map(str::to_string)).collect(),
    ))
}

fn nodes_from_frame(df: &DataFrame, schema: &CityCsvSchema) -> CityweaveResult<Vec<CityNode>> {
    let ids = as_f64s(required(df, &schema.id)?)?;
    let lats = as_f64s(required(df, &schema.lat)?)?;
    let lngs = as_f64s(required(df, &schema.lng)?)?;
    let names = as_strings(df, &schema.name)?;
    let states = as_strings(df, &schema.state)?;
    let pops = match df.column(&schema.population) {
        Ok(col) => Some(as_f64s(col)?),
        Err(_) => None,
    };

    let mut nodes = Vec::with_capacity(ids.len());
    for row in 0..ids.len() {
        // Row numbers in messages count the header as line 1.
        let line = row + 2;
        let id = match ids[row] {
            Some(v) if v.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&v) => v as u32,
            Some(v) => {
                return Err(CityweaveError::input(format!(
                    "line {line}: '{}' value {v} is not a non-negative integer id",
                    schema.id
                )));
            }
            None => {
                return Err(CityweaveError::input(format!(
                    "line {line}: missing or non-numeric '{}'",
                    schema.id
                )));
            }
        };
        let (Some(lat), Some(lng)) = (lats[row], lngs[row]) else {
            return Err(CityweaveError::input(format!(
                "line {line}: city {id} has a missing or non-numeric coordinate"
            )));
        };

        let text = |col: &Option<Vec<Option<String>>>| {
            col.as_ref()
                .and_then(|v| v[row].clone())
                .unwrap_or_default()
        };
        let population = pops
            .as_ref()
            .and_then(|p| p[row])
            .filter(|p| p.is_finite() && *p >= 0.0)
            .map(|p| p.round() as u64);

        nodes.push(CityNode {
            id: NodeId(id),
            lat,
            lng,
            name: text(&names),
            state_code: text(&states),
            population,
        });
    }
    Ok(nodes)
}

#[cfg(test)]
#[path = "../../tests/unit/io/cities.rs"]
mod tests;
