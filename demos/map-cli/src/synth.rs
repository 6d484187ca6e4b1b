//! Synthetic grid dataset for trying the tool without a preprocessed map.
//!
//! An `n × n` grid of nodes `spacing` metres apart.  Every fourth row is a
//! primary road and the rest are residential streets; the first column is a
//! secondary road.  Residential streets in odd columns are one-way
//! northbound.  A footway crosses the first cell diagonally, and a single
//! coastline polygon surrounds the grid one cell out.

use std::path::Path;

use map_core::{NodeId, OneWay, RoadType};
use map_loader::{DatasetInfo, DatasetWriter, EdgeRecord, LoadResult, NodeRecord};

pub struct GridStats {
    pub nodes: usize,
    pub edges: usize,
}

pub fn write_grid(data: &Path, coastline: Option<&Path>, n: u32, spacing: f32) -> LoadResult<GridStats> {
    let n = n.max(2);
    let id = |row: u32, col: u32| NodeId(row * n + col);

    let nodes: Vec<NodeRecord> = (0..n)
        .flat_map(|row| (0..n).map(move |col| (row, col)))
        .map(|(row, col)| NodeRecord {
            id: (row * n + col) as i32,
            x:  col as f32 * spacing,
            y:  row as f32 * spacing,
        })
        .collect();

    let mut by_type: Vec<(RoadType, Vec<EdgeRecord>)> = Vec::new();
    let mut push = |road_type: RoadType, record: EdgeRecord| {
        match by_type.iter_mut().find(|(rt, _)| *rt == road_type) {
            Some((_, records)) => records.push(record),
            None => by_type.push((road_type, vec![record])),
        }
    };

    for row in 0..n {
        let road_type = if row % 4 == 0 { RoadType::Primary } else { RoadType::Residential };
        let name = format!("Row {row}");
        for col in 0..n - 1 {
            push(road_type, street(road_type, &name, spacing, OneWay::None, id(row, col), id(row, col + 1)));
        }
    }
    for col in 0..n {
        let (road_type, one_way) = match col {
            0 => (RoadType::Secondary, OneWay::None),
            c if c % 2 == 1 => (RoadType::Residential, OneWay::ForwardOnly),
            _ => (RoadType::Residential, OneWay::None),
        };
        let name = format!("Column {col}");
        for row in 0..n - 1 {
            push(road_type, street(road_type, &name, spacing, one_way, id(row, col), id(row + 1, col)));
        }
    }
    let diagonal = spacing * std::f32::consts::SQRT_2;
    push(
        RoadType::Pedestrian,
        street(RoadType::Pedestrian, "Footway", diagonal, OneWay::None, id(0, 0), id(1, 1)),
    );

    let extent = (n - 1) as f64 * spacing as f64;
    let w = DatasetWriter::create(data)?;
    let edges = by_type.iter().map(|(_, records)| records.len()).sum();
    w.write_info(&DatasetInfo {
        x_low:           0.0,
        y_low:           0.0,
        x_high:          extent,
        y_high:          extent,
        node_count:      nodes.len(),
        edge_count_hint: edges,
    })?;
    w.write_nodes(&nodes)?;
    for (road_type, records) in &by_type {
        w.write_edges(*road_type, records)?;
    }

    if let Some(dir) = coastline {
        let lo = -spacing;
        let hi = extent as f32 + spacing;
        let ring = [(lo, lo), (hi, lo), (hi, hi), (lo, hi)];
        let ring_nodes: Vec<NodeRecord> = ring
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| NodeRecord { id: i as i32, x, y })
            .collect();
        let polygon: Vec<NodeId> = (0..ring.len() as u32).map(NodeId).collect();
        DatasetWriter::create(dir)?.write_coastline(&ring_nodes, &[polygon])?;
    }

    Ok(GridStats { nodes: nodes.len(), edges })
}

fn street(road_type: RoadType, name: &str, length: f32, one_way: OneWay, a: NodeId, b: NodeId) -> EdgeRecord {
    EdgeRecord::new(road_type, name, length, road_type.nominal_drive_time(length), one_way, &[a, b])
}
