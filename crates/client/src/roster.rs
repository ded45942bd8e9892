// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate health metrics derived from the worker-node roster.

use serde::Serialize;

use crate::api::NodeSummary;

/// Rounded percentage of `active` over `capacity`; 0 when there is no capacity.
///
/// Halves round up, so 1 of 8 is 13%.
pub fn utilization(active: u64, capacity: u64) -> u64 {
    if capacity == 0 {
        return 0;
    }
    (200 * active + capacity) / (2 * capacity)
}

/// Fleet-wide totals recomputed from the current roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetMetrics {
    pub node_count: usize,
    pub healthy_count: usize,
    pub total_capacity: u64,
    pub total_active: u64,
}

impl FleetMetrics {
    pub fn from_nodes(nodes: &[NodeSummary]) -> Self {
        nodes.iter().fold(Self::default(), |mut m, node| {
            m.node_count += 1;
            if !node.penalized {
                m.healthy_count += 1;
            }
            m.total_capacity += u64::from(node.max_parallel);
            m.total_active += u64::from(node.active_tasks);
            m
        })
    }

    pub fn utilization(&self) -> u64 {
        utilization(self.total_active, self.total_capacity)
    }
}

/// Display band for a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadLevel {
    /// Temporarily excluded from new work by the backend.
    Penalized,
    /// Above 80% utilization.
    Hot,
    /// Above 50% utilization.
    Busy,
    Normal,
}

impl LoadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Penalized => "penalized",
            Self::Hot => "hot",
            Self::Busy => "busy",
            Self::Normal => "normal",
        }
    }
}

impl NodeSummary {
    pub fn utilization(&self) -> u64 {
        utilization(u64::from(self.active_tasks), u64::from(self.max_parallel))
    }

    pub fn load_level(&self) -> LoadLevel {
        if self.penalized {
            return LoadLevel::Penalized;
        }
        match self.utilization() {
            u if u > 80 => LoadLevel::Hot,
            u if u > 50 => LoadLevel::Busy,
            _ => LoadLevel::Normal,
        }
    }
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod tests;
