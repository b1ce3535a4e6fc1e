//! Weather severity -> network QoS policy and technology resilience

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Traffic shaping tier derived from weather severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QosStatus {
    #[serde(rename = "OPTIMAL")]
    Optimal,
    #[serde(rename = "THROTTLED")]
    Throttled,
    #[serde(rename = "CRITICAL / SOS")]
    Critical,
}

impl QosStatus {
    pub fn from_severity(severity: i32) -> Self {
        match severity {
            s if s < 40 => Self::Optimal,
            s if s < 80 => Self::Throttled,
            _ => Self::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPolicy {
    pub status: QosStatus,
    /// Bandwidth cap (Mbps)
    pub bandwidth_cap: u32,
    pub allowed_apps: Vec<String>,
    pub blocked_apps: Vec<String>,
    pub priority_msg: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Bandwidth policy for a severity score (0-100)
pub fn qos_policy(severity: i32) -> NetworkPolicy {
    match QosStatus::from_severity(severity) {
        QosStatus::Optimal => NetworkPolicy {
            status: QosStatus::Optimal,
            bandwidth_cap: 100,
            allowed_apps: strings(&["Voice", "4K Video", "Social Media", "Gaming"]),
            blocked_apps: Vec::new(),
            priority_msg: "Standard Routing Active.".into(),
        },
        QosStatus::Throttled => NetworkPolicy {
            status: QosStatus::Throttled,
            bandwidth_cap: 50,
            allowed_apps: strings(&["Voice", "WhatsApp", "Browsing"]),
            blocked_apps: strings(&["Netflix", "Gaming", "Downloads"]),
            priority_msg: "High latency detected. Non-essential traffic shaped.".into(),
        },
        QosStatus::Critical => NetworkPolicy {
            status: QosStatus::Critical,
            bandwidth_cap: 10,
            allowed_apps: strings(&["SOS Calls", "Medical Data", "Govt Alerts"]),
            blocked_apps: strings(&["ALL ENTERTAINMENT", "Social Media", "Video"]),
            priority_msg: "LIFE-LINE PROTOCOL. BANDWIDTH LOCKED FOR EMERGENCIES.".into(),
        },
    }
}

/// How well a backhaul technology holds up at a severity (0-100)
pub fn resilience(tech: &str, severity: i32) -> i32 {
    if tech.contains("Satellite") {
        if severity > 80 {
            95
        } else {
            100
        }
    } else if tech.contains("Microwave") {
        // Rain fade degrades microwave links quickly
        (100.0 - severity as f64 * 1.2).max(0.0) as i32
    } else if tech.contains("Fiber") {
        // Snap risk once conditions turn extreme
        if severity < 85 {
            100
        } else {
            40
        }
    } else {
        100
    }
}

/// A weather condition and its severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub condition: &'static str,
    pub severity: i32,
}

/// Observed and simulated-disaster readings for a village
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub village: &'static str,
    pub real: Reading,
    pub sim: Reading,
}

const SCENARIOS: [Scenario; 3] = [
    Scenario {
        village: "chitkul",
        real: Reading { condition: "Clear", severity: 10 },
        sim: Reading { condition: "Blizzard", severity: 90 },
    },
    Scenario {
        village: "kalpa",
        real: Reading { condition: "Cloudy", severity: 30 },
        sim: Reading { condition: "High Winds", severity: 75 },
    },
    Scenario {
        village: "langza",
        real: Reading { condition: "Sunny", severity: 0 },
        sim: Reading { condition: "Storm", severity: 60 },
    },
];

/// Scenario for a village; unknown villages use the first entry
pub fn scenario_for(village: &str) -> &'static Scenario {
    SCENARIOS
        .iter()
        .find(|s| s.village == village)
        .unwrap_or(&SCENARIOS[0])
}

const BLIZZARD_VARIANTS: [&str; 4] = ["Heavy Snow", "Whiteout", "Blizzard", "Gale Winds"];

/// Draw the current reading. Simulated disasters swing the severity by
/// -25..=+20 (clamped to 10..=100) so operators see the policy flip.
pub fn sample_reading<R: Rng + ?Sized>(scenario: &Scenario, simulate: bool, rng: &mut R) -> Reading {
    if !simulate {
        return scenario.real;
    }

    let base = scenario.sim;
    let jitter: i32 = rng.gen_range(-25..=20);
    let severity = (base.severity + jitter).clamp(10, 100);

    let condition = if base.condition == "Blizzard" {
        BLIZZARD_VARIANTS
            .choose(rng)
            .copied()
            .unwrap_or(base.condition)
    } else {
        base.condition
    };

    Reading { condition, severity }
}
