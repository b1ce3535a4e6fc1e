//! Caller-owned disaster simulation sessions
//!
//! Simulation mode is per session, never process-wide: two operators
//! rehearsing disasters for different villages do not see each other's state.

use std::fmt::Display;

use ahash::AHashMap;
use chrono::{DateTime, TimeZone};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::weather::policy::{qos_policy, resilience, sample_reading, scenario_for, NetworkPolicy};

/// Resilience below this triggers SOS regardless of severity
const SOS_RESILIENCE_FLOOR: i32 = 40;
/// Severity above this triggers SOS
const SOS_SEVERITY: i32 = 80;

/// Weather and network posture for one village at one instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub village_id: String,
    pub condition: String,
    pub temp: String,
    pub severity_score: i32,
    pub is_sos_triggered: bool,
    pub resilience_score: i32,
    pub alert_message: String,
    pub network_policy: NetworkPolicy,
    pub timestamp: String,
}

/// Assess a village's weather against the deployed technology
pub fn check_resilience<R: Rng + ?Sized>(
    village: &str,
    tech: &str,
    simulate: bool,
    rng: &mut R,
    timestamp: &str,
) -> WeatherReport {
    let reading = sample_reading(scenario_for(village), simulate, rng);
    let resilience_score = resilience(tech, reading.severity);
    let sos = reading.severity > SOS_SEVERITY || resilience_score < SOS_RESILIENCE_FLOOR;

    let alert_message = if sos {
        format!("CRITICAL ALERT: {} exceeding safety limits.", reading.condition)
    } else {
        "All Systems Nominal".to_string()
    };

    // High-altitude village runs well below freezing
    let temp = if village == "chitkul" {
        format!("{}°C", rng.gen_range(-15..=-5i32))
    } else {
        "12°C".to_string()
    };

    WeatherReport {
        village_id: village.to_string(),
        condition: reading.condition.to_string(),
        temp,
        severity_score: reading.severity,
        is_sos_triggered: sos,
        resilience_score,
        alert_message,
        network_policy: qos_policy(reading.severity),
        timestamp: timestamp.to_string(),
    }
}

/// `HH:MM:SS` in the instant's own time zone; callers pass `Local::now()`
pub fn clock_stamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%H:%M:%S").to_string()
}

/// State of one operator's disaster rehearsal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterSession {
    pub village: String,
    pub simulate: bool,
    pub last_severity: Option<i32>,
    pub checks: u32,
    pub sos_count: u32,
}

/// Session id -> session. Owned and passed around by the caller.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: AHashMap<String, DisasterSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a session into simulated-disaster mode for `village`
    pub fn start_simulation(&mut self, session_id: &str, village: &str) {
        tracing::info!("Session {} simulating disaster at {}", session_id, village);
        self.sessions.insert(
            session_id.to_string(),
            DisasterSession {
                village: village.to_string(),
                simulate: true,
                last_severity: None,
                checks: 0,
                sos_count: 0,
            },
        );
    }

    /// Leave simulated mode; returns the finished session
    pub fn end_simulation(&mut self, session_id: &str) -> Option<DisasterSession> {
        self.sessions.remove(session_id)
    }

    pub fn get(&self, session_id: &str) -> Option<&DisasterSession> {
        self.sessions.get(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Check a village within a session. Only the session's own village is
    /// simulated; everything else reports real conditions.
    pub fn check<R: Rng + ?Sized>(
        &mut self,
        session_id: &str,
        village: &str,
        tech: &str,
        rng: &mut R,
        timestamp: &str,
    ) -> WeatherReport {
        let simulate = self
            .sessions
            .get(session_id)
            .map_or(false, |s| s.simulate && s.village == village);

        let report = check_resilience(village, tech, simulate, rng, timestamp);

        if let Some(session) = self.sessions.get_mut(session_id) {
            if session.village == village {
                session.last_severity = Some(report.severity_score);
                session.checks += 1;
                if report.is_sos_triggered {
                    session.sos_count += 1;
                }
            }
        }

        report
    }
}
