//! Project Data Model
//!
//! Everything the installer records on site. User-entered numeric fields
//! are kept as the exact strings typed on the instrument keypad; parsing
//! happens at validation time so that persistence round-trips are
//! digit-for-digit faithful.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compliance::impedance::{self, LineCheck, LoopCheck};
use crate::compliance::insulation::{self, ResistanceUnit, TestVoltage};
use crate::compliance::rcd::{self, RcdClass, RcdMeasurement, RcdTestKind, RcdVerdict};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse().ok()
}

/// One recorded slot of an RCD test set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcdSlot {
    /// Trip time in ms, as typed.
    pub time_ms: String,
    /// Trip current in mA, as typed (ramp test).
    pub leakage_ma: String,
    pub tripped: bool,
    pub tested: bool,
}

impl RcdSlot {
    fn untested(tripped: bool) -> Self {
        RcdSlot {
            time_ms: String::new(),
            leakage_ma: String::new(),
            tripped,
            tested: false,
        }
    }

    pub fn measurement(&self) -> RcdMeasurement {
        RcdMeasurement {
            tripped: self.tripped,
            trip_time_ms: parse_number(&self.time_ms),
            leakage_ma: parse_number(&self.leakage_ma),
        }
    }
}

/// The four test slots of a device. One per injection level, always
/// present; the invariant lives in the type, not in a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcdResults {
    pub half_rated: RcdSlot,
    pub rated: RcdSlot,
    pub five_times: RcdSlot,
    pub auto: RcdSlot,
}

impl Default for RcdResults {
    fn default() -> Self {
        // Trip expectation pre-seeded per level: the hold test defaults to
        // "did not trip", the rest to "tripped".
        RcdResults {
            half_rated: RcdSlot::untested(false),
            rated: RcdSlot::untested(true),
            five_times: RcdSlot::untested(true),
            auto: RcdSlot::untested(true),
        }
    }
}

impl RcdResults {
    pub fn slot(&self, kind: RcdTestKind) -> &RcdSlot {
        match kind {
            RcdTestKind::HalfRated => &self.half_rated,
            RcdTestKind::Rated => &self.rated,
            RcdTestKind::FiveTimes => &self.five_times,
            RcdTestKind::Auto => &self.auto,
        }
    }

    pub fn slot_mut(&mut self, kind: RcdTestKind) -> &mut RcdSlot {
        match kind {
            RcdTestKind::HalfRated => &mut self.half_rated,
            RcdTestKind::Rated => &mut self.rated,
            RcdTestKind::FiveTimes => &mut self.five_times,
            RcdTestKind::Auto => &mut self.auto,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RcdTestKind, &RcdSlot)> {
        RcdTestKind::ALL.iter().map(move |k| (*k, self.slot(*k)))
    }
}

/// A differential breaker under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcdDevice {
    pub id: String,
    pub label: String,
    /// Rated sensitivity in mA, as typed.
    pub rated_ma: String,
    /// Free-form nameplate type ("Type AC", "Type A"...).
    pub type_label: String,
    pub class: RcdClass,
    pub results: RcdResults,
}

impl RcdDevice {
    pub fn new(label: impl Into<String>, rated_ma: impl Into<String>) -> Self {
        RcdDevice {
            id: new_id(),
            label: label.into(),
            rated_ma: rated_ma.into(),
            type_label: "Type AC".to_string(),
            class: RcdClass::Standard,
            results: RcdResults::default(),
        }
    }

    pub fn rated_sensitivity_ma(&self) -> Option<f64> {
        parse_number(&self.rated_ma)
    }

    /// Verdict for one injection level. Untested slots report as such
    /// instead of failing.
    pub fn verdict_for(&self, kind: RcdTestKind) -> RcdVerdict {
        let slot = self.results.slot(kind);
        if !slot.tested {
            return RcdVerdict::NotTested;
        }
        let rated = self.rated_sensitivity_ma().unwrap_or(0.0);
        rcd::validate(kind, self.class, rated, &slot.measurement())
    }

    /// Clear every slot back to its untested default.
    pub fn reset_results(&mut self) {
        self.results = RcdResults::default();
    }
}

/// A single megger reading. Immutable once recorded: the pass flag is
/// computed here and never revisited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationReading {
    pub id: String,
    pub point: String,
    pub voltage: TestVoltage,
    /// Reading as typed.
    pub value: String,
    pub unit: ResistanceUnit,
    pub passed: bool,
    pub recorded_at: DateTime<Utc>,
}

impl InsulationReading {
    pub fn record(
        point: impl Into<String>,
        voltage: TestVoltage,
        value: impl Into<String>,
        unit: ResistanceUnit,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let value = value.into();
        let passed = parse_number(&value)
            .map(|v| insulation::is_acceptable(voltage, v))
            .unwrap_or(false);
        InsulationReading {
            id: new_id(),
            point: point.into(),
            voltage,
            value,
            unit,
            passed,
            recorded_at,
        }
    }
}

/// A breaker circuit with its impedance readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpedanceDevice {
    pub id: String,
    pub label: String,
    /// Phase-neutral impedance in Ω, as typed.
    pub line_ohms: String,
    /// Phase-earth impedance in Ω, as typed; empty until measured.
    pub loop_ohms: Option<String>,
    pub curve: impedance::CurveClass,
    /// Breaker rating in A, as typed.
    pub rated_amps: String,
    pub manufacturer: String,
}

impl ImpedanceDevice {
    pub fn new(label: impl Into<String>, curve: impedance::CurveClass, rated_amps: impl Into<String>) -> Self {
        ImpedanceDevice {
            id: new_id(),
            label: label.into(),
            line_ohms: String::new(),
            loop_ohms: None,
            curve,
            rated_amps: rated_amps.into(),
            manufacturer: "Generic".to_string(),
        }
    }

    /// Line-mode check, when both the reading and the rating parse.
    pub fn line_check(&self) -> Option<LineCheck> {
        let measured = parse_number(&self.line_ohms)?;
        let rated = parse_number(&self.rated_amps)?;
        Some(impedance::check_line(measured, rated, self.curve))
    }

    /// Loop-mode check against a given RCD sensitivity and environment.
    pub fn loop_check(&self, sensitivity_ma: f64, humid: bool) -> Option<LoopCheck> {
        let measured = parse_number(self.loop_ohms.as_deref()?)?;
        Some(impedance::check_loop(measured, sensitivity_ma, humid))
    }
}

/// Impedance test bench state: the circuits plus the loop-test context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpedanceState {
    pub devices: Vec<ImpedanceDevice>,
    /// RCD sensitivity the loop limit is computed against, in mA, as typed.
    pub sensitivity_ma: String,
    pub humid: bool,
}

impl Default for ImpedanceState {
    fn default() -> Self {
        ImpedanceState {
            devices: vec![ImpedanceDevice::new("MCB 1", impedance::CurveClass::C, "16")],
            sensitivity_ma: "30".to_string(),
            humid: false,
        }
    }
}

impl ImpedanceState {
    pub fn sensitivity(&self) -> Option<f64> {
        parse_number(&self.sensitivity_ma)
    }
}

/// Who said what in an assistant transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A web source the assistant grounded an answer on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Citation {
    pub title: String,
    pub uri: String,
}

/// One turn of a chat transcript. Transcripts are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Citation>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::User,
            content: content.into(),
            sources: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::Assistant,
            content: content.into(),
            sources: Vec::new(),
        }
    }
}

/// Guided fault-diagnosis session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TroubleshootingState {
    pub description: String,
    pub messages: Vec<ChatMessage>,
    pub active: bool,
}

impl TroubleshootingState {
    pub fn reset(&mut self) {
        *self = TroubleshootingState::default();
    }
}

/// The collections a project (or the standalone default) owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingSet {
    pub rcd_devices: Vec<RcdDevice>,
    /// Newest first.
    pub insulation_history: Vec<InsulationReading>,
    pub impedance: ImpedanceState,
    pub troubleshooting: TroubleshootingState,
}

impl Default for WorkingSet {
    fn default() -> Self {
        WorkingSet {
            rcd_devices: vec![RcdDevice::new("RCD MAIN", "30")],
            insulation_history: Vec::new(),
            impedance: ImpedanceState::default(),
            troubleshooting: TroubleshootingState::default(),
        }
    }
}

impl WorkingSet {
    /// Prepend a reading; history is ordered newest first.
    pub fn push_insulation(&mut self, reading: InsulationReading) {
        self.insulation_history.insert(0, reading);
    }
}

/// A client job. Owns its collections exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: WorkingSet,
}

impl Project {
    pub fn new(client_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Project {
            id: new_id(),
            client_name: client_name.into(),
            created_at: now,
            updated_at: now,
            data: WorkingSet::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_results_have_all_four_slots_untested() {
        let device = RcdDevice::new("RCD MAIN", "30");
        for (kind, slot) in device.results.iter() {
            assert!(!slot.tested, "{kind:?} should start untested");
            assert_eq!(device.verdict_for(kind), RcdVerdict::NotTested);
        }
        assert!(!device.results.half_rated.tripped);
        assert!(device.results.rated.tripped);
    }

    #[test]
    fn verdict_uses_typed_measurement() {
        let mut device = RcdDevice::new("RCD MAIN", "30");
        let slot = device.results.slot_mut(RcdTestKind::Rated);
        slot.tested = true;
        slot.tripped = true;
        slot.time_ms = "299".to_string();
        assert!(device.verdict_for(RcdTestKind::Rated).is_pass());

        device.results.rated.time_ms = "300".to_string();
        assert!(!device.verdict_for(RcdTestKind::Rated).is_pass());
    }

    #[test]
    fn comma_decimal_entries_parse() {
        let reading = InsulationReading::record(
            "L1-PE",
            TestVoltage::V500,
            "1,2",
            ResistanceUnit::MegaOhm,
            Utc::now(),
        );
        assert!(reading.passed);
        assert_eq!(reading.value, "1,2");
    }

    #[test]
    fn unparseable_reading_fails_closed() {
        let reading = InsulationReading::record(
            "L1-PE",
            TestVoltage::V500,
            "n/a",
            ResistanceUnit::MegaOhm,
            Utc::now(),
        );
        assert!(!reading.passed);
    }

    #[test]
    fn insulation_history_is_newest_first() {
        let mut ws = WorkingSet::default();
        let t = Utc::now();
        ws.push_insulation(InsulationReading::record(
            "first",
            TestVoltage::V250,
            "0.5",
            ResistanceUnit::MegaOhm,
            t,
        ));
        ws.push_insulation(InsulationReading::record(
            "second",
            TestVoltage::V250,
            "0.6",
            ResistanceUnit::MegaOhm,
            t,
        ));
        assert_eq!(ws.insulation_history[0].point, "second");
        assert_eq!(ws.insulation_history[1].point, "first");
    }

    #[test]
    fn impedance_device_checks_need_parseable_fields() {
        let mut device = ImpedanceDevice::new("MCB 1", impedance::CurveClass::C, "16");
        assert!(device.line_check().is_none());
        device.line_ohms = "1.4".to_string();
        let check = device.line_check().unwrap();
        assert!(check.pass);
        assert!(device.loop_check(30.0, false).is_none());
        device.loop_ohms = Some("1000".to_string());
        assert!(device.loop_check(30.0, false).unwrap().pass);
    }

    #[test]
    fn project_json_round_trip_is_field_for_field() {
        let mut project = Project::new("ACME S.L.", Utc::now());
        project.data.rcd_devices[0].results.rated.time_ms = "123.450".to_string();
        project.data.push_insulation(InsulationReading::record(
            "L1-PE",
            TestVoltage::V1000,
            "0.99",
            ResistanceUnit::GigaOhm,
            Utc::now(),
        ));
        let json = serde_json::to_string(&project).unwrap();
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(project, back);
        // The typed string survives exactly, trailing zero included.
        assert_eq!(back.data.rcd_devices[0].results.rated.time_ms, "123.450");
    }
}
