//! Prompt Templates
//!
//! Centralizes every instruction string sent to the model.

use crate::project::model::{ChatMessage, ChatRole};

/// Persona for the regulatory Q&A surface.
pub const SYSTEM_PROMPT: &str = "You are the technical support desk of a low-voltage \
installation check tool. You are an expert in the REBT (low-voltage electrotechnical \
regulation) and in electrical installations. Help the installer diagnose faults and \
resolve technical doubts, professionally and concisely.";

/// Persona for the guided troubleshooting chat. One measurement per turn.
pub const TROUBLESHOOTING_SYSTEM_PROMPT: &str = "You are senior technical support for \
electrical installers. Golden rule: guide step by step. Ask for one measurement, take \
the value, and move on.";

/// Instruction for the panel photo audit.
pub const PANEL_AUDIT_PROMPT: &str = "Analyze this electrical panel photo for risks, \
components and regulatory compliance.";

/// Sentinel that separates the narrative from the schematic block in an
/// audit response. Kept on its own line by instruction.
pub const DIAGRAM_SENTINEL: &str = "[DIAGRAM]";

/// Extra instruction appended when the caller wants a one-line schematic.
pub fn panel_audit_prompt(include_diagram: bool) -> String {
    if include_diagram {
        format!(
            "{PANEL_AUDIT_PROMPT} Then, after a line containing only {DIAGRAM_SENTINEL}, \
             output a textual single-line schematic of the panel topology."
        )
    } else {
        PANEL_AUDIT_PROMPT.to_string()
    }
}

/// Instruction for the instrument display OCR.
pub const OCR_PROMPT: &str = "Extract ONLY the main number shown on the digital display. \
No units, no letters.";

/// Opening message of a troubleshooting session.
pub fn session_opening(description: &str) -> String {
    format!("SUPPORT, reported fault: {description}. Guide me step by step.")
}

/// Report-generation prompt over a finished transcript.
pub fn report_prompt(history: &[ChatMessage]) -> String {
    let transcript: Vec<String> = history
        .iter()
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "USER",
                ChatRole::Assistant => "ASSISTANT",
            };
            format!("{role}: {}", m.content)
        })
        .collect();
    format!(
        "Generate a TECHNICAL REPORT based on this intervention:\n{}",
        transcript.join("\n")
    )
}
