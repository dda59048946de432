//! Static help content: crisis hotlines and the standing disclaimer.

use serde::Serialize;

/// A helpline shown on the resources page.
#[derive(Debug, Clone, Serialize)]
pub struct CrisisResource {
    pub name: &'static str,
    pub number: &'static str,
    pub description: &'static str,
    pub url: &'static str,
}

pub const EMERGENCY_NUMBERS: [&str; 2] = ["100", "112"];

pub const CRISIS_RESOURCES: [CrisisResource; 4] = [
    CrisisResource {
        name: "Tele MANAS",
        number: "14416 / 1800-89-14416",
        description: "24/7 National Helpline",
        url: "https://telemanas.mohfw.gov.in",
    },
    CrisisResource {
        name: "KIRAN Helpline",
        number: "1800-599-0019",
        description: "24/7 Govt Mental Health Support",
        url: "https://disabilityaffairs.gov.in",
    },
    CrisisResource {
        name: "Aasra",
        number: "9820466726",
        description: "Suicide Prevention",
        url: "http://aasra.info",
    },
    CrisisResource {
        name: "Vandrevala Foundation",
        number: "9999666555",
        description: "24/7 Counseling",
        url: "https://www.vandrevalafoundation.com",
    },
];

pub const DISCLAIMER: &str = "⚠️ **Disclaimer**: MindcareAI is an AI tool and not a replacement for professional therapy. If in crisis, please call the helplines listed above.";

/// The help panel as markdown.
pub fn crisis_markdown() -> String {
    let mut out = String::from("### 🚨 Indian Emergency Resources\n");
    out.push_str(&format!(
        "If you are in immediate danger, please call emergency services (**{}** or **{}**).\n\n",
        EMERGENCY_NUMBERS[0], EMERGENCY_NUMBERS[1]
    ));
    for r in &CRISIS_RESOURCES {
        out.push_str(&format!(
            "*   **{}**: Call **{}** ({})\n",
            r.name, r.number, r.description
        ));
    }
    out
}
