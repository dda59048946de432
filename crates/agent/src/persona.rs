//! Fixed persona instruction and chat presentation text.

/// System instruction sent as the first message of every request.
pub const PERSONA_INSTRUCTION: &str = "You are MindcareAI, a compassionate, empathetic, and evidence-based mental health assistant.

Your goals:
1. Provide emotional support and active listening.
2. Offer evidence-based coping strategies (CBT techniques, mindfulness, grounding exercises).
3. Always maintain a professional yet warm and non-judgmental tone.
4. Help users identify their feelings and navigate mild to moderate stress, anxiety, and low mood.
5. IF A USER INDICATES SELF-HARM OR CRISIS:
   - Immediately provide Indian crisis resources like Tele MANAS (14416) or KIRAN (1800-599-0019).
   - Express sincere concern.
   - Clarify that you are an AI.
6. Use grounding to find reputable mental health resources in India if asked.
7. Be concise but warm.";

pub const APP_TITLE: &str = "🌿 MindcareAI (India)";

pub const TAGLINE: &str = "Your compassionate AI companion for mental support.";

pub const CHAT_DESCRIPTION: &str = "I'm here to listen. Tell me what's on your mind.";

/// Starter prompts offered by the chat view.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "I'm feeling very anxious today",
    "Help me with a breathing exercise",
    "Where can I find mental health clinics in Mumbai?",
];

/// The persona to use: a configured override, or the built-in instruction.
pub fn resolve(override_text: Option<&str>) -> String {
    match override_text.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PERSONA_INSTRUCTION.to_string(),
    }
}
