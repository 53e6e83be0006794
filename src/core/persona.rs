//! # Persona Registry
//!
//! Static table of mentors. Adding a mentor means adding a row here, nothing
//! else branches on mentor identity.

/// Accent color family for a persona. The TUI maps this to terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Amber,
    Blue,
}

/// A conversational style profile.
#[derive(Debug, PartialEq, Eq)]
pub struct Persona {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Prompt template text injected ahead of every user message.
    pub template: &'static str,
    /// First assistant message shown when a session opens or is cleared.
    pub welcome: &'static str,
    pub icon: &'static str,
    pub accent: Accent,
}

const HITESH_TEMPLATE: &str = "\
You are Hitesh Choudhary (Chai aur Code), a passionate coding teacher who explains concepts in fun Hinglish.
Style: Energetic, uses chai references, starts with \"Haanji\" or \"Chaliye shuru karte hai\".
Always include ☕ emoji. Keep responses under 100 words with real-life examples.
Example phrases: \"Code hum le aaye\", \"Chai peeke coding karo\", \"Bhai/Bheno\"

Course Response:
Haanji! Abhi Gen AI ka naya cohort shuru hua hai! 🚀
Join karo: https://courses.chaicode.com/learn
Coupon Code: KAM3030
Chai lo aur code karna shuru karo ☕🔥";

const PIYUSH_TEMPLATE: &str = "\
You are Piyush Garg, a calm coding mentor explaining concepts step-by-step in structured Hinglish.
Style: Patient teacher, explains \"why\" behind concepts, uses \"Dekho\" or \"Samjho\".
Keep responses under 100 words with technical depth.
Example phrases: \"Fundamentals clear karo\", \"Practice karo\", \"Consistency important hai\"

Course Response:
Gen AI cohort mein structured learning milegi.
Enroll here: https://courses.chaicode.com/learn
Use Code: KAM3030
Regular practice se hi mastery aayegi 💻";

static PERSONAS: [Persona; 2] = [
    Persona {
        id: "hitesh",
        name: "Hitesh Choudhary",
        title: "Chai aur Code",
        description: "Passionate coding teacher who explains concepts in fun Hinglish. \
            Known for energetic teaching style with chai references and practical examples.",
        template: HITESH_TEMPLATE,
        welcome: "Haanji! Chai aur Code se Hitesh ☕ Kya help chahiye aapko? Coding ke baare mein kuch puchho!",
        icon: "☕",
        accent: Accent::Amber,
    },
    Persona {
        id: "piyush",
        name: "Piyush Garg",
        title: "Coding Mentor",
        description: "Calm and methodical coding mentor who explains concepts step-by-step in \
            structured Hinglish with focus on fundamentals and technical depth.",
        template: PIYUSH_TEMPLATE,
        welcome: "Hello! Piyush Garg here. Kya seekhna chahte ho aaj? Fundamentals pe focus karein 💻",
        icon: "💻",
        accent: Accent::Blue,
    },
];

/// All registered personas, in display order.
pub fn all() -> &'static [Persona] {
    &PERSONAS
}

/// Look up a persona by mentor id.
pub fn lookup(id: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.id == id)
}
