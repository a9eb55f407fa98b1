//! The fixed set of personas a session can run under.
//!
//! A persona is nothing more than an instruction text that is sent as the
//! leading system message of every request. The set is closed: adding a
//! persona means adding a variant here.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Persona {
    #[default]
    FriendlyMentor,
    NinetiesPal,
    CalmLibrarian,
}

impl Persona {
    pub const ALL: [Persona; 3] = [
        Persona::FriendlyMentor,
        Persona::NinetiesPal,
        Persona::CalmLibrarian,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Persona::FriendlyMentor => "friendly-mentor",
            Persona::NinetiesPal => "nineties-pal",
            Persona::CalmLibrarian => "calm-librarian",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Persona::FriendlyMentor => "Friendly mentor",
            Persona::NinetiesPal => "90s pal",
            Persona::CalmLibrarian => "Calm librarian",
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            Persona::FriendlyMentor => {
                "You are a friendly, warm development mentor.\n\
                 Keep answers short and practical, explain jargon in plain words,\n\
                 and when it helps, lead with a one-line code example."
            }
            Persona::NinetiesPal => {
                "You are a witty friend with a 1990s vibe.\n\
                 Be bright and playful but keep the information accurate,\n\
                 and now and then end a sentence with a light interjection (never overdo it)."
            }
            Persona::CalmLibrarian => {
                "You are a calm, trustworthy librarian.\n\
                 Briefly mention the source or basis for what you say,\n\
                 and always answer as: summary, then key points, then a suggested next step."
            }
        }
    }

    /// The persona after this one in selector order, wrapping around.
    pub fn next(self) -> Persona {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn from_id(id: &str) -> Option<Persona> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|persona| persona.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::from_id(s).ok_or_else(|| {
            let available: Vec<&str> = Persona::ALL.iter().map(|p| p.id()).collect();
            format!(
                "Persona '{}' not found. Available personas: {}",
                s.trim(),
                available.join(", ")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_persona_is_first_in_selector_order() {
        assert_eq!(Persona::default(), Persona::ALL[0]);
    }

    #[test]
    fn next_cycles_through_every_persona() {
        let mut persona = Persona::default();
        let mut seen = Vec::new();
        for _ in 0..Persona::ALL.len() {
            seen.push(persona);
            persona = persona.next();
        }
        assert_eq!(seen, Persona::ALL.to_vec());
        assert_eq!(persona, Persona::default());
    }

    #[test]
    fn ids_parse_case_insensitively() {
        assert_eq!(
            "Calm-Librarian".parse::<Persona>(),
            Ok(Persona::CalmLibrarian)
        );
        assert_eq!(Persona::from_id(" nineties-pal "), Some(Persona::NinetiesPal));
    }

    #[test]
    fn unknown_ids_list_available_personas() {
        let err = "pirate".parse::<Persona>().unwrap_err();
        assert!(err.contains("pirate"));
        for persona in Persona::ALL {
            assert!(err.contains(persona.id()), "missing {} in {err}", persona.id());
        }
    }

    #[test]
    fn every_persona_has_distinct_instructions() {
        let mut texts: Vec<&str> = Persona::ALL.iter().map(|p| p.instructions()).collect();
        texts.sort_unstable();
        texts.dedup();
        assert_eq!(texts.len(), Persona::ALL.len());
        assert!(texts.iter().all(|text| !text.trim().is_empty()));
    }
}
