use crate::core::config::data::Config;
use crate::core::settings::GenerationSettings;

impl Config {
    pub fn print_all(&self) {
        let defaults = GenerationSettings::default();
        println!("Current configuration:");
        match &self.default_model {
            Some(model) => println!("  default-model: {model}"),
            None => println!("  default-model: (unset, {})", defaults.model()),
        }
        match &self.default_persona {
            Some(persona) => println!("  default-persona: {persona}"),
            None => println!(
                "  default-persona: (unset, {})",
                crate::core::persona::Persona::default().id()
            ),
        }
        match self.temperature {
            Some(temperature) => println!("  temperature: {temperature:.1}"),
            None => println!("  temperature: (unset, {:.1})", defaults.temperature()),
        }
        match self.max_tokens {
            Some(max_tokens) => println!("  max-tokens: {max_tokens}"),
            None => println!("  max-tokens: (unset, {})", defaults.max_tokens()),
        }
    }
}
