//! `parley personas` and `parley models`.

use crate::core::persona::Persona;
use crate::core::settings::ModelChoice;

pub fn format_persona_list(default: Persona) -> String {
    let mut out = String::from("Available personas:\n");
    for persona in Persona::ALL {
        let marker = if persona == default { " (default)" } else { "" };
        out.push_str(&format!(
            "  {:<16} {}{marker}\n",
            persona.id(),
            persona.display_name()
        ));
    }
    out
}

pub fn format_model_list(default: ModelChoice) -> String {
    let mut out = String::from("Available models:\n");
    for model in ModelChoice::ALL {
        let marker = if model == default { " (default)" } else { "" };
        out.push_str(&format!("  {}{marker}\n", model.id()));
    }
    out
}

pub fn list_personas(default: Persona) {
    print!("{}", format_persona_list(default));
}

pub fn list_models(default: ModelChoice) {
    print!("{}", format_model_list(default));
}
