use rizzroast_model::GenerationMode;

/// Instruction sent to the model. Input is embedded trimmed.
pub fn build_prompt(mode: GenerationMode, input: &str) -> String {
    let input = input.trim();
    match mode {
        GenerationMode::Pickup => format!(
            "Create a pickup line based on the following input: \"{input}\". \
             Keep it clever, flirty, and respectful. Provide only ONE pickup line, \
             and do NOT introduce it like \"Here's one...\" Just give the pickup line directly."
        ),
        GenerationMode::Roast(level) => format!(
            "Roast this person based on the following input: \"{input}\". \
             Roast level: {level}. Keep it funny, creative, and light-hearted. \
             Avoid being too harsh. Provide only ONE roast, and do NOT introduce it \
             like \"Here's one...\" Just give the roast directly."
        ),
    }
}
