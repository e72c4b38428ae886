//! Default instructions sent to a generative extractor.

use crate::models::record::ExtractionMode;

pub const CARD_INSTRUCTION: &str = "\
You are given the text lines read from a business card, one per line. \
Return a JSON object with exactly these keys: name, designation, company, email, \
personal_mobile_number, company_number, website, address. \
Use the string \"Not Found\" for any value that is not on the card. \
Return only the JSON object.";

pub const IDENTITY_INSTRUCTION: &str = "\
You are given the text lines read from an Indian identity document, one per line. \
Return a JSON object with these keys: \"Aadhar\" (list of 12-digit numbers), \
\"PAN\" (list of 10-character codes of 5 letters, 4 digits and 1 letter) and \
\"General Numbers\" (every identity number you found). \
Use empty lists when nothing is found. Return only the JSON object.";

/// Instruction for a mode when the user gave none.
pub fn default_instruction(mode: ExtractionMode) -> &'static str {
    match mode {
        ExtractionMode::Card => CARD_INSTRUCTION,
        ExtractionMode::Identity => IDENTITY_INSTRUCTION,
    }
}

/// Full prompt text: the instruction followed by the OCR lines.
pub fn build_prompt(instruction: &str, lines: &[String]) -> String {
    let mut prompt = String::with_capacity(instruction.len() + 32 + lines.iter().map(|l| l.len() + 1).sum::<usize>());
    prompt.push_str(instruction.trim());
    prompt.push_str("\n\nText lines:\n");
    for line in lines {
        prompt.push_str(line);
        prompt.push('\n');
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt("  Extract. ", &["Jane Doe".to_string(), "Acme".to_string()]);
        assert_eq!(prompt, "Extract.\n\nText lines:\nJane Doe\nAcme\n");
    }

    #[test]
    fn test_default_instructions_name_required_keys() {
        assert!(default_instruction(ExtractionMode::Card).contains("personal_mobile_number"));
        assert!(default_instruction(ExtractionMode::Identity).contains("\"General Numbers\""));
    }
}
