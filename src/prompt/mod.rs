//! Review prompt for technical specifications.

/// Instruction template; `{text}` marks where the submitted document goes.
pub const TEMPLATE: &str = include_str!("template.md");

const PLACEHOLDER: &str = "{text}";

/// Embed `text` into the review template. The text is passed through as is.
pub fn build_prompt(text: &str) -> String {
    TEMPLATE.replacen(PLACEHOLDER, text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_one_placeholder() {
        assert_eq!(TEMPLATE.matches(PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_text_lands_after_instructions() {
        let prompt = build_prompt("Раздел 1. Введение");
        assert!(prompt.starts_with("### Промпт для нормоконтроля"));
        assert!(prompt.contains("Текст ТЗ:\nРаздел 1. Введение"));
        assert!(!prompt.contains(PLACEHOLDER));
    }

    #[test]
    fn test_braces_in_input_are_untouched() {
        let prompt = build_prompt("use {text} and {0}");
        assert!(prompt.ends_with("use {text} and {0}\n"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(build_prompt("x"), build_prompt("x"));
        assert_eq!(build_prompt("").len(), TEMPLATE.len() - PLACEHOLDER.len());
    }
}
