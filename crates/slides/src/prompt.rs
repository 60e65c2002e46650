//! Chat prompts for decks and narration scripts

const SLIDES_SYSTEM_PROMPT: &str = "You are an expert at creating MDX slide decks. You understand how to structure content
for presentations using MDX components. Each slide should be wrapped in a <Slide> component.

Requirements:
- Use appropriate layouts for different content types (default, center, split)
- Include speaker notes where relevant
- Include relevant code examples
- Keep each slide focused and concise
- Use proper markdown formatting
- Return content in valid MDX format
- Each slide must be wrapped in a <Slide> component with a layout prop
- Code examples must use the <CodeBlock> component with a language prop";

const SCRIPT_SYSTEM_PROMPT: &str =
    "You are an expert at creating natural-sounding voiceover scripts with proper timing and pacing.";

pub const DEFAULT_STYLE: &str = "professional";
pub const DEFAULT_SCRIPT_VOICE: &str = "natural";

/// A system and user message pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

impl Prompt {
    /// Prompt for a deck about `topic`, continuing `current_content` when given
    pub fn slides(topic: &str, style: Option<&str>, current_content: Option<&str>) -> Self {
        let style = style.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_STYLE);
        let mut user = format!("Create a slide deck about {} in a {style} style.", topic.trim());

        if let Some(current) = current_content.filter(|c| !c.trim().is_empty()) {
            user.push_str(" Current content:\n");
            user.push_str(current);
        }

        Self {
            system: SLIDES_SYSTEM_PROMPT,
            user,
        }
    }

    /// Prompt for a narration script over slide `content`
    pub fn voiceover_script(content: &str, voice: Option<&str>) -> Self {
        let voice = voice.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(DEFAULT_SCRIPT_VOICE);

        Self {
            system: SCRIPT_SYSTEM_PROMPT,
            user: format!("Create a voiceover script for the following slide content in a {voice} style:\n{content}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_defaults_to_professional() {
        let prompt = Prompt::slides("Rust", None, None);

        assert_eq!(prompt.user, "Create a slide deck about Rust in a professional style.");
        assert!(prompt.system.contains("<Slide>"));
    }

    #[test]
    fn blank_style_uses_default() {
        assert_eq!(Prompt::slides("Rust", Some("  "), None), Prompt::slides("Rust", None, None));
    }

    #[test]
    fn current_content_is_appended() {
        let prompt = Prompt::slides("Async", Some("playful"), Some("<Slide layout=\"center\"># Intro</Slide>"));

        assert_eq!(
            prompt.user,
            "Create a slide deck about Async in a playful style. Current content:\n<Slide layout=\"center\"># Intro</Slide>"
        );
    }

    #[test]
    fn script_prompt() {
        let prompt = Prompt::voiceover_script("# Ownership", None);

        assert_eq!(
            prompt.user,
            "Create a voiceover script for the following slide content in a natural style:\n# Ownership"
        );
    }
}
