//! Syntactic acceptance check for generated MDX
//!
//! Only looks for the presence of required markup. Nothing is parsed, so a
//! deck that passes may still fail to compile.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// First requirement a document failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MdxViolation {
    #[error("no <Slide> component")]
    MissingSlide,
    #[error("no <Slide> component with a layout attribute")]
    MissingLayout,
    #[error("no fenced code block or <CodeBlock> component")]
    MissingCode,
}

fn slide_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<Slide\b").expect("must be valid regex"))
}

fn slide_with_layout() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `layout=` inside the opening tag itself, not elsewhere in the slide
    RE.get_or_init(|| Regex::new(r"<Slide\b[^>]*\blayout\s*=").expect("must be valid regex"))
}

/// Check `content` against the slide deck requirements
pub fn check_mdx(content: &str) -> Result<(), MdxViolation> {
    if !slide_tag().is_match(content) {
        return Err(MdxViolation::MissingSlide);
    }

    if !slide_with_layout().is_match(content) {
        return Err(MdxViolation::MissingLayout);
    }

    if !content.contains("```") && !content.contains("<CodeBlock") {
        return Err(MdxViolation::MissingCode);
    }

    Ok(())
}

pub fn validate_mdx(content: &str) -> bool {
    check_mdx(content).is_ok()
}
