// The ordered cleaning pipeline.
//
// Steps are composed left to right in caller-defined order. The standard
// order decodes and strips markup-ish noise before case folding, expands
// contractions while apostrophes still exist, and only then removes
// punctuation.

use super::cleaning;

/// One named cleaning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Lowercase,
    ExpandContractions,
    UnescapeHtml,
    StripEmoji,
    StripUrls,
    StripPunctuation,
    StripDigits,
    CollapseWhitespace,
}

impl Step {
    fn apply(self, text: &str) -> String {
        match self {
            Step::Lowercase => cleaning::lowercase(text),
            Step::ExpandContractions => cleaning::expand_contractions(text),
            Step::UnescapeHtml => cleaning::unescape_html(text),
            Step::StripEmoji => cleaning::strip_emoji(text),
            Step::StripUrls => cleaning::strip_urls(text),
            Step::StripPunctuation => cleaning::strip_punctuation(text),
            Step::StripDigits => cleaning::strip_digits(text),
            Step::CollapseWhitespace => cleaning::collapse_whitespace(text),
        }
    }
}

/// An ordered chain of cleaning steps.
pub struct CleaningPipeline {
    steps: Vec<Step>,
}

impl CleaningPipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// The full cleaning chain used for comment text.
    pub fn standard() -> Self {
        Self::new(vec![
            Step::UnescapeHtml,
            Step::StripUrls,
            Step::Lowercase,
            Step::ExpandContractions,
            Step::StripEmoji,
            Step::StripPunctuation,
            Step::StripDigits,
            Step::CollapseWhitespace,
        ])
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order.
    pub fn apply(&self, text: &str) -> String {
        self.steps
            .iter()
            .fold(text.to_string(), |acc, step| step.apply(&acc))
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_cleans_a_messy_comment() {
        let pipeline = CleaningPipeline::standard();
        let raw = "Kazuya&#39;s COMEBACK \u{1F525}\u{1F525} isn't fair!!! https://youtu.be/x 10/10";
        assert_eq!(
            pipeline.apply(raw),
            "kazuyas comeback is not fair"
        );
    }

    #[test]
    fn order_matters() {
        // Punctuation removal before contraction expansion destroys the
        // apostrophe the expansion needs.
        let wrong_order = CleaningPipeline::new(vec![
            Step::Lowercase,
            Step::StripPunctuation,
            Step::ExpandContractions,
            Step::CollapseWhitespace,
        ]);
        assert_eq!(wrong_order.apply("isn't"), "isnt");

        let right_order = CleaningPipeline::new(vec![
            Step::Lowercase,
            Step::ExpandContractions,
            Step::StripPunctuation,
            Step::CollapseWhitespace,
        ]);
        assert_eq!(right_order.apply("isn't"), "is not");
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let pipeline = CleaningPipeline::new(vec![]);
        assert_eq!(pipeline.apply("As-Is &amp; Untouched"), "As-Is &amp; Untouched");
    }
}
