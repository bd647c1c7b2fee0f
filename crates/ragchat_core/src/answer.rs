use std::collections::HashSet;

/// One synthesized answer to a conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub answer: String,
    pub citations: Option<Vec<String>>,
    /// Answerability probability in `[0, 1]`.
    pub score: Option<f64>,
}

impl Answer {
    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            citations: None,
            score: None,
        }
    }

    /// Citations worth showing: deduplicated, first occurrence wins.
    /// `None` when the backend sent none or an empty list.
    pub fn attribution(&self) -> Option<Vec<String>> {
        let citations = self.citations.as_ref()?;
        if citations.is_empty() {
            return None;
        }
        Some(dedupe_citations(citations))
    }
}

/// Removes repeated citations while keeping first-seen order.
pub fn dedupe_citations<S: AsRef<str>>(citations: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    citations
        .iter()
        .map(AsRef::as_ref)
        .filter(|citation| seen.insert(*citation))
        .map(ToOwned::to_owned)
        .collect()
}
