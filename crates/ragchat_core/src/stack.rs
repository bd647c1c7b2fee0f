use std::fmt;
use std::str::FromStr;

/// A deployed retrieval/generation pipeline the chat can talk to.
///
/// The set is closed: the backend routes requests by [`Stack::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stack {
    OpenAi,
    Google,
    HydeGpt4,
    HydeGeminiPro,
    HydeGeminiUltra,
    MultiQueryGpt4,
    MultiQueryGeminiPro,
    MultiQueryGeminiUltra,
    RerankerGpt4,
    RerankerGeminiPro,
    RerankerGeminiUltra,
    WindowGoogle,
    EverythingGpt4,
    EverythingGeminiPro,
    EverythingGeminiUltra,
}

impl Stack {
    /// Every stack, in selector order.
    pub const ALL: [Stack; 15] = [
        Stack::OpenAi,
        Stack::Google,
        Stack::HydeGpt4,
        Stack::HydeGeminiPro,
        Stack::HydeGeminiUltra,
        Stack::MultiQueryGpt4,
        Stack::MultiQueryGeminiPro,
        Stack::MultiQueryGeminiUltra,
        Stack::RerankerGpt4,
        Stack::RerankerGeminiPro,
        Stack::RerankerGeminiUltra,
        Stack::WindowGoogle,
        Stack::EverythingGpt4,
        Stack::EverythingGeminiPro,
        Stack::EverythingGeminiUltra,
    ];

    /// Identifier used in request paths and in the shareable location.
    pub fn as_str(self) -> &'static str {
        match self {
            Stack::OpenAi => "openai",
            Stack::Google => "google",
            Stack::HydeGpt4 => "hyde-gpt4",
            Stack::HydeGeminiPro => "hyde-gemini-pro",
            Stack::HydeGeminiUltra => "hyde-gemini-ultra",
            Stack::MultiQueryGpt4 => "multi-query-gpt4",
            Stack::MultiQueryGeminiPro => "multi-query-gemini-pro",
            Stack::MultiQueryGeminiUltra => "multi-query-gemini-ultra",
            Stack::RerankerGpt4 => "reranker-gpt4",
            Stack::RerankerGeminiPro => "reranker-gemini-pro",
            Stack::RerankerGeminiUltra => "reranker-gemini-ultra",
            Stack::WindowGoogle => "window-google",
            Stack::EverythingGpt4 => "everything-gpt4",
            Stack::EverythingGeminiPro => "everything-gemini-pro",
            Stack::EverythingGeminiUltra => "everything-gemini-ultra",
        }
    }

    /// Human readable name, used as the sender label of answers.
    pub fn display_name(self) -> &'static str {
        match self {
            Stack::OpenAi => "ChatGPT-4 Assistant",
            Stack::Google => "Google AQA",
            Stack::HydeGpt4 => "HyDE + ChatGPT-4",
            Stack::HydeGeminiPro => "HyDE + Gemini Pro",
            Stack::HydeGeminiUltra => "HyDE + Gemini Ultra",
            Stack::MultiQueryGpt4 => "Multi-query + ChatGPT-4",
            Stack::MultiQueryGeminiPro => "Multi-query + Gemini Pro",
            Stack::MultiQueryGeminiUltra => "Multi-query + Gemini Ultra",
            Stack::RerankerGpt4 => "Reranking + ChatGPT-4",
            Stack::RerankerGeminiPro => "Reranking + Gemini Pro",
            Stack::RerankerGeminiUltra => "Reranking + Gemini Ultra",
            Stack::WindowGoogle => "Windowed markdown + Google AQA",
            Stack::EverythingGpt4 => "Multi-query + Reranking + Windowed markdown + ChatGPT-4",
            Stack::EverythingGeminiPro => {
                "Multi-query + Reranking + Windowed markdown + Gemini Pro"
            }
            Stack::EverythingGeminiUltra => {
                "Multi-query + Reranking + Windowed markdown + Gemini Ultra"
            }
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStack(pub String);

impl fmt::Display for UnknownStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown stack `{}`", self.0)
    }
}

impl std::error::Error for UnknownStack {}

impl FromStr for Stack {
    type Err = UnknownStack;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Stack::ALL
            .into_iter()
            .find(|stack| stack.as_str() == needle)
            .ok_or_else(|| UnknownStack(needle.to_string()))
    }
}

/// Parses a lane binding where `none` (or an empty string) means unbound.
pub fn parse_lane_binding(raw: &str) -> Result<Option<Stack>, UnknownStack> {
    match raw.trim() {
        "" | "none" => Ok(None),
        other => other.parse().map(Some),
    }
}
