// Prompt constants shared by the provider clients.

/// System prompt for the Claude chat client. Bundled into the binary; an
/// empty prompt makes the client report itself unavailable.
pub const ANALYSIS_SYSTEM: &str = "You are an experienced HR analyst and career coach. \
    You receive the plain text of a candidate's resume. \
    Produce an enhanced, professionally written summary of the resume: \
    highlight the candidate's strongest skills and achievements, \
    suggest improvements to weak or vague sections, \
    and keep the result factual — never invent experience, employers, or dates. \
    Respond in plain prose, no markdown headings.";

/// User-message template for the Claude client. Replace `{resume}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = "Here is the resume to analyze:\n\n{resume}";

/// Inline instruction prepended to the resume text for the Gemini endpoint,
/// which has no separate system-message channel.
pub const GEMINI_PROMPT_PREFIX: &str =
    "Summarize and enhance the following resume, keeping it factual:\n\n";

/// Degraded-service message returned by the Gemini client once its retry
/// budget is exhausted.
pub const GEMINI_FALLBACK_TEXT: &str = "The AI analysis service is temporarily unavailable. \
    Your resume was received correctly — please try the analysis again in a few minutes.";
