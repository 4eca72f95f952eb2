//! File-name sanitization for uploaded resumes.
//!
//! Uploaded names are untrusted: they become storage keys and path segments.
//! Keep letters, digits, dot, underscore, hyphen; collapse whitespace and dot
//! runs; cap the length while preserving the extension.

const MAX_LEN: usize = 255;
const FALLBACK_NAME: &str = "unnamed_file";

pub fn sanitize(file_name: &str) -> String {
    if file_name.trim().is_empty() {
        return FALLBACK_NAME.to_string();
    }

    // Drop everything but [a-zA-Z0-9._- ] in one pass.
    let kept: String = file_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ') || c.is_whitespace())
        .collect();

    // Whitespace runs become a single underscore.
    let mut collapsed = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push('_');
                in_space = true;
            }
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }

    // Dot runs become a single dot.
    let mut result = String::with_capacity(collapsed.len());
    let mut in_dots = false;
    for c in collapsed.chars() {
        if c == '.' {
            if !in_dots {
                result.push('.');
                in_dots = true;
            }
        } else {
            result.push(c);
            in_dots = false;
        }
    }

    // Leading/trailing dots and underscores left over from whitespace.
    let result = result.trim_matches(|c| c == '.' || c == '_').to_string();

    if result.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    if result.len() > MAX_LEN {
        return truncate_preserving_extension(&result);
    }

    result
}

fn truncate_preserving_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.len() + 1 < MAX_LEN => {
            let max_stem = MAX_LEN - ext.len() - 1;
            format!("{}.{ext}", &stem[..stem.len().min(max_stem)])
        }
        _ => name[..MAX_LEN].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(sanitize("resume.pdf"), "resume.pdf");
        assert_eq!(sanitize("John_Doe-2024.docx"), "John_Doe-2024.docx");
    }

    #[test]
    fn invalid_characters_are_stripped() {
        assert_eq!(sanitize("res/ume?.pdf"), "resume.pdf");
        assert_eq!(sanitize("..\\..\\etc\\passwd"), "etcpasswd");
    }

    #[test]
    fn whitespace_runs_collapse_to_underscore() {
        assert_eq!(sanitize("my   resume.pdf"), "my_resume.pdf");
        assert_eq!(sanitize("a\tb.txt"), "a_b.txt");
    }

    #[test]
    fn dot_runs_collapse() {
        assert_eq!(sanitize("resume...pdf"), "resume.pdf");
    }

    #[test]
    fn leading_and_trailing_junk_is_trimmed() {
        assert_eq!(sanitize(".hidden.pdf"), "hidden.pdf");
        assert_eq!(sanitize("  resume.pdf  "), "resume.pdf");
    }

    #[test]
    fn empty_and_unsalvageable_names_get_a_fallback() {
        assert_eq!(sanitize(""), "unnamed_file");
        assert_eq!(sanitize("   "), "unnamed_file");
        assert_eq!(sanitize("???"), "unnamed_file");
    }

    #[test]
    fn long_names_are_capped_preserving_the_extension() {
        let long = format!("{}.pdf", "a".repeat(300));
        let out = sanitize(&long);
        assert_eq!(out.len(), 255);
        assert!(out.ends_with(".pdf"));
    }
}
