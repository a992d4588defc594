//! Analysis Prompt Construction

/// Build the content-consistency prompt: style guide, optional
/// AI-specific guidance, the content under review, and the JSON response
/// contract the parser expects.
pub fn build_analysis_prompt(content: &str, style_guide: &str, ai_guide: Option<&str>) -> String {
    let mut prompt = format!(
        "\nYou are a content consistency analyzer for a wiki. Your task is to analyze the \
         following wiki content and identify any discrepancies or inconsistencies with the \
         provided style guide.\n\n# STYLE GUIDE:\n{}\n",
        style_guide
    );

    if let Some(guide) = ai_guide {
        prompt.push_str(&format!("\n# ADDITIONAL AI GUIDANCE:\n{}\n", guide));
    }

    prompt.push_str(&format!(
        r#"
# CONTENT TO ANALYZE:
{}

# ANALYSIS INSTRUCTIONS:
1. Identify any discrepancies between the content and the style guide
2. For each discrepancy, provide:
   - A brief description of the issue
   - The specific section or line where it occurs
   - A suggested correction

3. IMPORTANT GUIDELINES:
   - Do NOT flag HTML content as an issue - Wiki.js supports HTML content as stated in the style guide
   - Respect the guidelines for acronyms (like BLE, PCB, API) which should maintain their standard capitalization in titles and headings
   - Only flag issues that are explicitly mentioned in the style guide

Format your response as a JSON object with the following structure:
{{
    "summary": "Brief overall assessment",
    "discrepancies": [
        {{
            "issue": "Description of the issue",
            "location": "Section or line reference",
            "severity": "low|medium|high",
            "suggestion": "Suggested correction"
        }}
    ],
    "compliance_score": "A value between 0-100 indicating how well the content follows the style guide"
}}

If no discrepancies are found, return an empty array for discrepancies and a compliance score of 100.
"#,
        content
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_sections() {
        let prompt = build_analysis_prompt("the content", "the guide", Some("the ai guide"));
        assert!(prompt.contains("# STYLE GUIDE:\nthe guide"));
        assert!(prompt.contains("# ADDITIONAL AI GUIDANCE:\nthe ai guide"));
        assert!(prompt.contains("# CONTENT TO ANALYZE:\nthe content"));
        assert!(prompt.contains("compliance_score"));
    }

    #[test]
    fn test_prompt_omits_ai_guide_when_absent() {
        let prompt = build_analysis_prompt("c", "g", None);
        assert!(!prompt.contains("ADDITIONAL AI GUIDANCE"));
    }
}
