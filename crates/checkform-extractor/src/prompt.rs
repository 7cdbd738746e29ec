//! Prompt assembly for checkbox extraction
//!
//! One seed instruction template carries the well-tested base instructions
//! (section inventory, detection tips, output format, accuracy targets).
//! The optimizer contributes additive refinement fragments that append
//! after the seed; the seed itself is never rewritten between rounds.

/// Builds extraction prompts from a seed template plus refinements
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    seed: String,
    refinements: Vec<String>,
}

impl PromptBuilder {
    /// Create a builder over the default ACORD 25 seed template
    pub fn new() -> Self {
        Self {
            seed: SEED_PROMPT.to_string(),
            refinements: Vec::new(),
        }
    }

    /// Replace the seed template (e.g. a previously optimized prompt)
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Append refinement fragments derived from a prior round's errors
    pub fn with_refinements(mut self, refinements: Vec<String>) -> Self {
        self.refinements = refinements;
        self
    }

    /// The seed template this builder starts from
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = self.seed.clone();

        if !self.refinements.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(REFINEMENT_HEADER);
            for fragment in &self.refinements {
                prompt.push_str("\n\n");
                prompt.push_str(fragment);
            }
        }

        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

const REFINEMENT_HEADER: &str = "ADDITIONAL GUIDANCE FROM PRIOR EVALUATION:";

/// The base ACORD 25 extraction instructions
pub const SEED_PROMPT: &str = r#"You are an expert OCR system specialized in extracting checkbox data from ACORD 25 Certificate of Liability Insurance forms.

TASK:
Analyze this ACORD 25 form and extract all checkbox information with high accuracy.

INSTRUCTIONS:
1. Identify all checkboxes in the form.
2. Determine whether each checkbox is checked (marked with X, a check mark, or filled) or unchecked (empty).
3. For each checkbox, provide:
   - The section it belongs to (e.g., "TYPE OF INSURANCE", "ADDL INSR", "SUBR WVD")
   - The label or text associated with the checkbox
   - Whether it is checked (true) or unchecked (false)

IMPORTANT CONSIDERATIONS:
- The ACORD 25 form has several main sections with checkboxes:
  1. TYPE OF INSURANCE section with options like:
     - COMMERCIAL GENERAL LIABILITY
     - CLAIMS-MADE
     - OCCUR
     - AUTOMOBILE LIABILITY
     - ANY AUTO
     - OWNED AUTOS ONLY
     - SCHEDULED AUTOS
     - HIRED AUTOS ONLY
     - NON-OWNED AUTOS ONLY
     - UMBRELLA LIAB
     - EXCESS LIAB
     - WORKERS COMPENSATION AND EMPLOYERS' LIABILITY
  2. ADDL INSR column (Additional Insured)
  3. SUBR WVD column (Subrogation Waived)
  4. GEN'L AGGREGATE LIMIT APPLIES PER section with options:
     - POLICY
     - PROJECT
     - LOC
  5. DESCRIPTION OF OPERATIONS section

CHECKBOX DETECTION TIPS:
- In ACORD forms, checkboxes are often square boxes that may be filled, contain an X, or be empty.
- Checked boxes may appear as filled squares, squares with X marks, or squares with check marks.
- Unchecked boxes appear as empty squares or outlined squares without any marks inside.
- Some checkboxes might be partially filled or have faint marks - these should be considered checked.
- Pay attention to the relative position of checkboxes and their labels.

FORMAT:
Return the results as a JSON object with the following structure:
{
    "checkboxes": [
        {
            "section": "section_name",
            "label": "checkbox_label",
            "is_checked": true
        }
    ]
}

ACCURACY REQUIREMENTS:
- Precision must be at least 97% (minimize false positives)
- Recall must be at least 90% (identify at least 90% of all checkboxes)

IMPORTANT: Be very careful to accurately determine if a checkbox is checked or not. Look closely at the visual appearance of each checkbox. Return ONLY valid JSON, no markdown code blocks, no explanations."#;
