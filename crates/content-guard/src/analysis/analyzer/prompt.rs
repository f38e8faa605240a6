use super::super::domain::{ChildProfile, ContentType};

pub(crate) const SYSTEM_PROMPT: &str = "You are a professional content safety analyst \
specializing in children's media. You provide accurate, objective assessments in JSON format.";

/// Natural-language description of the child; sensitivities appear only when set.
pub(crate) fn profile_context(profile: Option<&ChildProfile>) -> String {
    let Some(profile) = profile else {
        return "No specific child profile provided.".to_string();
    };

    let mut context = format!("The child is {} years old.", profile.age);
    if profile.sensitivities.fear_sensitive {
        context.push_str(" They are sensitive to fear/horror.");
    }
    if profile.sensitivities.violence_sensitive {
        context.push_str(" They are sensitive to violence.");
    }
    context
}

pub(crate) fn user_prompt(
    title: &str,
    content_type: ContentType,
    profile: Option<&ChildProfile>,
) -> String {
    let kind = content_type.label();
    let context = profile_context(profile);

    format!(
        r#"Analyze the following {kind} for a child-safety assessment.

Title: "{title}"
Content Type: {kind}
{context}

Respond with a single JSON object of this shape:

{{
  "title": "exact title",
  "type": "{kind}",
  "parameters": {{
    "violence": 0-3 (0=None, 1=Mild, 2=Moderate, 3=Graphic),
    "language": 0-3 (0=Clean, 1=Mild, 2=Frequent, 3=Explicit),
    "sexualContent": 0-2 (0=None, 1=Implied, 2=Explicit),
    "romanticContent": 0-2 (0=None, 1=Light, 2=Central Theme),
    "substanceUse": 0-2 (0=None, 1=Casual, 2=Frequent),
    "fearHorror": 0-3 (0=None, 1=Mild Tension, 2=Moderate, 3=Intense),
    "themes": {{
      "death": true/false,
      "bullying": true/false,
      "mentalHealth": true/false,
      "moralAmbiguity": true/false
    }},
    "valuesSensitive": {{
      "lgbtq": true/false,
      "genderIdentity": true/false,
      "religious": true/false,
      "political": true/false
    }}
  }},
  "notes": "Brief summary of key content concerns and positive aspects",
  "recommendedAge": 3-16,
  "reasoning": "Brief explanation of why this age was recommended"
}}

Guidelines:
- Report only content that is actually present.
- Take the child's age and sensitivities into account when provided.
- Mark themes true only when they are significant.
- The recommended age should reflect the highest-risk parameter.

Return ONLY valid JSON, no additional text."#
    )
}
