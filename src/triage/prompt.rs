use crate::model::Category;

/// Build the inspection prompt sent alongside the photo.
///
/// The classifier is asked for a single JSON object; `parse` still copes
/// with prose around it.
pub fn build_prompt(category: Category) -> String {
    let category = category.label();
    format!(
        r#"Act as a Smart City Infrastructure Inspector.
I am showing you a photo reported as: "{category}".

TASK:
1. Does this photo show real-world physical evidence of "{category}"? (True/False)
2. REJECT (set matchesCategory to false) if the image is:
   - A screenshot of code or programming text.
   - A selfie or a person's face.
   - A meme or unrelated indoor object.
3. Assign Severity: "High" (dangerous/blockage), "Medium" (standard repair), or "Low" (minor issue).
4. Provide a 1-sentence technical summary of the issue visible.

RESPONSE FORMAT (JSON ONLY, no extra text):
{{
  "matchesCategory": true,
  "priority": "Medium",
  "summary": "Visible cracks and minor potholes on a residential road asphalt."
}}"#
    )
}
