//! Prompt templates for page creation, SEO metadata and edits.

const ATTACHMENT_RULES: &str = "\
ATTACHED FILES:
- When the user provides \"FILE PATH:\" or \"IMAGE PATH:\", use that exact URL in the HTML
- Images: <img src=\"provided_url\" />
- Videos: <video src=\"provided_url\" controls></video>
- Never change the provided URLs; they are already hosted";

const OUTPUT_RULES: &str = "\
RESPONSE FORMAT:
- Return ONLY valid HTML
- Do NOT include <html>, <head> or <body>
- Do NOT add comments, explanations or trailing text
- End with a valid closing tag (</div>, </section>, ...)";

/// System prompt for creating a new page
pub fn create_system() -> String {
    format!(
        "You are an expert at building modern, responsive and visually appealing web pages.

DESIGN GUIDELINES:
- Semantic HTML5 with a clear structure
- Tailwind CSS classes, gradients, shadows and subtle animations
- Responsive layout for mobile and desktop
- Readable typographic hierarchy and harmonious colors
- Buttons and links with hover effects
- Placeholder images where needed

STRUCTURE:
Follow the user's description. Without a specific structure use a header with the main title,
a main content section and a call to action.

{ATTACHMENT_RULES}

{OUTPUT_RULES}"
    )
}

/// User prompt for creating a new page
pub fn create_user(title: &str, prompt: &str) -> String {
    format!(
        "CREATE A COMPLETE, PROFESSIONAL WEB PAGE:

Title: {title}
Description: {prompt}

- Make it modern and visually appealing
- Include relevant call-to-action buttons
- Make it responsive for mobile
- Use well defined sections

Return ONLY the complete HTML code."
    )
}

/// System prompt for the SEO metadata call
pub const META_SYSTEM: &str = "You are an SEO expert. Generate optimized meta tags for the page \
described by the user. Return only valid JSON with metaTitle, metaDescription, ogTitle and ogDescription.";

/// User prompt for the SEO metadata call
pub fn meta_user(title: &str, prompt: &str) -> String {
    format!("Title: {title}\nPrompt: {prompt}\nCreate SEO-friendly meta tags for this page. Answer ONLY with valid JSON.")
}

/// Single-message prompt asking for a JSON change list
pub fn edit_analysis(current_html: &str, instructions: &str) -> String {
    format!(
        "You are an expert at precise HTML analysis.

The user wants a specific change to an existing page. Identify EXACTLY what to change and where,
being as conservative as possible.

CURRENT HTML:
```html
{current_html}
```

EDIT INSTRUCTION:
\"{instructions}\"

{ATTACHMENT_RULES}

Answer ONLY with this JSON:
{{
  \"changes\": [
    {{
      \"target\": \"exact text or element to change\",
      \"replacement\": \"exact new content\",
      \"context\": \"larger surrounding fragment, for precision\",
      \"type\": \"text|color|size|attribute|content\"
    }}
  ],
  \"summary\": \"short summary of the minimal changes\"
}}

RULES:
1. Only change what the instruction asks for
2. Use text that exists VERBATIM in the HTML
3. Never suggest unrequested changes

EXAMPLE:
Instruction: \"make the button blue\"
HTML: '<button class=\"bg-red-500 text-white\">Click</button>'
Answer: {{\"changes\":[{{\"target\":\"bg-red-500\",\"replacement\":\"bg-blue-500\",\"context\":\"<button class=\\\"bg-red-500 text-white\\\">\",\"type\":\"color\"}}],\"summary\":\"button color\"}}"
    )
}

/// System prompt for a full-rewrite edit
pub fn rewrite_system() -> String {
    format!(
        "You are an expert at editing existing HTML web pages.

- You receive the current HTML and edit instructions
- Make ONLY the requested changes
- PRESERVE all other content, CSS classes, IDs and structure
- Do NOT rebuild the page from scratch

{ATTACHMENT_RULES}

{OUTPUT_RULES}"
    )
}

/// User prompt for a full-rewrite edit
pub fn rewrite_user(current_html: &str, instructions: &str) -> String {
    format!(
        "CURRENT HTML:\n{current_html}\n\nREQUESTED CHANGES:\n{instructions}\n\n\
Make ONLY the requested changes and keep the rest of the HTML and CSS intact."
    )
}
