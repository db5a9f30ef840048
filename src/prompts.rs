//! Prompt templates sent to the language model.
//!
//! Every function here is a pure string formatter. The extraction prompts ask
//! the model to finish with [`COMPLETION_SENTINEL`], which [`strip_sentinel`]
//! removes again before anything is parsed.

/// Literal end-of-output marker the model is asked to emit.
pub const COMPLETION_SENTINEL: &str = "---END---";

/// Removes every occurrence of the completion sentinel and surrounding whitespace.
pub fn strip_sentinel(text: &str) -> String {
    text.replace(COMPLETION_SENTINEL, "").trim().to_string()
}

/// Basic fields: title, description, ingredients and instructions as JSON.
pub fn recipe_fields_prompt(page_text: &str) -> String {
    format!(
        "Extract basic recipe information from the provided web page text. \
Return a JSON object with the following structure:
{{
  \"title\": \"Recipe title\",
  \"description\": \"Brief description or summary\",
  \"ingredients\": [\"ingredient 1\", \"ingredient 2\", ...],
  \"instructions\": [\"step 1\", \"step 2\", ...]
}}

Guidelines:
- **Title**: Use the most prominent or repeated recipe title.
- **Description**: Extract the first sentence or paragraph summarizing the recipe, verbatim if possible.
- **Ingredients**: Capture each ingredient exactly as listed, including quantities, units, and optional phrases (e.g., '1 cup sugar, or more to taste').
- **Instructions**: List instructions as steps, preserving original wording and order.
- **General**:
  - If data is repeated, use the first clear instance.
  - End with '{sentinel}' to indicate completion.

Page text:
{page_text}

JSON:",
        sentinel = COMPLETION_SENTINEL,
        page_text = page_text
    )
}

/// Narrow schema: cook time in minutes and difficulty only.
pub fn cook_time_difficulty_prompt(page_text: &str) -> String {
    format!(
        "You are a recipe data extractor. Extract cook time and difficulty from the web page text below.

IMPORTANT: Return ONLY a JSON object, nothing else. No explanations, no code examples.

JSON format:
{{
  \"cookTime\": \"number-of-minutes\",
  \"difficulty\": \"Easy|Medium|Advanced\"
}}

Rules:
- cookTime: Find 'Total Time' and convert to total minutes (e.g., '3 hrs 5 mins' = '185')
- If only 'Prep Time' and 'Cook Time' are given, add them together
- difficulty: Find explicit terms or infer from recipe complexity
- Use null for a value that cannot be determined
- Return only the JSON object, then '{sentinel}'

Text to analyze:
{page_text}

JSON:",
        sentinel = COMPLETION_SENTINEL,
        page_text = page_text
    )
}

/// Fallback extraction with a fixed markdown heading layout.
pub fn markdown_prompt(page_text: &str) -> String {
    format!(
        "Extract recipe information from this web page text. \
Return the information in this exact markdown format:

# Recipe Title
## Description
Brief description here

## Ingredients
- ingredient 1
- ingredient 2
- ingredient 3

## Instructions
1. step 1
2. step 2
3. step 3

## Image
image_url_here

{sentinel}

Page text:
{page_text}

Markdown:",
        sentinel = COMPLETION_SENTINEL,
        page_text = page_text
    )
}

/// Asks the model to fix and complete malformed JSON.
pub fn json_repair_prompt(malformed: &str) -> String {
    format!(
        "Fix and complete this JSON to make it valid. Return only the corrected JSON:\n\n{}\n\nFixed JSON:",
        malformed
    )
}

/// Cook time and difficulty estimation for an already extracted recipe.
pub fn analysis_prompt(
    title: &str,
    description: &str,
    ingredients: &str,
    instructions: &str,
) -> String {
    format!(
        "You are an expert cooking instructor and recipe analyst. Analyze the following recipe and provide consistent, accurate assessments.

Recipe Title: {title}
Description: {description}

Ingredients:
{ingredients}

Instructions:
{instructions}

Please analyze this recipe and provide your assessment in the following JSON format:

{{
  \"estimatedTime\": \"number-of-minutes\",
  \"difficulty\": \"Easy|Medium|Advanced\",
  \"timeReasoning\": \"detailed explanation of time estimation\",
  \"difficultyReasoning\": \"detailed explanation of difficulty assessment\"
}}

For estimatedTime, provide a single approximate time in minutes:
- Return only the number of minutes as a string (e.g., \"25\", \"45\", \"120\")
- Consider total time including prep, cooking, and any waiting time
- Consider oven preheating, parallel tasks and resting time
- Do not include \"mins\" or \"minutes\" - just the number

For difficulty, assess based on required cooking skills:
- \"Easy\": Basic skills (boiling, simple chopping, following basic instructions)
- \"Medium\": Intermediate skills (proper knife work, timing, temperature control)
- \"Advanced\": Expert skills (complex techniques, precision, multi-tasking)

Provide your analysis in valid JSON format.

IMPORTANT: End your response with '{sentinel}' to indicate completion:",
        title = title,
        description = description,
        ingredients = ingredients,
        instructions = instructions,
        sentinel = COMPLETION_SENTINEL
    )
}

/// Short appetizing description for a recipe that has none.
pub fn description_prompt(title: &str, ingredients: &str, instructions: &str) -> String {
    format!(
        "You are an expert food writer. Write a brief, appetizing description for this recipe.

Recipe Title: {title}

Ingredients:
{ingredients}

Instructions:
{instructions}

Write a concise, engaging description (2-3 sentences) that captures the essence of this dish. Focus on:
- What makes this recipe special
- Key flavors or techniques
- What type of meal it is (breakfast, lunch, dinner, dessert, etc.)

Provide only the description text, no additional formatting.

IMPORTANT: End your response with '{sentinel}' to indicate completion:",
        title = title,
        ingredients = ingredients,
        instructions = instructions,
        sentinel = COMPLETION_SENTINEL
    )
}

pub fn chat_prompt(question: &str) -> String {
    format!(
        "You are a helpful cooking assistant. Answer questions about recipes, \
cooking techniques, ingredients, and meal planning. \
Be friendly, informative, and concise.\n\nQuestion: {}\n\nAnswer:",
        question
    )
}
