use crate::core::request::ScriptRequest;

pub const SYSTEM_PROMPT: &str =
    "You are a scriptwriter for short-form video and audio. Reply with the script only.";

pub fn build_prompt(request: &ScriptRequest) -> String {
    let characters = if request.characters.is_empty() {
        "none".to_string()
    } else {
        request.characters.join(", ")
    };

    format!(
        "Generate a short script for a {platform}.\n\
         Title: {title}\n\
         Genre: {genre}\n\
         Tone: {tone}\n\
         Length: approx {length} seconds\n\
         Hook: {hook}\n\
         Characters: {characters}\n\
         Extra notes: {notes}\n\
         Include CTA: {cta}\n\
         \n\
         Write 5-10 lines that are natural, varied, punchy, and suitable for a short video script.",
        platform = request.platform,
        title = request.title.trim(),
        genre = request.genre,
        tone = request.tone,
        length = request.length_seconds,
        hook = request.hook_strength,
        characters = characters,
        notes = request.notes.trim(),
        cta = if request.include_cta { "yes" } else { "no" },
    )
}
