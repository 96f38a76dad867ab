use crate::core::request::{HookStrength, Platform, ScriptRequest, Tone};

pub const MAX_LINE_WIDTH: usize = 120;
pub const MIN_BODY_LINES: usize = 3;

const DEFAULT_HOOK: &str = "Here’s something to think about:";
const DEFAULT_ADVERB: &str = "sincerely";

pub fn hook_line(hook: Option<HookStrength>) -> &'static str {
    match hook {
        Some(HookStrength::Mild) => "What if I told you...?",
        Some(HookStrength::Standard) => "Listen — this changed my whole year.",
        Some(HookStrength::AllIn) => "Pay attention — this could change your day.",
        None => DEFAULT_HOOK,
    }
}

pub fn tone_adverb(tone: Option<Tone>) -> &'static str {
    match tone {
        Some(Tone::Warm) => "warmly",
        Some(Tone::Funny) => "jokingly",
        Some(Tone::Sarcastic) => "dryly",
        Some(Tone::Serious) => "firmly",
        Some(Tone::Emotional) => "softly",
        Some(Tone::Businesslike) => "strategically",
        Some(Tone::Playful) => "playfully",
        None => DEFAULT_ADVERB,
    }
}

pub fn body_line_count(length_seconds: u32) -> usize {
    MIN_BODY_LINES.max((length_seconds / 8) as usize)
}

pub fn cta_line(platform: Option<Platform>) -> &'static str {
    match platform {
        Some(Platform::PodcastIntro) => "END: Follow our podcast",
        _ => "END: Subscribe for more",
    }
}

/// Builds the template script for a request.
///
/// The output depends only on the request: no clock, no randomness. Options
/// that did not match a known value fall back to a neutral hook and adverb.
pub fn compose(request: &ScriptRequest) -> String {
    let adverb = tone_adverb(request.tone.known());

    let mut blocks: Vec<String> = vec![
        hook_line(request.hook_strength.known()).to_string(),
        format!(
            "Topic: {} — {} | Tone: {} | Platform: {}",
            request.title.trim(),
            request.genre,
            request.tone,
            request.platform
        ),
    ];

    let notes = request.notes.trim();
    if !notes.is_empty() {
        blocks.push(format!("Notes: {}", notes));
    }

    let characters: Vec<String> = request
        .characters
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| shorten(&format!("{}: (short descriptor)", name)))
        .collect();
    if !characters.is_empty() {
        blocks.push("Characters:".to_string());
        blocks.push(characters.join("\n"));
    }

    for i in 1..=body_line_count(request.length_seconds) {
        blocks.push(shorten(&format!(
            "{}. This is a meaningful short script line written {}.",
            i, adverb
        )));
    }

    if request.include_cta {
        blocks.push(cta_line(request.platform.known()).to_string());
    }

    blocks.join("\n\n")
}

/// Caps a line at `MAX_LINE_WIDTH` characters, marking the cut with an ellipsis.
fn shorten(line: &str) -> String {
    if line.chars().count() <= MAX_LINE_WIDTH {
        return line.to_string();
    }
    let mut out: String = line.chars().take(MAX_LINE_WIDTH - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::{Choice, Genre};

    fn launch_day() -> ScriptRequest {
        ScriptRequest {
            title: "Launch Day".to_string(),
            genre: Genre::ProductPromo.into(),
            tone: Tone::Businesslike.into(),
            platform: Platform::TikTok.into(),
            length_seconds: 45,
            hook_strength: HookStrength::Standard.into(),
            characters: vec!["Ava".to_string()],
            notes: String::new(),
            include_cta: true,
        }
    }

    fn numbered_lines(script: &str) -> Vec<&str> {
        script
            .lines()
            .filter(|l| {
                let digits: String = l.chars().take_while(|c| c.is_ascii_digit()).collect();
                !digits.is_empty() && l[digits.len()..].starts_with(". ")
            })
            .collect()
    }

    #[test]
    fn test_launch_day_example() {
        let script = compose(&launch_day());

        assert!(script.starts_with("Listen — this changed my whole year."));
        assert!(script
            .lines()
            .any(|l| l == "Topic: Launch Day — Product Promo | Tone: Businesslike | Platform: TikTok"));
        assert!(script.contains("Characters:\n\nAva: (short descriptor)"));
        assert!(!script.contains("Notes:"));

        let body = numbered_lines(&script);
        assert_eq!(body.len(), 5);
        assert_eq!(body[0], "1. This is a meaningful short script line written strategically.");
        assert_eq!(body[4], "5. This is a meaningful short script line written strategically.");

        assert!(script.ends_with("END: Subscribe for more"));
    }

    #[test]
    fn test_output_is_deterministic_and_trimmed() {
        let request = launch_day();
        let first = compose(&request);
        let second = compose(&request);
        assert_eq!(first, second);
        assert!(!first.is_empty());
        assert_eq!(first.trim(), first);
    }

    #[test]
    fn test_hook_selection() {
        for (hook, expected) in [
            (HookStrength::Mild, "What if I told you...?"),
            (HookStrength::Standard, "Listen — this changed my whole year."),
            (HookStrength::AllIn, "Pay attention — this could change your day."),
        ] {
            let request = ScriptRequest {
                hook_strength: hook.into(),
                ..launch_day()
            };
            let script = compose(&request);
            assert_eq!(script.lines().next(), Some(expected));
        }
    }

    #[test]
    fn test_unknown_values_fall_back_to_defaults() {
        let request = ScriptRequest {
            hook_strength: Choice::parse("Thermonuclear"),
            tone: Choice::parse("Whimsical"),
            platform: Choice::parse("Radio"),
            ..launch_day()
        };
        let script = compose(&request);
        assert_eq!(script.lines().next(), Some("Here’s something to think about:"));
        assert!(script.contains("| Tone: Whimsical | Platform: Radio"));
        assert!(script.contains("written sincerely."));
        assert!(script.ends_with("END: Subscribe for more"));
    }

    #[test]
    fn test_body_line_count_scales_with_length() {
        for (length, expected) in [(15, 3), (16, 3), (45, 5), (80, 10), (180, 22)] {
            let request = ScriptRequest {
                length_seconds: length,
                ..launch_day()
            };
            assert_eq!(numbered_lines(&compose(&request)).len(), expected, "length {}", length);
        }
    }

    #[test]
    fn test_characters_section_only_when_names_present() {
        let request = ScriptRequest {
            characters: vec![],
            ..launch_day()
        };
        assert!(!compose(&request).contains("Characters:"));

        let request = ScriptRequest {
            characters: vec!["  ".to_string(), "".to_string()],
            ..launch_day()
        };
        assert!(!compose(&request).contains("Characters:"));

        let request = ScriptRequest {
            characters: vec!["Zed".to_string(), " ".to_string(), "Ava".to_string()],
            ..launch_day()
        };
        let script = compose(&request);
        let descriptors: Vec<&str> = script
            .lines()
            .filter(|l| l.ends_with(": (short descriptor)"))
            .collect();
        assert_eq!(descriptors, vec!["Zed: (short descriptor)", "Ava: (short descriptor)"]);
    }

    #[test]
    fn test_cta_line() {
        let podcast = ScriptRequest {
            platform: Platform::PodcastIntro.into(),
            ..launch_day()
        };
        assert!(compose(&podcast).ends_with("END: Follow our podcast"));

        for platform in [Platform::YouTubeShort, Platform::InstagramReel, Platform::Facebook] {
            let request = ScriptRequest {
                platform: platform.into(),
                ..launch_day()
            };
            assert!(compose(&request).ends_with("END: Subscribe for more"));
        }

        let no_cta = ScriptRequest {
            include_cta: false,
            ..podcast
        };
        assert!(!compose(&no_cta).contains("END:"));
    }

    #[test]
    fn test_notes_line_only_when_non_blank() {
        let request = ScriptRequest {
            notes: "   ".to_string(),
            ..launch_day()
        };
        assert!(!compose(&request).contains("Notes:"));

        let request = ScriptRequest {
            notes: " mention hustle ".to_string(),
            ..launch_day()
        };
        assert!(compose(&request).contains("\n\nNotes: mention hustle\n\n"));
    }

    #[test]
    fn test_long_character_names_are_shortened() {
        let request = ScriptRequest {
            characters: vec!["N".repeat(200)],
            ..launch_day()
        };
        let script = compose(&request);
        let line = script
            .lines()
            .find(|l| l.starts_with("NNN"))
            .expect("descriptor line");
        assert_eq!(line.chars().count(), MAX_LINE_WIDTH);
        assert!(line.ends_with('…'));
    }
}
