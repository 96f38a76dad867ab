use crate::core::config::Config;
use crate::core::request::{
    parse_characters, validate_length, Choice, Genre, HookStrength, Labeled, Platform,
    ScriptRequest, Tone, LENGTH_STEP_SECONDS, MAX_LENGTH_SECONDS, MIN_LENGTH_SECONDS,
};
use anyhow::Result;
use inquire::validator::Validation;
use inquire::{Confirm, CustomType, Password, Select, Text};
use std::path::Path;

/// Asks for an OpenAI key when none is configured. An empty answer skips
/// remote generation for this run.
pub fn prompt_api_key(config: &mut Config, config_path: &Path) -> Result<()> {
    if config.llm.provider != "openai" || !config.llm.openai.api_key.trim().is_empty() {
        return Ok(());
    }

    let key = Password::new("OpenAI API Key (leave empty for offline generation):")
        .without_confirmation()
        .prompt()?;
    let key = key.trim();
    if key.is_empty() {
        return Ok(());
    }

    config.llm.openai.api_key = key.to_string();
    if Confirm::new("Save this key to the config file?")
        .with_default(false)
        .prompt()?
    {
        config.save(config_path)?;
        println!("Configuration saved.");
    }
    Ok(())
}

/// Runs the interactive form, starting from `initial` and returning the
/// values the user settled on.
pub fn run_form(initial: &ScriptRequest, characters_hint: &str) -> Result<ScriptRequest> {
    let title = Text::new("Script title / topic:")
        .with_default(&initial.title)
        .with_validator(|v: &str| {
            if v.trim().is_empty() {
                Ok(Validation::Invalid("Title must not be empty".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;

    let notes = Text::new("Extra notes / keywords (tone, lines, props):")
        .with_default(&initial.notes)
        .prompt()?;

    let genre = select_option::<Genre>("Genre:", &initial.genre)?;
    let tone = select_option::<Tone>("Tone:", &initial.tone)?;
    let platform = select_option::<Platform>("Target platform:", &initial.platform)?;

    let length_seconds = CustomType::<u32>::new(&format!(
        "Script length in seconds ({}-{}, step {}):",
        MIN_LENGTH_SECONDS, MAX_LENGTH_SECONDS, LENGTH_STEP_SECONDS
    ))
    .with_default(initial.length_seconds)
    .with_validator(|v: &u32| match validate_length(*v) {
        Ok(()) => Ok(Validation::Valid),
        Err(msg) => Ok(Validation::Invalid(msg.into())),
    })
    .prompt()?;

    let hook_strength = select_option::<HookStrength>("Hook strength:", &initial.hook_strength)?;

    let characters = if Confirm::new("Add named characters / roles?")
        .with_default(!initial.characters.is_empty())
        .prompt()?
    {
        let default_names = if initial.characters.is_empty() {
            characters_hint.to_string()
        } else {
            initial.characters.join(", ")
        };
        let input = Text::new("Characters (comma separated):")
            .with_default(&default_names)
            .prompt()?;
        parse_characters(&input)
    } else {
        Vec::new()
    };

    let include_cta = Confirm::new("Include CTA / endline?")
        .with_default(initial.include_cta)
        .prompt()?;

    Ok(ScriptRequest {
        title,
        genre: genre.into(),
        tone: tone.into(),
        platform: platform.into(),
        length_seconds,
        hook_strength: hook_strength.into(),
        characters,
        notes,
        include_cta,
    })
}

fn select_option<T>(prompt: &str, current: &Choice<T>) -> Result<T>
where
    T: Labeled + PartialEq + std::fmt::Display,
{
    let cursor = starting_cursor(current);
    let selection = Select::new(prompt, T::ALL.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;
    Ok(selection)
}

/// Position of the current value in the option list; unknown values start at the top.
fn starting_cursor<T: Labeled + PartialEq>(current: &Choice<T>) -> usize {
    current
        .known()
        .and_then(|v| T::ALL.iter().position(|o| *o == v))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_cursor_follows_current_value() {
        assert_eq!(starting_cursor(&Choice::Known(HookStrength::AllIn)), 2);
        assert_eq!(starting_cursor(&Choice::Known(Platform::PodcastIntro)), 4);
        assert_eq!(starting_cursor(&Choice::<Tone>::parse("Whimsical")), 0);
    }
}
