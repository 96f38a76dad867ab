use anyhow::{bail, Result};
use std::fmt;

pub const MIN_LENGTH_SECONDS: u32 = 15;
pub const MAX_LENGTH_SECONDS: u32 = 180;
pub const LENGTH_STEP_SECONDS: u32 = 5;

/// A closed set of options that each carry a display label.
pub trait Labeled: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    /// Case-insensitive lookup against the display labels.
    fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(raw))
    }
}

macro_rules! labeled_enum {
    ($name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Labeled for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labeled_enum!(Genre {
    Motivational => "Motivational",
    Comedy => "Comedy",
    Drama => "Drama",
    Romance => "Romance",
    Horror => "Horror",
    Educational => "Educational",
    Inspirational => "Religious/Inspirational",
    ProductPromo => "Product Promo",
    Explainer => "Explainer",
});

labeled_enum!(Tone {
    Warm => "Warm",
    Funny => "Funny",
    Sarcastic => "Sarcastic",
    Serious => "Serious",
    Emotional => "Emotional",
    Businesslike => "Businesslike",
    Playful => "Playful",
});

labeled_enum!(Platform {
    YouTubeShort => "YouTube Short",
    TikTok => "TikTok",
    InstagramReel => "Instagram Reel",
    Facebook => "Facebook",
    PodcastIntro => "Podcast Intro",
});

labeled_enum!(HookStrength {
    Mild => "Mild",
    Standard => "Standard",
    AllIn => "All-in",
});

/// A selection as it arrived from the user: either one of the known options,
/// or raw text that matched none of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    Known(T),
    Unknown(String),
}

impl<T: Labeled> Choice<T> {
    pub fn parse(raw: &str) -> Self {
        match T::from_label(raw) {
            Some(v) => Choice::Known(v),
            None => Choice::Unknown(raw.trim().to_string()),
        }
    }

    pub fn known(&self) -> Option<T> {
        match self {
            Choice::Known(v) => Some(*v),
            Choice::Unknown(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::Known(v) => v.label(),
            Choice::Unknown(raw) => raw,
        }
    }
}

impl<T: Labeled> From<T> for Choice<T> {
    fn from(value: T) -> Self {
        Choice::Known(value)
    }
}

impl<T: Labeled> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub title: String,
    pub genre: Choice<Genre>,
    pub tone: Choice<Tone>,
    pub platform: Choice<Platform>,
    pub length_seconds: u32,
    pub hook_strength: Choice<HookStrength>,
    pub characters: Vec<String>,
    pub notes: String,
    pub include_cta: bool,
}

impl Default for ScriptRequest {
    fn default() -> Self {
        Self {
            title: "A quick motivational boost for entrepreneurs".to_string(),
            genre: Genre::Motivational.into(),
            tone: Tone::Warm.into(),
            platform: Platform::YouTubeShort.into(),
            length_seconds: 45,
            hook_strength: HookStrength::AllIn.into(),
            characters: Vec::new(),
            notes: "Use emotional hook, short punchlines, mention hustle and faith.".to_string(),
            include_cta: true,
        }
    }
}

impl ScriptRequest {
    /// Strict check used at the input boundary. Composing never requires it.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            bail!("Script title must not be empty");
        }
        if let Choice::Unknown(raw) = &self.genre {
            bail!("Unknown genre: {:?}. Expected one of: {}", raw, labels::<Genre>());
        }
        if let Choice::Unknown(raw) = &self.tone {
            bail!("Unknown tone: {:?}. Expected one of: {}", raw, labels::<Tone>());
        }
        if let Choice::Unknown(raw) = &self.platform {
            bail!("Unknown platform: {:?}. Expected one of: {}", raw, labels::<Platform>());
        }
        if let Choice::Unknown(raw) = &self.hook_strength {
            bail!(
                "Unknown hook strength: {:?}. Expected one of: {}",
                raw,
                labels::<HookStrength>()
            );
        }
        validate_length(self.length_seconds).map_err(anyhow::Error::msg)?;
        Ok(())
    }
}

pub fn validate_length(seconds: u32) -> std::result::Result<(), String> {
    if !(MIN_LENGTH_SECONDS..=MAX_LENGTH_SECONDS).contains(&seconds) {
        return Err(format!(
            "Script length must be between {} and {} seconds, got {}",
            MIN_LENGTH_SECONDS, MAX_LENGTH_SECONDS, seconds
        ));
    }
    if seconds % LENGTH_STEP_SECONDS != 0 {
        return Err(format!(
            "Script length must be a multiple of {} seconds, got {}",
            LENGTH_STEP_SECONDS, seconds
        ));
    }
    Ok(())
}

/// Splits a comma separated list of names, dropping blank entries.
pub fn parse_characters(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn labels<T: Labeled>() -> String {
    T::ALL
        .iter()
        .map(|v| v.label())
        .collect::<Vec<_>>()
        .join(", ")
}
