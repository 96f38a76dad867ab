use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;
use std::path::PathBuf;
use std::time::Duration;

use shortscript::core::config::{Config, DEFAULT_CONFIG_PATH};
use shortscript::core::io::NativeStorage;
use shortscript::core::request::{parse_characters, Choice, ScriptRequest};
use shortscript::services::export::save_script;
use shortscript::services::form;
use shortscript::services::llm::create_llm;
use shortscript::services::local::LocalGenerator;
use shortscript::services::pipeline::{ScriptPipeline, ScriptSource};

#[derive(Parser, Debug)]
#[command(name = "shortscript")]
#[command(about = "Generate short video and podcast scripts")]
struct Cli {
    /// Config file (YAML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Skip the interactive form and use config defaults plus flags
    #[arg(short, long)]
    unattended: bool,

    /// Never call a model, always use the template
    #[arg(long)]
    template_only: bool,

    /// Save the script without asking
    #[arg(short, long)]
    save: bool,

    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    tone: Option<String>,
    #[arg(long)]
    platform: Option<String>,
    /// Script length in seconds (15-180, step 5)
    #[arg(long)]
    length: Option<u32>,
    /// Mild, Standard or All-in
    #[arg(long)]
    hook: Option<String>,
    /// Comma separated character names
    #[arg(long)]
    characters: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Leave out the closing call to action
    #[arg(long)]
    no_cta: bool,
}

impl Cli {
    fn apply(&self, request: &mut ScriptRequest) {
        if let Some(title) = &self.title {
            request.title = title.clone();
        }
        if let Some(genre) = &self.genre {
            request.genre = Choice::parse(genre);
        }
        if let Some(tone) = &self.tone {
            request.tone = Choice::parse(tone);
        }
        if let Some(platform) = &self.platform {
            request.platform = Choice::parse(platform);
        }
        if let Some(length) = self.length {
            request.length_seconds = length;
        }
        if let Some(hook) = &self.hook {
            request.hook_strength = Choice::parse(hook);
        }
        if let Some(characters) = &self.characters {
            request.characters = parse_characters(characters);
        }
        if let Some(notes) = &self.notes {
            request.notes = notes.clone();
        }
        if self.no_cta {
            request.include_cta = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    let unattended = cli.unattended || config.unattended;

    let mut request = config.defaults.to_request();
    cli.apply(&mut request);

    if !unattended && !cli.template_only {
        form::prompt_api_key(&mut config, &cli.config)?;
    }

    let request = if unattended {
        request
    } else {
        form::run_form(&request, &config.defaults.characters)?
    };
    request.validate()?;

    let pipeline = if cli.template_only {
        ScriptPipeline::new()
    } else {
        let remote = create_llm(&config.llm)?;
        let local = LocalGenerator::detect(&config.local).await;
        ScriptPipeline::from_parts(remote, local)
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Generating script...");
    let script = pipeline.generate(&request).await;
    spinner.finish_and_clear();

    match script.source {
        ScriptSource::Template if !pipeline.sources().is_empty() => {
            println!("Model generation failed. Using fallback generator.");
        }
        ScriptSource::Template => {
            println!("No model available. Using fallback generator.");
        }
        source => println!("Generated with {}.", source),
    }

    println!("\n--- Generated Script ---\n");
    println!("{}", script.text);
    println!();

    let save = cli.save
        || (!unattended
            && Confirm::new("Download as .txt?")
                .with_default(true)
                .prompt()?);
    if save {
        let storage = NativeStorage::new();
        let path = save_script(
            &storage,
            &config.output_folder,
            &request.title,
            &script.text,
        )
        .await?;
        println!("Saved to {}", path);
    }

    Ok(())
}
