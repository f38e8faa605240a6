use crate::infra::{parse_content_type, ConfiguredAnalyzer, ConfiguredProfileStore};
use clap::{Args, Subcommand};
use content_guard::analysis::{
    parameter_labels, AnalysisResult, AnalysisServiceError, AnalysisView, ChildProfile,
    ContentAnalysisService, ContentType, ProfileFields, ProfileId, ProfileStore, Sensitivities,
};
use content_guard::config::{AppConfig, ProfileStoreConfig};
use content_guard::error::AppError;
use content_guard::telemetry::{self, LogSink};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Title of the book or movie
    #[arg(long)]
    pub(crate) title: String,
    /// Content type: book or movie
    #[arg(long = "type", value_parser = parse_content_type)]
    pub(crate) content_type: ContentType,
    /// Tailor the assessment to a child of this age
    #[arg(long, conflicts_with = "profile_id")]
    pub(crate) age: Option<u8>,
    /// The child is sensitive to fear and horror (requires --age)
    #[arg(long, requires = "age")]
    pub(crate) fear_sensitive: bool,
    /// The child is sensitive to violence (requires --age)
    #[arg(long, requires = "age")]
    pub(crate) violence_sensitive: bool,
    /// Use a stored profile instead of an inline child
    #[arg(long)]
    pub(crate) profile_id: Option<String>,
    /// Skip the remote analyzer and use catalog or placeholder data
    #[arg(long)]
    pub(crate) offline: bool,
    /// Seed for placeholder generation, for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the full result as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct StoreArgs {
    /// Profile file to use instead of PROFILE_STORE_PATH
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

impl StoreArgs {
    fn resolve(&self, config: &AppConfig) -> ProfileStoreConfig {
        ProfileStoreConfig {
            path: self.store.clone().or_else(|| config.profiles.path.clone()),
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum ProfilesCommand {
    /// List stored profiles
    List {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Add a child profile
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u8,
        #[arg(long)]
        fear_sensitive: bool,
        #[arg(long)]
        violence_sensitive: bool,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Remove a child profile by id
    Remove {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;
    let result = assess(&args, &config).await?;

    if args.json {
        match serde_json::to_string_pretty(&AnalysisView::from(result)) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Result payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_assessment(&result));
    }
    Ok(())
}

pub(crate) async fn assess(
    args: &AnalyzeArgs,
    config: &AppConfig,
) -> Result<AnalysisResult, AppError> {
    let analyzer = Arc::new(ConfiguredAnalyzer::from_config(
        &config.analyzer,
        args.offline,
    )?);
    let profiles = Arc::new(ConfiguredProfileStore::open(&args.store.resolve(config))?);
    let service = match args.seed {
        Some(seed) => ContentAnalysisService::seeded(analyzer, profiles, seed),
        None => ContentAnalysisService::new(analyzer, profiles),
    };

    match inline_profile(args) {
        Some(child) => {
            if args.title.trim().is_empty() {
                return Err(AnalysisServiceError::EmptyTitle.into());
            }
            Ok(service
                .analyze_content(&args.title, args.content_type, Some(&child))
                .await)
        }
        None => {
            let profile_id = args.profile_id.clone().map(ProfileId);
            Ok(service
                .analyze_for_profile(&args.title, args.content_type, profile_id.as_ref())
                .await?)
        }
    }
}

fn inline_profile(args: &AnalyzeArgs) -> Option<ChildProfile> {
    let age = args.age?;
    Some(ChildProfile {
        id: ProfileId("cli".to_string()),
        name: "command line child".to_string(),
        age,
        sensitivities: Sensitivities {
            fear_sensitive: args.fear_sensitive,
            violence_sensitive: args.violence_sensitive,
        },
        notes: None,
        created_at: None,
    })
}

pub(crate) fn render_assessment(result: &AnalysisResult) -> String {
    let content = &result.content;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", content.title, content.content_type);
    let _ = writeln!(
        out,
        "Recommended age: {}+ | verdict: {} | confidence: {}",
        result.recommended_age,
        result.verdict.label(),
        result.confidence.label()
    );
    if let Some(profile) = &result.profile {
        let _ = writeln!(out, "Tailored for {} (age {})", profile.name, profile.age);
    }

    let _ = writeln!(out, "Content levels:");
    for (dimension, label) in parameter_labels(&content.parameters) {
        let _ = writeln!(out, "  - {dimension}: {label}");
    }

    let themes = &content.parameters.themes;
    let flagged: Vec<&str> = [
        (themes.death, "death"),
        (themes.bullying, "bullying"),
        (themes.mental_health, "mental health"),
        (themes.moral_ambiguity, "moral ambiguity"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect();
    if !flagged.is_empty() {
        let _ = writeln!(out, "Themes: {}", flagged.join(", "));
    }

    if !result.score_trace.is_empty() {
        let _ = writeln!(out, "Age rules applied:");
        for component in &result.score_trace {
            let _ = writeln!(
                out,
                "  - {} -> {}+: {}",
                component.factor.label(),
                component.age_floor,
                component.notes
            );
        }
    }

    let _ = writeln!(out, "Notes: {}", content.notes);
    if let Some(reasoning) = content.reasoning.as_deref().filter(|text| !text.is_empty()) {
        let _ = writeln!(out, "Reasoning: {reasoning}");
    }
    if let Some(error) = &result.error {
        let _ = writeln!(out, "Remote analysis unavailable: {error}");
    }
    out
}

pub(crate) fn run_profiles(command: ProfilesCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;

    match command {
        ProfilesCommand::List { store } => {
            let store = ConfiguredProfileStore::open_persistent(&store.resolve(&config))?;
            let profiles = store.list()?;
            if profiles.is_empty() {
                println!("No profiles stored");
            }
            for profile in profiles {
                println!("{}", describe_profile(&profile));
            }
        }
        ProfilesCommand::Add {
            name,
            age,
            fear_sensitive,
            violence_sensitive,
            notes,
            store,
        } => {
            let store = ConfiguredProfileStore::open_persistent(&store.resolve(&config))?;
            let profile = store.create(ProfileFields {
                name,
                age,
                sensitivities: Sensitivities {
                    fear_sensitive,
                    violence_sensitive,
                },
                notes,
            })?;
            println!("Added {}", describe_profile(&profile));
        }
        ProfilesCommand::Remove { id, store } => {
            let store = ConfiguredProfileStore::open_persistent(&store.resolve(&config))?;
            store.delete(&ProfileId(id.clone()))?;
            println!("Removed profile {id}");
        }
    }
    Ok(())
}

fn describe_profile(profile: &ChildProfile) -> String {
    let mut sensitivities = Vec::new();
    if profile.sensitivities.fear_sensitive {
        sensitivities.push("fear");
    }
    if profile.sensitivities.violence_sensitive {
        sensitivities.push("violence");
    }

    let mut line = format!("{} | {} | age {}", profile.id, profile.name, profile.age);
    if !sensitivities.is_empty() {
        let _ = write!(line, " | sensitive to {}", sensitivities.join(", "));
    }
    line
}
