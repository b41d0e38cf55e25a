//! CLI command definitions and handlers

use clap::Subcommand;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::client::IntentoConnector;
use crate::core::errors::{status_hint, IntentoError};
use crate::core::models::{
    AuthSpec, Capability, FulfillParams, LanguagesQuery, ListParam, NewDelegatedCredential,
    ProvidersQuery, TextInput, UsageParams, Viewpoint,
};

/// Commands for the Intento CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process text with an intent (translate, sentiment, dictionary, ...)
    Fulfill {
        /// Intent: `translate`, `ai.text.sentiment`, `ai/image/ocr`, ...
        #[arg(short, long, default_value = "translate")]
        intent: String,

        /// Text to process; several values are sent as a bulk request
        text: Vec<String>,

        /// Source language (auto-detect if not specified)
        #[arg(long)]
        from: Option<String>,

        /// Target language
        #[arg(short, long)]
        to: Option<String>,

        /// Text language for sentiment and similar intents
        #[arg(long)]
        lang: Option<String>,

        /// Translation domain
        #[arg(long)]
        category: Option<String>,

        /// Content format: text, html or xml
        #[arg(long)]
        format: Option<String>,

        /// Provider id(s), comma separated
        #[arg(short, long)]
        provider: Option<String>,

        /// Own provider credentials as JSON
        #[arg(long, conflicts_with = "auth_file")]
        auth: Option<String>,

        /// File holding own provider credentials as JSON
        #[arg(long)]
        auth_file: Option<PathBuf>,

        /// Process as a deferred operation
        #[arg(long = "async")]
        async_mode: bool,

        /// With --async, poll the operation until it is done
        #[arg(long, requires = "async_mode")]
        wait: bool,

        /// Pre-processing steps, comma separated
        #[arg(long)]
        pre_processing: Option<String>,

        /// Post-processing steps, comma separated
        #[arg(long)]
        post_processing: Option<String>,

        /// Fall back to these providers, comma separated
        #[arg(long)]
        failover: Option<String>,

        /// Ask for alternative translations
        #[arg(long)]
        multiple_translations: bool,
    },

    /// List providers of an intent
    Providers {
        /// Intent name
        #[arg(short, long, default_value = "translate")]
        intent: String,

        /// Source language
        #[arg(long)]
        from: Option<String>,

        /// Target language
        #[arg(short, long)]
        to: Option<String>,

        /// Only providers with bulk support
        #[arg(long)]
        bulk: bool,

        /// Only providers with language detection
        #[arg(long)]
        lang_detect: bool,

        /// Content format
        #[arg(long)]
        format: Option<String>,
    },

    /// Show one provider
    Provider {
        /// Intent name
        #[arg(short, long, default_value = "translate")]
        intent: String,

        /// Provider id
        id: String,

        /// Source language
        #[arg(long)]
        from: Option<String>,

        /// Target language
        #[arg(short, long)]
        to: Option<String>,
    },

    /// List languages supported by an intent
    Languages {
        /// Intent name
        #[arg(short, long, default_value = "translate")]
        intent: String,

        /// Locale for language names
        #[arg(long)]
        locale: Option<String>,
    },

    /// Show one language
    Language {
        /// Intent name
        #[arg(short, long, default_value = "translate")]
        intent: String,

        /// Language code
        code: String,

        /// Locale for language names
        #[arg(long)]
        locale: Option<String>,
    },

    /// Show or update language settings (JSON body updates)
    Settings {
        /// JSON body; omitted to read the settings
        body: Option<String>,
    },

    /// Show processing rules
    ProcessingRules,

    /// Fetch an async operation
    Operation {
        /// Operation id
        id: String,

        /// Poll until the operation is done
        #[arg(long)]
        wait: bool,
    },

    /// Usage statistics
    Usage {
        /// intento, provider or distinct
        #[arg(long, default_value = "intento")]
        viewpoint: String,

        /// Range start, unix seconds
        #[arg(long)]
        from: Option<i64>,

        /// Range end, unix seconds
        #[arg(long)]
        to: Option<i64>,

        /// Bucket size, e.g. 1day
        #[arg(long)]
        bucket: Option<String>,

        /// Provider ids, comma separated
        #[arg(long)]
        provider: Option<String>,

        /// Intent ids, comma separated
        #[arg(long)]
        intent: Option<String>,

        /// Response statuses, comma separated
        #[arg(long)]
        status: Option<String>,

        /// Client ids, comma separated
        #[arg(long)]
        client: Option<String>,

        /// Fields to group by, comma separated
        #[arg(long)]
        group: Option<String>,

        /// Field combinations for the distinct viewpoint
        #[arg(long)]
        fields: Option<String>,
    },

    /// Manage delegated credentials
    Credentials {
        /// Credential action
        #[command(subcommand)]
        action: CredentialsAction,
    },
}

/// Delegated credential operations
#[derive(Subcommand, Debug)]
pub enum CredentialsAction {
    /// List delegated credentials
    List,

    /// Register a delegated credential
    Add {
        /// Credential id
        id: String,

        /// Credential type, e.g. google_service_account
        #[arg(long)]
        credential_type: String,

        /// JSON file with the secret credentials
        #[arg(long)]
        secret_credentials_file: PathBuf,
    },

    /// Remove a delegated credential
    Remove {
        /// Credential id
        id: String,
    },
}

/// Resolve an intent name through the closed capability set
pub fn resolve_capability(intent: &str) -> anyhow::Result<Capability> {
    intent.parse::<Capability>().map_err(|e| {
        let valid = Capability::ALL
            .iter()
            .map(|c| c.slug())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::anyhow!("{}. Valid intents are {} or their ai.<domain>.<slug> ids", e, valid)
    })
}

fn list(value: Option<String>) -> Option<ListParam> {
    value.map(ListParam::from)
}

fn read_json_file(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Error reading {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Run a command and print its JSON result
pub async fn run(client: &IntentoConnector, command: Commands) -> anyhow::Result<()> {
    let result = match command {
        Commands::Fulfill {
            intent,
            text,
            from,
            to,
            lang,
            category,
            format,
            provider,
            auth,
            auth_file,
            async_mode,
            wait,
            pre_processing,
            post_processing,
            failover,
            multiple_translations,
        } => {
            let capability = resolve_capability(&intent)?;
            if async_mode && provider.is_none() {
                anyhow::bail!("Smart mode for async operations isn't supported, please specify --provider");
            }

            let auth = match (auth, auth_file) {
                (Some(raw), _) => Some(AuthSpec::Json(raw)),
                (None, Some(path)) => Some(AuthSpec::Json(std::fs::read_to_string(&path)?)),
                (None, None) => None,
            };

            let text = match text.len() {
                0 => None,
                1 => text.into_iter().next().map(TextInput::Single),
                _ => Some(TextInput::Bulk(text)),
            };

            let params = FulfillParams {
                text,
                from,
                to,
                lang,
                category,
                format,
                provider: list(provider),
                auth,
                async_mode: async_mode.then_some(true),
                await_async: wait,
                failover: failover.is_some().then_some(true),
                failover_list: list(failover),
                pre_processing: list(pre_processing),
                post_processing: list(post_processing),
                multiple_translations: multiple_translations.then_some(true),
                ..Default::default()
            };

            info!("Fulfilling {}", capability);
            client.fulfill(capability, params).await
        }

        Commands::Providers {
            intent,
            from,
            to,
            bulk,
            lang_detect,
            format,
        } => {
            let query = ProvidersQuery {
                from,
                to,
                bulk: bulk.then_some(true),
                lang_detect: lang_detect.then_some(true),
                format,
            };
            client.providers(resolve_capability(&intent)?, &query).await
        }

        Commands::Provider { intent, id, from, to } => {
            let query = ProvidersQuery {
                from,
                to,
                ..Default::default()
            };
            client
                .provider(resolve_capability(&intent)?, &id, &query)
                .await
        }

        Commands::Languages { intent, locale } => {
            client
                .languages(resolve_capability(&intent)?, &LanguagesQuery { locale })
                .await
        }

        Commands::Language {
            intent,
            code,
            locale,
        } => {
            client
                .language(resolve_capability(&intent)?, &code, &LanguagesQuery { locale })
                .await
        }

        Commands::Settings { body } => {
            let settings = body.map(|b| serde_json::from_str::<Value>(&b)).transpose()?;
            client.settings_languages(settings).await
        }

        Commands::ProcessingRules => client.processing_rules().await,

        Commands::Operation { id, wait } => {
            if wait {
                client.await_operation(&id).await
            } else {
                client.operation(&id).await
            }
        }

        Commands::Usage {
            viewpoint,
            from,
            to,
            bucket,
            provider,
            intent,
            status,
            client: api_client,
            group,
            fields,
        } => {
            let viewpoint: Viewpoint = viewpoint.parse()?;
            let params = UsageParams {
                from,
                to,
                bucket,
                provider: list(provider),
                intent: list(intent),
                status: list(status),
                client: list(api_client),
                group: list(group),
                fields: list(fields),
            };
            client.usage(viewpoint, &params).await
        }

        Commands::Credentials { action } => match action {
            CredentialsAction::List => client.delegated_credentials().await,
            CredentialsAction::Add {
                id,
                credential_type,
                secret_credentials_file,
            } => {
                let credential = NewDelegatedCredential {
                    credential_id: id,
                    credential_type,
                    secret_credentials: read_json_file(&secret_credentials_file)?,
                };
                client.add_delegated_credential(&credential).await
            }
            CredentialsAction::Remove { id } => client.remove_delegated_credential(&id).await,
        },
    };

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => Err(explain(e)),
    }
}

/// Attach the API status hint to an error
pub fn explain(err: IntentoError) -> anyhow::Error {
    match err.status().and_then(status_hint) {
        Some(hint) => anyhow::anyhow!("{} ({})", err, hint),
        None => err.into(),
    }
}
