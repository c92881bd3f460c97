//! AI commentary on verses: explanation and thematic significance.
//!
//! Both operations validate the request, build a fixed prompt, and make one
//! call to a [`CompletionProvider`]. They differ in template and in where
//! the credential comes from:
//!
//! | Operation | Required fields | Credential |
//! |-----------|-----------------|------------|
//! | [`explain_verse`] | `translation` | server config (`[llm].api_key_env`) |
//! | [`thematic_significance`] | `translation`, `deity` | supplied by the caller |
//!
//! Field checks run before the credential check, and both run before any
//! network call.

use anyhow::Result;
use serde::Deserialize;

use crate::config::{Config, LlmConfig};
use crate::error::ExplorerError;
use crate::llm::{ChatCompletionsClient, CompletionProvider, Prompt};
use crate::lookup::lookup_verse;
use crate::models::{NormalizedVerse, VerseCoordinate};
use crate::vedaweb::VedaWebClient;

/// Verse fields sent by the front end when asking for commentary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentaryRequest {
    #[serde(default)]
    pub mandala: Option<u32>,
    #[serde(default)]
    pub sukta: Option<u32>,
    #[serde(default)]
    pub rik: Option<u32>,
    #[serde(default)]
    pub sanskrit: Option<String>,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub deity: Option<String>,
    #[serde(default)]
    pub meter: Option<String>,
    /// Caller credential for [`thematic_significance`].
    #[serde(default, alias = "apiKey")]
    pub api_key: Option<String>,
}

impl CommentaryRequest {
    pub fn from_verse(verse: &NormalizedVerse) -> Self {
        Self {
            mandala: Some(verse.mandala as u32),
            sukta: Some(verse.sukta as u32),
            rik: Some(verse.rik as u32),
            sanskrit: Some(verse.sanskrit.clone()),
            transliteration: Some(verse.transliteration.clone()),
            translation: Some(verse.translation.clone()),
            deity: Some(verse.deity.clone()),
            meter: Some(verse.meter.clone()),
            api_key: None,
        }
    }

    /// The caller-supplied key, if non-blank.
    pub fn caller_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    fn reference(&self) -> String {
        match (self.mandala, self.sukta, self.rik) {
            (Some(m), Some(s), Some(r)) => format!("Rigveda {}.{}.{}", m, s, r),
            _ => "this Rigveda verse".to_string(),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ExplorerError> {
    present(value).ok_or_else(|| ExplorerError::Validation(format!("missing required field: {}", name)))
}

fn or_unknown(value: &Option<String>) -> &str {
    present(value).unwrap_or("unknown")
}

const SYSTEM_PROMPT: &str = "You are a scholar of Vedic Sanskrit and the Rigveda. \
Answer accurately, note uncertainty where scholars disagree, and write for an \
interested general reader.";

pub fn explanation_prompt(req: &CommentaryRequest) -> Result<Prompt, ExplorerError> {
    let translation = require(&req.translation, "translation")?;

    let mut user = format!("Explain the meaning of {}.\n\n", req.reference());
    if let Some(sanskrit) = present(&req.sanskrit) {
        user.push_str(&format!("Sanskrit:\n{}\n\n", sanskrit));
    }
    if let Some(translit) = present(&req.transliteration) {
        user.push_str(&format!("Transliteration:\n{}\n\n", translit));
    }
    user.push_str(&format!("Translation:\n{}\n\n", translation));
    user.push_str(&format!(
        "Deity: {}\nMeter: {}\n\n",
        or_unknown(&req.deity),
        or_unknown(&req.meter)
    ));
    user.push_str(
        "Cover the literal meaning, key Sanskrit words, the ritual or mythological \
context, and how traditional commentators have read the verse. Keep it under 400 words.",
    );

    Ok(Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    })
}

pub fn significance_prompt(req: &CommentaryRequest) -> Result<Prompt, ExplorerError> {
    let translation = require(&req.translation, "translation")?;
    let deity = require(&req.deity, "deity")?;

    let mut user = format!(
        "Describe the thematic significance of {}, addressed to {}.\n\n",
        req.reference(),
        deity
    );
    if let Some(sanskrit) = present(&req.sanskrit) {
        user.push_str(&format!("Sanskrit:\n{}\n\n", sanskrit));
    }
    user.push_str(&format!("Translation:\n{}\n\n", translation));
    user.push_str(
        "Discuss the themes it expresses, the role of the deity in Vedic religion, \
its place within the hymn and the wider Rigveda, and its resonance in later Indian \
thought. Keep it under 400 words.",
    );

    Ok(Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    })
}

/// Explains a verse using the server-side credential.
pub async fn explain_verse(
    provider: &dyn CompletionProvider,
    llm: &LlmConfig,
    req: &CommentaryRequest,
) -> Result<String, ExplorerError> {
    let prompt = explanation_prompt(req)?;
    let api_key = llm.server_api_key().ok_or_else(|| {
        ExplorerError::Configuration(format!("{} is not set", llm.api_key_env))
    })?;

    let text = provider.complete(&prompt, &api_key).await?;
    tracing::info!(verse = %req.reference(), chars = text.len(), "explanation generated");
    Ok(text)
}

/// Describes a verse's themes using the caller's credential.
pub async fn thematic_significance(
    provider: &dyn CompletionProvider,
    req: &CommentaryRequest,
) -> Result<String, ExplorerError> {
    let prompt = significance_prompt(req)?;
    let api_key = req.caller_key().ok_or_else(|| {
        ExplorerError::MissingCredential("an API key is required for this request".to_string())
    })?;

    let text = provider.complete(&prompt, api_key).await?;
    tracing::info!(verse = %req.reference(), chars = text.len(), "significance generated");
    Ok(text)
}

/// CLI entry point for `rv explain`.
pub async fn run_explain(
    config: &Config,
    mandala: &str,
    sukta: &str,
    rik: &str,
    significance: bool,
) -> Result<()> {
    let coord = VerseCoordinate::parse(Some(mandala), Some(sukta), Some(rik))?;
    let source = VedaWebClient::new(&config.vedaweb)?;
    let verse = lookup_verse(&source, &coord).await?;

    let provider = ChatCompletionsClient::new(&config.llm)?;
    let mut req = CommentaryRequest::from_verse(&verse);

    let text = if significance {
        req.api_key = config.llm.server_api_key();
        thematic_significance(&provider, &req).await?
    } else {
        explain_verse(&provider, &config.llm, &req).await?
    };

    println!("--- Rigveda {} ---", coord);
    println!("{}", verse.translation);
    println!();
    println!("{}", text);
    Ok(())
}
