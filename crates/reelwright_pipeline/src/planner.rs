//! Builds fully resolved generation jobs.

use reelwright_core::{
    CharacterId, Checkpoint, GenerationJob, JobMode, ProviderOverrides, ProviderResolver,
    ResolvedProviders, Series, UserId, Video,
};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_interface::{Catalog, CharacterRepository, Store, UserRepository};
use std::sync::Arc;
use tracing::{debug, instrument};

/// What a job is built from beyond the series itself.
#[derive(Debug, Clone, Default)]
pub struct JobInputs {
    /// Provider overrides layered over the user's defaults.
    pub overrides: ProviderOverrides,
    /// Bound character, if any.
    pub character_id: Option<CharacterId>,
    /// Background music, if any.
    pub music_path: Option<String>,
    /// Progress to resume from.
    pub checkpoint: Option<Checkpoint>,
    /// Pipeline mode.
    pub mode: JobMode,
}

impl JobInputs {
    /// Inputs taken from a series' stored configuration.
    pub fn from_series(series: &Series) -> Self {
        Self {
            overrides: series.providers().clone(),
            character_id: series.character_id().clone(),
            music_path: series.music_path().clone(),
            ..Self::default()
        }
    }
}

/// Resolves providers, style, niche and character into a [`GenerationJob`].
///
/// Providers are resolved afresh on every call; nothing is cached between
/// entry points.
#[derive(Clone)]
pub struct JobPlanner {
    store: Arc<dyn Store>,
    catalog: Arc<dyn Catalog>,
    resolver: ProviderResolver,
}

impl JobPlanner {
    /// Planner over the given store and lookups.
    pub fn new(store: Arc<dyn Store>, catalog: Arc<dyn Catalog>, resolver: ProviderResolver) -> Self {
        Self {
            store,
            catalog,
            resolver,
        }
    }

    /// Provider resolver, for its fallbacks.
    pub fn resolver(&self) -> &ProviderResolver {
        &self.resolver
    }

    /// Resolve providers for `user_id` with `overrides` on top of the user's saved defaults.
    ///
    /// A user without a stored profile has no defaults.
    pub async fn resolve_providers(
        &self,
        user_id: &UserId,
        overrides: &ProviderOverrides,
    ) -> ReelResult<ResolvedProviders> {
        let defaults = match self.store.get_user(user_id).await {
            Ok(profile) => profile.provider_defaults,
            Err(e) if matches!(e.kind(), ReelErrorKind::NotFound { .. }) => {
                ProviderOverrides::default()
            }
            Err(e) => return Err(e),
        };
        Ok(self.resolver.resolve(overrides, &defaults))
    }

    /// The bound character's prompt text.
    pub async fn character_prompt(&self, id: Option<&CharacterId>) -> ReelResult<Option<String>> {
        match id {
            Some(id) => Ok(Some(self.store.get_character(id).await?.prompt())),
            None => Ok(None),
        }
    }

    /// Art style prompt modifier and negative prompt for a series.
    pub fn style(&self, series: &Series) -> ReelResult<(String, String)> {
        let style = self.catalog.art_style(series.art_style_id()).ok_or_else(|| {
            ReelError::new(ReelErrorKind::not_found(
                "art style",
                series.art_style_id().as_str(),
            ))
        })?;
        Ok((style.prompt_modifier, style.negative_prompt))
    }

    /// Niche description for prompts; unknown ids are passed through.
    pub fn niche(&self, series: &Series) -> String {
        match self.catalog.niche(series.niche_id()) {
            Some(niche) if niche.description.is_empty() => niche.name,
            Some(niche) => format!("{}: {}", niche.name, niche.description),
            None => series.niche_id().clone(),
        }
    }

    /// Build the job for `video` of `series`.
    #[instrument(skip(self, series, video, inputs), fields(video_id = %video.id(), series_id = %series.id(), mode = ?inputs.mode))]
    pub async fn plan(
        &self,
        series: &Series,
        video: &Video,
        inputs: JobInputs,
    ) -> ReelResult<GenerationJob> {
        let providers = self
            .resolve_providers(series.user_id(), &inputs.overrides)
            .await?;
        let (style_prompt_modifier, negative_prompt) = self.style(series)?;
        let character_prompt = self.character_prompt(inputs.character_id.as_ref()).await?;
        let scenes = (!video.scenes().is_empty()).then(|| video.scenes().clone());

        let job = GenerationJob::builder()
            .video_id(video.id().clone())
            .series_id(series.id().clone())
            .user_id(series.user_id().clone())
            .mode(inputs.mode)
            .providers(providers)
            .style_prompt_modifier(style_prompt_modifier)
            .negative_prompt(negative_prompt)
            .tone(series.tone().clone())
            .niche(self.niche(series))
            .voice_id(series.voice_id().clone())
            .language(series.language().clone())
            .target_duration_secs(*video.target_duration_secs())
            .music_path(inputs.music_path)
            .character_prompt(character_prompt)
            .scenes(scenes)
            .script(video.script_text().clone())
            .checkpoint(inputs.checkpoint)
            .build()
            .map_err(|e| ReelError::new(ReelErrorKind::Builder(e.to_string())))?;
        debug!(has_script = job.has_script(), "Planned job");
        Ok(job)
    }
}
