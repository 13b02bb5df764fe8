use reelwright_core::{
    AdminSettings, Capability, DEFAULT_IMAGE_PROVIDER, DEFAULT_LLM_PROVIDER, DEFAULT_TTS_PROVIDER,
    ProviderFallbacks, ProviderOverrides, ProviderResolver,
};

fn overrides(llm: Option<&str>, tts: Option<&str>, image: Option<&str>) -> ProviderOverrides {
    ProviderOverrides {
        llm: llm.map(str::to_string),
        tts: tts.map(str::to_string),
        image: image.map(str::to_string),
    }
}

#[test]
fn test_override_beats_user_default() {
    let resolver = ProviderResolver::default();
    let resolved = resolver.resolve(
        &overrides(Some("anthropic"), Some("openai-tts"), Some("replicate")),
        &overrides(Some("gemini"), Some("elevenlabs"), Some("fal")),
    );
    assert_eq!(resolved.llm(), "anthropic");
    assert_eq!(resolved.tts(), "openai-tts");
    assert_eq!(resolved.image(), "replicate");
}

#[test]
fn test_null_override_falls_through_to_user_default() {
    let resolver = ProviderResolver::default();
    let resolved = resolver.resolve(
        &overrides(None, Some("openai-tts"), None),
        &overrides(Some("gemini"), Some("elevenlabs"), Some("ideogram")),
    );
    assert_eq!(resolved.llm(), "gemini");
    assert_eq!(resolved.tts(), "openai-tts");
    assert_eq!(resolved.image(), "ideogram");
}

#[test]
fn test_system_fallback_when_nothing_stored() {
    let resolver = ProviderResolver::default();
    let resolved = resolver.resolve(&ProviderOverrides::default(), &ProviderOverrides::default());
    assert_eq!(resolved.llm(), DEFAULT_LLM_PROVIDER);
    assert_eq!(resolved.tts(), DEFAULT_TTS_PROVIDER);
    assert_eq!(resolved.image(), DEFAULT_IMAGE_PROVIDER);
}

#[test]
fn test_capabilities_resolve_independently() {
    let resolver = ProviderResolver::new(ProviderFallbacks::new("sys-llm", "sys-tts", "sys-img"));
    let resolved = resolver.resolve(
        &overrides(Some("series-llm"), None, None),
        &overrides(None, Some("user-tts"), None),
    );
    assert_eq!(resolved.get(Capability::Llm), "series-llm");
    assert_eq!(resolved.get(Capability::Tts), "user-tts");
    assert_eq!(resolved.get(Capability::Image), "sys-img");
}

#[test]
fn test_blank_override_is_ignored() {
    let resolver = ProviderResolver::default();
    let resolved = resolver.resolve(
        &overrides(Some("  "), None, None),
        &overrides(Some("gemini"), None, None),
    );
    assert_eq!(resolved.llm(), "gemini");
}

#[test]
fn test_resolution_ignores_admin_enabled_set() {
    // Admin settings only filter what is offered; a stored override is trusted as-is.
    let settings = AdminSettings::default().enable(Capability::Llm, "openai");
    assert!(!settings.is_enabled(Capability::Llm, "anthropic"));

    let resolved = ProviderResolver::default().resolve(
        &overrides(Some("anthropic"), None, None),
        &ProviderOverrides::default(),
    );
    assert_eq!(resolved.llm(), "anthropic");
}

#[test]
fn test_selectable_filters_by_enabled_set() {
    let settings = AdminSettings::default()
        .enable(Capability::Image, "fal")
        .enable(Capability::Image, "replicate");

    let offered = settings.selectable(Capability::Image, ["fal", "ideogram", "replicate"]);
    assert_eq!(offered, vec!["fal".to_string(), "replicate".to_string()]);

    // Nothing configured for TTS means everything is allowed.
    let offered = settings.selectable(Capability::Tts, ["elevenlabs", "openai-tts"]);
    assert_eq!(offered.len(), 2);
}

#[test]
fn test_overrides_accept_legacy_field_names() {
    let parsed: ProviderOverrides =
        serde_json::from_str(r#"{"llmProvider":"gemini","imageProvider":null}"#).unwrap();
    assert_eq!(parsed.get(Capability::Llm), Some("gemini"));
    assert_eq!(parsed.get(Capability::Image), None);
}
