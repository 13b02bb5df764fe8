use reelwright_core::{
    CAMERA_ANGLES, Scene, Timing, camera_angle, expand_scenes, split_fragments, target_slot_count,
};

fn scene(narration: &str, visual: &str) -> Scene {
    Scene::new(narration.to_string(), visual.to_string())
}

fn assert_covers(timings: &[Timing], duration_ms: u64) {
    let mut cursor = 0;
    for timing in timings {
        assert_eq!(timing.start_ms, cursor, "timings must be contiguous");
        assert!(timing.end_ms >= timing.start_ms, "timings must not overlap");
        cursor = timing.end_ms;
    }
    assert_eq!(cursor, duration_ms);
    assert_eq!(
        timings.iter().map(Timing::duration_ms).sum::<u64>(),
        duration_ms
    );
}

#[test]
fn test_proportional_split_of_three_scenes() {
    let scenes = vec![
        scene(&"a".repeat(40), "a castle"),
        scene(&"b".repeat(10), "a bridge"),
        scene(&"c".repeat(50), "a dragon"),
    ];

    let expanded = expand_scenes(&scenes, 10_000);

    assert_eq!(expanded.slots.len(), 3);
    let durations: Vec<u64> = expanded.timings.iter().map(Timing::duration_ms).collect();
    assert_eq!(durations, vec![4000, 1000, 5000]);
    assert_eq!(expanded.timings.last().map(|t| t.end_ms), Some(10_000));
}

#[test]
fn test_slot_count_never_below_scene_count() {
    let scenes: Vec<Scene> = (0..8)
        .map(|i| scene(&format!("Scene number {}.", i), "visual"))
        .collect();
    // 8 scenes but only 10 seconds of audio would suggest 2 images.
    let expanded = expand_scenes(&scenes, 10_000);
    assert_eq!(expanded.slots.len(), 8);
    assert_covers(&expanded.timings, 10_000);
}

#[test]
fn test_target_count_rounds_duration() {
    assert_eq!(target_slot_count(3, 10_000), 3);
    assert_eq!(target_slot_count(1, 62_000), 12);
    assert_eq!(target_slot_count(1, 62_600), 13);
    assert_eq!(target_slot_count(0, 1_000), 1);
    assert_eq!(target_slot_count(0, 0), 0);
}

#[test]
fn test_fragments_truncate_when_more_than_target() {
    let scenes = vec![scene("One. Two! Three? Four. Five. Six.", "city")];
    // 10s → 2 slots; six fragments available, first two kept in order.
    let expanded = expand_scenes(&scenes, 10_000);
    let texts: Vec<&str> = expanded.slots.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["One", "Two"]);
}

#[test]
fn test_long_single_scene_cycles_fragments() {
    let scenes = vec![scene(
        "The ocean is deep. Whales sing in the dark.",
        "underwater",
    )];
    let expanded = expand_scenes(&scenes, 30_000);

    assert_eq!(expanded.slots.len(), 6);
    let texts: Vec<&str> = expanded.slots.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "The ocean is deep",
            "Whales sing in the dark",
            "The ocean is deep",
            "Whales sing in the dark",
            "The ocean is deep",
            "Whales sing in the dark",
        ]
    );
    assert!(expanded.slots.iter().all(|s| s.scene_index == 0));
    assert_covers(&expanded.timings, 30_000);
}

#[test]
fn test_fragments_inherit_scene_visuals() {
    let scenes = vec![
        scene("First part. Second part.", "forest"),
        scene("Third part.", "desert"),
    ];
    let expanded = expand_scenes(&scenes, 15_000);
    assert_eq!(expanded.slots.len(), 3);
    assert!(expanded.slots[0].visual_description.ends_with("forest"));
    assert!(expanded.slots[1].visual_description.ends_with("forest"));
    assert!(expanded.slots[2].visual_description.ends_with("desert"));
    assert_eq!(expanded.slots[2].scene_index, 1);
}

#[test]
fn test_camera_angle_wraps_around() {
    let n = CAMERA_ANGLES.len();
    assert_eq!(camera_angle(0), CAMERA_ANGLES[0]);
    assert_eq!(camera_angle(n), CAMERA_ANGLES[0]);
    assert_eq!(camera_angle(n + 1), CAMERA_ANGLES[1]);

    let scenes = vec![scene("Only sentence here.", "mountain")];
    let expanded = expand_scenes(&scenes, 60_000);
    assert_eq!(expanded.slots.len(), 12);
    assert_eq!(
        expanded.slots[n].visual_description,
        format!("{}, mountain", CAMERA_ANGLES[0])
    );
    assert_eq!(
        expanded.slots[n + 1].visual_description,
        format!("{}, mountain", CAMERA_ANGLES[1])
    );
}

#[test]
fn test_expansion_is_deterministic() {
    let scenes = vec![
        scene("Rain falls. Streets shine.", "neon city at night"),
        scene("A cat waits!", "alley"),
    ];
    let first = serde_json::to_vec(&expand_scenes(&scenes, 47_321)).unwrap();
    let second = serde_json::to_vec(&expand_scenes(&scenes, 47_321)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_timings_cover_duration_for_many_inputs() {
    let scenes = vec![
        scene("Alpha beta. Gamma.", "one"),
        scene("Delta epsilon zeta eta theta.", "two"),
        scene("Iota? Kappa! Lambda.", "three"),
    ];
    for duration in [1, 7, 999, 2_500, 10_001, 33_333, 59_999, 120_000] {
        let expanded = expand_scenes(&scenes, duration);
        assert!(expanded.slots.len() >= scenes.len());
        assert_eq!(expanded.slots.len(), expanded.timings.len());
        assert_covers(&expanded.timings, duration);
    }
}

#[test]
fn test_no_fragments_falls_back_to_first_scene_text() {
    let scenes = vec![scene("...", "void"), scene("!!", "abyss")];
    let expanded = expand_scenes(&scenes, 5_000);
    assert_eq!(expanded.slots.len(), 2);
    assert!(expanded.slots.iter().all(|s| s.text == "..."));
    assert_covers(&expanded.timings, 5_000);
}

#[test]
fn test_zero_scenes_yields_single_empty_slot() {
    let expanded = expand_scenes(&[], 4_000);
    assert_eq!(expanded.slots.len(), 1);
    assert_eq!(expanded.slots[0].text, "");
    assert_eq!(expanded.slots[0].visual_description, CAMERA_ANGLES[0]);
    assert_covers(&expanded.timings, 4_000);
}

#[test]
fn test_split_fragments_trims_and_drops_empties() {
    assert_eq!(
        split_fragments("  Hello there.  How are you?!  Fine. "),
        vec!["Hello there", "How are you", "Fine"]
    );
    assert!(split_fragments(" . ! ? ").is_empty());
}
