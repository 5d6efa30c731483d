use super::*;

fn tokens(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

fn playing_info() -> PlayerInfo {
    PlayerInfo {
        name: "playerctld".to_string(),
        status: PlaybackStatus::Playing,
        artist: Some("Radiohead".to_string()),
        album: Some("OK Computer".to_string()),
        title: Some("Karma Police".to_string()),
        length: None,
        position: None,
    }
}

#[test]
fn substitute_replaces_tokens() {
    let out = substitute(
        "{player} ({status}): {title}",
        &tokens(&[("player", "mpv"), ("status", "paused"), ("title", "Song")]),
    )
    .unwrap();
    assert_eq!(out, "mpv (paused): Song");
}

#[test]
fn substitute_handles_brace_escapes() {
    let out = substitute("{{{status}}}", &tokens(&[("status", "playing")])).unwrap();
    assert_eq!(out, "{playing}");
}

#[test]
fn substitute_rejects_unknown_tokens() {
    assert_eq!(
        substitute("{nope}", &tokens(&[("status", "x")])),
        Err(TemplateError::UnknownToken("nope".to_string()))
    );
}

#[test]
fn substitute_rejects_malformed_templates() {
    assert_eq!(
        substitute("{status", &tokens(&[("status", "x")])),
        Err(TemplateError::UnclosedToken)
    );
    assert_eq!(
        substitute("status}", &tokens(&[])),
        Err(TemplateError::StrayBrace)
    );
}

#[test]
fn icon_falls_back_to_default_then_empty() {
    let table = HashMap::from([
        ("spotify".to_string(), "S".to_string()),
        ("default".to_string(), "D".to_string()),
    ]);
    assert_eq!(icon(&table, "spotify"), "S");
    assert_eq!(icon(&table, "mpv"), "D");
    assert_eq!(icon(&HashMap::new(), "mpv"), "");
}

#[test]
fn renders_default_format_end_to_end() {
    let mut renderer = Renderer::new(Settings::default());
    let frame = renderer.render(&playing_info());
    assert_eq!(
        frame.label,
        "playerctld (playing): Radiohead - OK Computer - Karma Police"
    );
    assert_eq!(
        frame.tooltip,
        "playerctld (playing): Radiohead - OK Computer - Karma Police"
    );
}

#[test]
fn per_status_templates_override_the_default() {
    let settings = Settings {
        format_paused: "paused: {title}".to_string(),
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);

    let frame = renderer.render(&playing_info());
    assert!(frame.label.starts_with("playerctld (playing)"));

    let mut paused = playing_info();
    paused.status = PlaybackStatus::Paused;
    let frame = renderer.render(&paused);
    assert_eq!(frame.label, "paused: Karma Police");
}

#[test]
fn length_token_is_hour_truncated_in_labels() {
    let settings = Settings {
        format: "{length}".to_string(),
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);
    let mut info = playing_info();
    info.length = Some("00:03:45".to_string());
    assert_eq!(renderer.render(&info).label, "03:45");
}

#[test]
fn tooltip_prefers_full_time_forms() {
    let settings = Settings {
        tooltip_format: "{position} {length}".to_string(),
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);
    let mut info = playing_info();
    info.length = Some("00:04:24".to_string());
    info.position = Some("00:00:30".to_string());
    assert_eq!(renderer.render(&info).tooltip, "00:00:30 00:04:24");
}

#[test]
fn tooltip_keeps_compact_times_when_limits_enabled() {
    let settings = Settings {
        tooltip_format: "{length}".to_string(),
        enable_tooltip_len_limits: true,
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);
    let mut info = playing_info();
    info.length = Some("00:04:24".to_string());
    assert_eq!(renderer.render(&info).tooltip, "04:24");
}

#[test]
fn tooltip_keeps_long_times_as_is() {
    let settings = Settings {
        tooltip_format: "{length}".to_string(),
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);
    let mut info = playing_info();
    // Nonzero hours: the compact form is no shorter, so it is used directly.
    info.length = Some("01:02:03".to_string());
    assert_eq!(renderer.render(&info).tooltip, "01:02:03");
}

#[test]
fn tooltip_limits_flag_truncates_metadata_fields() {
    let settings = Settings {
        tooltip_format: "{artist}".to_string(),
        artist_len: 4,
        enable_tooltip_len_limits: true,
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);
    assert_eq!(renderer.render(&playing_info()).tooltip, "Rad…");
}

#[test]
fn tooltip_unlimited_by_default() {
    let settings = Settings {
        tooltip_format: "{artist}".to_string(),
        artist_len: 4,
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);
    assert_eq!(renderer.render(&playing_info()).tooltip, "Radiohead");
}

#[test]
fn icon_tokens_resolve_from_the_tables() {
    let settings = Settings {
        format: "{player_icon}{status_icon}".to_string(),
        player_icons: HashMap::from([("default".to_string(), "P".to_string())]),
        status_icons: HashMap::from([("playing".to_string(), "▶".to_string())]),
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);
    assert_eq!(renderer.render(&playing_info()).label, "P▶");
}

#[test]
fn failed_template_retains_previous_text_per_target() {
    let settings = Settings {
        format_paused: "{bogus}".to_string(),
        ..Settings::default()
    };
    let mut renderer = Renderer::new(settings);

    let first = renderer.render(&playing_info());
    assert!(!first.label.is_empty());

    let mut paused = playing_info();
    paused.status = PlaybackStatus::Paused;
    let second = renderer.render(&paused);
    // The label falls back to the previous cycle; the tooltip still renders.
    assert_eq!(second.label, first.label);
    assert_eq!(
        second.tooltip,
        "playerctld (paused): Radiohead - OK Computer - Karma Police"
    );
}

#[test]
fn style_tags_diff_against_previous_cycle() {
    let mut renderer = Renderer::new(Settings::default());

    let first = renderer.render(&playing_info());
    assert!(first.remove_classes.is_empty());
    assert_eq!(first.add_classes, vec!["playing", "playerctld"]);

    let mut paused = playing_info();
    paused.status = PlaybackStatus::Paused;
    let second = renderer.render(&paused);
    assert_eq!(second.remove_classes, vec!["playing", "playerctld"]);
    assert_eq!(second.add_classes, vec!["paused", "playerctld"]);
}
