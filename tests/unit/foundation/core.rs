use super::*;

#[test]
fn parse_hex_accepts_and_canonicalizes() {
    for (input, want) in [
        ("#ffffff", "#FFFFFF"),
        ("#1a1A2e", "#1A1A2E"),
        ("#E63946", "#E63946"),
        ("#000000", "#000000"),
    ] {
        let c = ColorValue::parse_hex(input).unwrap();
        assert_eq!(c.to_hex(), want);
        assert_eq!(c.to_string(), want);
    }
}

#[test]
fn parse_hex_rejects_everything_else() {
    for input in [
        "", "#", "ffffff", "#fff", "#fffffff", "#GGGGGG", " #ffffff", "#ffffff ", "#ff ff f",
        "##fffff", "#+12345",
    ] {
        let err = ColorValue::parse_hex(input).unwrap_err();
        assert_eq!(err.input, input);
    }
}

#[test]
fn luma_threshold_matches_perceived_brightness() {
    assert!(ColorValue::rgb(0x1A, 0x1A, 0x1A).is_dark());
    assert!(ColorValue::rgb(0x1A, 0x1A, 0x2E).is_dark());
    assert!(!ColorValue::WHITE.is_dark());
    assert!(!ColorValue::rgb(0x87, 0xCE, 0xEB).is_dark());
    // 0.299*128 + 0.587*128 + 0.114*128 == 128, which is not dark.
    assert!(!ColorValue::rgb(128, 128, 128).is_dark());
    assert!(ColorValue::rgb(127, 127, 127).is_dark());
}

#[test]
fn color_serde_uses_hex_strings() {
    let json = serde_json::to_string(&ColorValue::rgb(0xE6, 0x39, 0x46)).unwrap();
    assert_eq!(json, "\"#E63946\"");
    let back: ColorValue = serde_json::from_str("\"#e63946\"").unwrap();
    assert_eq!(back, ColorValue::rgb(0xE6, 0x39, 0x46));
    assert!(serde_json::from_str::<ColorValue>("\"red\"").is_err());
}

#[test]
fn panel_parses_and_defaults_to_front() {
    assert_eq!(Panel::default(), Panel::Front);
    assert_eq!("BACK".parse::<Panel>().unwrap(), Panel::Back);
    assert_eq!(" front ".parse::<Panel>().unwrap(), Panel::Front);
    assert!("side".parse::<Panel>().is_err());
    assert_eq!(serde_json::to_string(&Panel::Back).unwrap(), "\"back\"");
}

#[test]
fn premul_from_straight_rounds() {
    let p = Rgba8Premul::from_straight_rgba(255, 255, 255, 8);
    assert_eq!(p.to_array(), [8, 8, 8, 8]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
