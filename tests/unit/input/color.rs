use super::*;
use crate::config::palette::{COLOR_PRESETS, preset_by_label};

#[test]
fn valid_entries_are_canonicalized_and_stored() {
    let mut store = DesignerStore::new();
    let mut input = ColorInput::new();

    for (raw, shown, hex) in [
        ("#ff5733", "#ff5733", "#FF5733"),
        ("ff5733", "#ff5733", "#FF5733"),
        ("  #aBcDeF ", "#aBcDeF", "#ABCDEF"),
        ("000000", "#000000", "#000000"),
    ] {
        let color = input.enter_text(raw, &mut store).unwrap();
        assert_eq!(color.to_hex(), hex);
        assert_eq!(store.state().base_color, color);
        assert!(!input.has_error());
        assert_eq!(input.text(), shown);
    }
}

#[test]
fn invalid_entries_flag_error_and_leave_store_alone() {
    let mut store = DesignerStore::new();
    let mut input = ColorInput::new();

    for raw in ["#ff573", "#ff57333", "gg0000", "#12 456", "##123456", "red"] {
        assert_eq!(input.enter_text(raw, &mut store), None, "{raw}");
        assert!(input.has_error(), "{raw}");
        assert_eq!(input.error_message(), Some(INVALID_HEX_MESSAGE));
    }
    assert_eq!(store.state().base_color, ColorValue::WHITE);
}

#[test]
fn bare_hash_is_not_an_error() {
    let mut store = DesignerStore::new();
    let mut input = ColorInput::new();
    assert_eq!(input.enter_text("#", &mut store), None);
    assert!(!input.has_error());
    assert_eq!(input.enter_text("", &mut store), None);
    assert!(!input.has_error());
    assert_eq!(input.text(), "#");
    assert_eq!(input.enter_text(" 12 ", &mut store), None);
    assert_eq!(input.text(), "#12");
    assert_eq!(input.enter_text("#1", &mut store), None);
    assert!(input.has_error());
}

#[test]
fn preset_selection_clears_field() {
    let mut store = DesignerStore::new();
    let mut input = ColorInput::new();
    input.enter_text("#zz", &mut store);
    assert!(input.has_error());

    let sage = preset_by_label("sage").unwrap();
    input.select_preset(sage, &mut store);
    assert_eq!(input.text(), "");
    assert!(!input.has_error());
    assert_eq!(store.state().base_color.to_hex(), "#87A878");
    assert!(ColorInput::is_selected(sage, &store));
    assert!(!ColorInput::is_selected(&COLOR_PRESETS[0], &store));
}
