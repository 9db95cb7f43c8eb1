use audioviz_web::core::input::{action_for_key, KeyAction};
use audioviz_web::core::{VariantKind, VizError};

#[test]
fn transport_keys() {
    assert_eq!(action_for_key(" "), Some(KeyAction::TogglePlay));
    assert_eq!(action_for_key("k"), Some(KeyAction::TogglePlay));
    assert_eq!(action_for_key("ArrowLeft"), Some(KeyAction::Seek(-1.0)));
    assert_eq!(action_for_key("ArrowRight"), Some(KeyAction::Seek(1.0)));
    assert_eq!(action_for_key("ArrowUp"), Some(KeyAction::Volume(1.0)));
    assert_eq!(action_for_key("ArrowDown"), Some(KeyAction::Volume(-1.0)));
    assert_eq!(action_for_key("h"), Some(KeyAction::ToggleOverlay));
    assert_eq!(action_for_key("Enter"), Some(KeyAction::Fullscreen));
    assert_eq!(action_for_key("x"), None);
}

#[test]
fn digits_select_variants_in_order() {
    for (i, kind) in VariantKind::ALL.iter().enumerate() {
        let key = (i + 1).to_string();
        assert_eq!(action_for_key(&key), Some(KeyAction::SelectVariant(*kind)));
    }
    assert_eq!(action_for_key("0"), None);
    assert_eq!(action_for_key("8"), None);
}

#[test]
fn variant_names_round_trip_through_display() {
    for kind in VariantKind::ALL {
        assert_eq!(kind.to_string().parse::<VariantKind>(), Ok(kind));
    }
    assert_eq!(VariantKind::from_name(" Crystal "), Ok(VariantKind::Crystal));
    assert_eq!(
        "plasma".parse::<VariantKind>(),
        Err(VizError::UnknownVariant("plasma".into()))
    );
}

#[test]
fn default_variant_is_orbit() {
    assert_eq!(VariantKind::default(), VariantKind::Orbit);
}

#[test]
fn pending_variant_is_shared_and_taken_once() {
    use audioviz_web::core::input::PendingVariant;

    let frame_side = PendingVariant::default();
    let key_side = frame_side.clone();
    assert_eq!(frame_side.take(), None);

    key_side.request(VariantKind::Nebula);
    key_side.request(VariantKind::Crystal);
    assert_eq!(frame_side.take(), Some(VariantKind::Crystal));
    assert_eq!(frame_side.take(), None);
}
