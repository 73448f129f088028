use super::*;

#[test]
fn empty_json_yields_defaults() {
    let params: Params = serde_json::from_str("{}").unwrap();
    assert_eq!(params, Params::default());
}

#[test]
fn json_round_trip_preserves_params() {
    let params = Params::preset(Preset::Expressive);
    let json = serde_json::to_string(&params).unwrap();
    let back: Params = serde_json::from_str(&json).unwrap();
    assert_eq!(params, back);
}

#[test]
fn partial_json_overrides_single_field() {
    let params: Params = serde_json::from_str(r#"{"max_seeds": 12}"#).unwrap();
    assert_eq!(params.max_seeds, 12);
    assert_eq!(params.feature_step, Params::default().feature_step);
}

#[test]
fn presets_differ_from_defaults() {
    for preset in Preset::ALL {
        assert_ne!(Params::preset(preset), Params::default());
        assert!(Params::preset(preset).validate().is_ok());
    }
}

#[test]
fn preset_names_round_trip() {
    for preset in Preset::ALL {
        assert_eq!(Preset::from_name(preset.name()).unwrap(), preset);
    }
    assert!(Preset::from_name("wobbly").is_err());
}

#[test]
fn randomize_is_deterministic_and_valid() {
    let a = Params::randomize(99);
    let b = Params::randomize(99);
    assert_eq!(a, b);
    assert!(a.validate().is_ok());
    assert_ne!(a, Params::randomize(100));
}

#[test]
fn validate_rejects_structural_zeroes() {
    let mut params = Params::default();
    params.max_seeds = 0;
    assert!(params.validate().is_err());

    let mut params = Params::default();
    params.feature_step = 0;
    assert!(params.validate().is_err());

    let mut params = Params::default();
    params.tracking_strength = 1.5;
    assert!(params.validate().is_err());
}

#[test]
fn builtin_palettes_resolve() {
    for name in Palette::BUILTIN {
        assert!(Palette::builtin(name).is_ok(), "missing palette {name}");
    }
    assert!(Palette::builtin("sepia").is_err());
}

#[test]
fn palette_map_hits_endpoints_and_interpolates() {
    let palette = Palette::builtin("mono").unwrap();
    assert_eq!(palette.map(0.0), palette.stops[0]);
    assert_eq!(palette.map(255.0), palette.stops[4]);

    // Halfway between stop 0 and stop 1.
    let l = 255.0 / 8.0;
    let expect = palette.stops[0].lerp(palette.stops[1], 0.5);
    let got = palette.map(l);
    assert!((got.r - expect.r).abs() < 0.5);
    assert!((got.g - expect.g).abs() < 0.5);
}

#[test]
fn palette_map_clamps_out_of_range() {
    let palette = Palette::builtin("ember").unwrap();
    assert_eq!(palette.map(-50.0), palette.stops[0]);
    assert_eq!(palette.map(400.0), palette.stops[4]);
}
