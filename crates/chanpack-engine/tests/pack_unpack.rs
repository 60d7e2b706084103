//! Packing and unpacking through the public API.
//!
//! Covers template round trips, default fills, resolution normalization
//! against a reference resize, and alpha plane handling.

use std::collections::HashMap;

use chanpack_engine::{
    pack_channels, pack_channels_with, pack_texture_from_template, pack_texture_from_template_with,
    unpack_texture, ChannelArray, ChannelSource, EngineError, PackOptions, PlaneChannels,
    PlaneLayout,
};
use chanpack_template::{builtin, ChannelDescriptor, ChannelRegistry, PackingTemplate, Plane};

fn registry() -> ChannelRegistry {
    ChannelRegistry::builtin()
}

/// A plane with a different value at nearly every pixel.
fn pattern(width: u32, height: u32, seed: u32) -> ChannelArray {
    let mut array = ChannelArray::filled(width, height, 0);
    for y in 0..height {
        for x in 0..width {
            array.set(x, y, ((x * 31 + y * 17 + seed * 7) % 256) as u8);
        }
    }
    array
}

fn named(entries: Vec<(&str, ChannelArray)>) -> HashMap<String, ChannelSource> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), ChannelSource::from(v)))
        .collect()
}

/// Bilinear resize in f64, sampling at pixel centers with edge clamping.
fn reference_resize(src: &ChannelArray, width: u32, height: u32) -> ChannelArray {
    let coord = |d: u32, s: u32, n: u32| -> f64 {
        ((d as f64 + 0.5) * s as f64 / n as f64 - 0.5).clamp(0.0, (s - 1) as f64)
    };
    let mut out = ChannelArray::filled(width, height, 0);
    for y in 0..height {
        let sy = coord(y, src.height, height);
        let y0 = sy.floor() as u32;
        let y1 = (y0 + 1).min(src.height - 1);
        let fy = sy - y0 as f64;
        for x in 0..width {
            let sx = coord(x, src.width, width);
            let x0 = sx.floor() as u32;
            let x1 = (x0 + 1).min(src.width - 1);
            let fx = sx - x0 as f64;
            let p = |x: u32, y: u32| src.get(x, y) as f64;
            let top = p(x0, y0) * (1.0 - fx) + p(x1, y0) * fx;
            let bottom = p(x0, y1) * (1.0 - fx) + p(x1, y1) * fx;
            out.set(x, y, (top * (1.0 - fy) + bottom * fy).round() as u8);
        }
    }
    out
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_orm_round_trip_recovers_inputs() {
    let orm = builtin::orm(&registry()).unwrap();
    let ao = pattern(32, 16, 1);
    let rough = pattern(32, 16, 2);
    let metal = pattern(32, 16, 3);

    let packed = pack_texture_from_template(
        named(vec![
            ("ambient_occlusion", ao.clone()),
            ("roughness", rough.clone()),
            ("metallic", metal.clone()),
        ]),
        &orm,
    )
    .unwrap();
    assert_eq!(packed.dimensions(), (32, 16));
    assert_eq!(packed.layout, PlaneLayout::Rgb);

    let maps = unpack_texture(&packed, &orm).unwrap();
    assert_eq!(maps.get("ambient_occlusion"), Some(&ao));
    assert_eq!(maps.get("roughness"), Some(&rough));
    assert_eq!(maps.get("metallic"), Some(&metal));
    assert!(maps.auto_alpha.is_none());
}

#[test]
fn test_ord_round_trip_with_default_fill() {
    let ord = builtin::ord(&registry()).unwrap();
    let rough = pattern(8, 8, 5);

    let packed =
        pack_texture_from_template(named(vec![("G", rough.clone())]), &ord).unwrap();
    let maps = unpack_texture(&packed, &ord).unwrap().into_map();

    assert_eq!(maps.len(), 3);
    assert_eq!(maps["roughness"], rough);
    assert_eq!(maps["ambient_occlusion"], ChannelArray::filled(8, 8, 255));
    assert_eq!(maps["displacement"], ChannelArray::filled(8, 8, 128));
}

#[test]
fn test_custom_rgba_template_round_trip() {
    let template = PackingTemplate::builder("MRHA")
        .description("Metallic, roughness, height, alpha")
        .channel(Plane::R, ChannelDescriptor::new("metallic", 0.0).unwrap())
        .channel(Plane::G, ChannelDescriptor::new("roughness", 0.5).unwrap())
        .channel(Plane::B, ChannelDescriptor::new("height", 0.5).unwrap())
        .channel(Plane::A, ChannelDescriptor::new("opacity", 1.0).unwrap())
        .build()
        .unwrap();
    let inputs: Vec<(&str, ChannelArray)> = vec![
        ("metallic", pattern(6, 4, 1)),
        ("roughness", pattern(6, 4, 2)),
        ("height", pattern(6, 4, 3)),
        ("opacity", pattern(6, 4, 4)),
    ];

    let packed = pack_texture_from_template(named(inputs.clone()), &template).unwrap();
    assert_eq!(packed.layout, PlaneLayout::Rgba);

    let maps = unpack_texture(&packed, &template).unwrap();
    for (name, expected) in &inputs {
        assert_eq!(maps.get(name), Some(expected), "{} mismatch", name);
    }
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_orm_with_no_sources_is_default_fill() {
    let orm = builtin::orm(&registry()).unwrap();
    let options = PackOptions {
        fallback_size: Some((16, 16)),
        ..PackOptions::default()
    };
    let packed = pack_texture_from_template_with(HashMap::new(), &orm, &options).unwrap();

    assert_eq!(packed.dimensions(), (16, 16));
    assert_eq!(packed.layout, PlaneLayout::Rgb);
    for y in 0..16 {
        for x in 0..16 {
            assert_eq!(packed.pixel(x, y), &[255, 128, 0]);
        }
    }
}

#[test]
fn test_primitive_zero_fills_instead_of_template_defaults() {
    let a = ChannelArray::new(2, 2, vec![255, 255, 255, 255]).unwrap();
    let b = ChannelArray::new(2, 2, vec![0, 0, 0, 0]).unwrap();

    let packed = pack_channels(Some(a), Some(b), None, None).unwrap();
    assert_eq!(packed.dimensions(), (2, 2));
    assert_eq!(packed.layout, PlaneLayout::Rgb);
    assert_eq!(packed.pixel(0, 0), &[255, 0, 0]);
}

// ============================================================================
// Resolution normalization
// ============================================================================

#[test]
fn test_mixed_resolutions_normalize_to_largest() {
    let mut r = ChannelArray::filled(256, 256, 0);
    for y in 0..256 {
        for x in 0..256 {
            r.set(x, y, x as u8);
        }
    }
    let mut g = ChannelArray::filled(512, 512, 0);
    for y in 0..512 {
        for x in 0..512 {
            g.set(x, y, (y / 2) as u8);
        }
    }
    let b = pattern(1024, 1024, 9);

    let packed = pack_channels(Some(r.clone()), Some(g.clone()), Some(b.clone()), None).unwrap();
    assert_eq!(packed.dimensions(), (1024, 1024));

    let expected_r = reference_resize(&r, 1024, 1024);
    let expected_g = reference_resize(&g, 1024, 1024);
    for y in 0..1024 {
        for x in 0..1024 {
            let px = packed.pixel(x, y);
            assert_eq!(px[0], expected_r.get(x, y), "R at ({}, {})", x, y);
            assert_eq!(px[1], expected_g.get(x, y), "G at ({}, {})", x, y);
            assert_eq!(px[2], b.get(x, y), "B at ({}, {})", x, y);
        }
    }

    // A 4x upscale of a ramp samples at x / 4 - 0.375.
    assert_eq!(packed.pixel(3, 0)[0], 0);
    assert_eq!(packed.pixel(4, 0)[0], 1);
    assert_eq!(packed.pixel(513, 0)[0], 128);
    assert_eq!(packed.pixel(1023, 0)[0], 255);
}

#[test]
fn test_strict_policy_rejects_mixed_resolutions() {
    let orm = builtin::orm(&registry()).unwrap();
    let err = pack_texture_from_template_with(
        named(vec![
            ("roughness", pattern(64, 64, 1)),
            ("metallic", pattern(32, 32, 2)),
        ]),
        &orm,
        &PackOptions::strict(),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::ResolutionMismatch { .. }), "{}", err);

    let channels = PlaneChannels::new(Some(pattern(4, 4, 0)), None, Some(pattern(4, 4, 1)));
    assert!(pack_channels_with(channels, &PackOptions::strict()).is_ok());
}

// ============================================================================
// Alpha handling
// ============================================================================

#[test]
fn test_rgba_with_rgb_template_returns_alpha_entry() {
    let orm = builtin::orm(&registry()).unwrap();
    let alpha = pattern(4, 4, 8);
    let packed = pack_channels(
        Some(pattern(4, 4, 1)),
        Some(pattern(4, 4, 2)),
        Some(pattern(4, 4, 3)),
        Some(alpha.clone()),
    )
    .unwrap();

    let maps = unpack_texture(&packed, &orm).unwrap();
    assert_eq!(maps.len(), 4);
    assert_eq!(maps.auto_alpha.as_ref(), Some(&alpha));

    let map = maps.into_map();
    assert_eq!(map.len(), 4);
    assert_eq!(map["alpha"], alpha);
}

#[test]
fn test_alpha_template_on_rgb_image_fails() {
    let template = PackingTemplate::builder("RA")
        .channel(Plane::R, ChannelDescriptor::new("roughness", 0.5).unwrap())
        .channel(Plane::A, ChannelDescriptor::new("opacity", 1.0).unwrap())
        .build()
        .unwrap();
    let rgb = pack_channels(Some(pattern(4, 4, 1)), None, None, None).unwrap();

    let err = unpack_texture(&rgb, &template).unwrap_err();
    assert!(matches!(err, EngineError::MissingAlpha { .. }), "{}", err);
}
