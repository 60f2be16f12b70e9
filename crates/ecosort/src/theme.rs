//! Palette of the product surface.
//!
//! Data-carrying enums in the core crate tag themselves with hex colors;
//! [`tone_color`] and [`kind_color`] resolve those tags so the table stays in
//! one place. Everything else here is chrome.

use bevy::prelude::*;
use ecosort_core::Tone;
use ecosort_core::disposal::PointKind;

pub const BRAND: Color = Color::srgb(0.298, 0.686, 0.314);
pub const BRAND_DARK: Color = Color::srgb(0.271, 0.627, 0.286);
pub const BRAND_PRESSED: Color = Color::srgb(0.22, 0.557, 0.235);
/// Pale green wash behind positive highlights.
pub const BRAND_TINT: Color = Color::srgb(0.91, 0.961, 0.914);

pub const SCREEN_BG: Color = Color::srgb(0.961, 0.961, 0.961);
pub const CARD_BG: Color = Color::WHITE;
pub const HAIRLINE: Color = Color::srgb(0.878, 0.878, 0.878);

pub const TEXT_PRIMARY: Color = Color::srgb(0.2, 0.2, 0.2);
pub const TEXT_SECONDARY: Color = Color::srgb(0.4, 0.4, 0.4);
pub const TEXT_FAINT: Color = Color::srgb(0.6, 0.6, 0.6);

pub const KAKAO: Color = Color::srgb(0.996, 0.898, 0.0);
pub const NAVER: Color = Color::srgb(0.012, 0.78, 0.353);

pub const ALERT: Color = Color::srgb(1.0, 0.341, 0.133);
pub const STAR_GOLD: Color = Color::srgb(1.0, 0.843, 0.0);
/// Warm wash behind tip lines.
pub const TIP_BG: Color = Color::srgb(1.0, 0.953, 0.878);

pub const BACKDROP: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);

/// Accent color of a schedule entry.
pub fn tone_color(tone: Tone) -> Color {
    hex(tone.hex())
}

/// Marker color of a disposal point.
pub fn kind_color(kind: PointKind) -> Color {
    hex(kind.hex())
}

fn hex(tag: &str) -> Color {
    Srgba::hex(tag).map(Color::from).unwrap_or(Color::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_palette_tag_parses() {
        // White is the parse-failure fallback; no tag may hit it.
        for kind in PointKind::iter() {
            assert_ne!(kind_color(kind), Color::WHITE, "{kind:?}");
        }
        for tone in [Tone::Muted, Tone::Trash, Tone::Recycle, Tone::Paper, Tone::Bulky] {
            assert_ne!(tone_color(tone), Color::WHITE, "{tone:?}");
        }
    }

    #[test]
    fn recycle_tone_matches_the_brand_green() {
        let Color::Srgba(srgba) = tone_color(Tone::Recycle) else {
            panic!("hex parses to srgba");
        };
        assert!((srgba.red - 0.298).abs() < 0.01);
        assert!((srgba.green - 0.686).abs() < 0.01);
        assert!((srgba.blue - 0.314).abs() < 0.01);
    }
}
