//! Per-pixel blending.

use crate::core::config::BlendConfig;
use image::Rgb;

/// Integer mix of one channel: `(w * overlay + (100 - w) * base) / 100`.
///
/// `weight` must be at most 100.
#[inline]
pub fn blend_channel(weight: u8, overlay: u8, base: u8) -> u8 {
    let w = u16::from(weight);
    ((w * u16::from(overlay) + (100 - w) * u16::from(base)) / 100) as u8
}

/// Whether a watermark pixel is invisible under `config`.
///
/// `alpha` is `None` for watermarks without an alpha channel.
#[inline]
pub fn is_transparent(overlay: Rgb<u8>, alpha: Option<u8>, config: &BlendConfig) -> bool {
    (config.use_alpha && alpha == Some(0))
        || config
            .transparency_color
            .is_some_and(|color| color.matches(overlay))
}

/// Blend one watermark pixel over one base pixel.
///
/// Transparent watermark pixels leave the base untouched; everything else is
/// mixed channel by channel with the configured weight. Alpha never scales
/// the mix, it only decides transparency.
#[inline]
pub fn blend_pixel(
    base: Rgb<u8>,
    overlay: Rgb<u8>,
    alpha: Option<u8>,
    config: &BlendConfig,
) -> Rgb<u8> {
    if is_transparent(overlay, alpha, config) {
        return base;
    }

    let weight = config.weight.get();
    Rgb([
        blend_channel(weight, overlay[0], base[0]),
        blend_channel(weight, overlay[1], base[1]),
        blend_channel(weight, overlay[2], base[2]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Weight;
    use crate::core::types::Color;
    use proptest::prelude::*;

    fn config(weight: i64) -> BlendConfig {
        BlendConfig::builder(Weight::new(weight).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_half_blend_truncates() {
        // (50 * 255 + 50 * 200) / 100 = 227.5
        assert_eq!(blend_channel(50, 255, 200), 227);
        assert_eq!(
            blend_pixel(Rgb([200, 200, 200]), Rgb([255, 255, 255]), None, &config(50)),
            Rgb([227, 227, 227])
        );
    }

    #[test]
    fn test_alpha_zero_only_matters_when_enabled() {
        let with_alpha = BlendConfig::builder(Weight::MAX).use_alpha(true).build().unwrap();
        let base = Rgb([10, 20, 30]);
        let mark = Rgb([200, 200, 200]);

        assert_eq!(blend_pixel(base, mark, Some(0), &with_alpha), base);
        assert_eq!(blend_pixel(base, mark, Some(1), &with_alpha), mark);
        assert_eq!(blend_pixel(base, mark, Some(0), &config(100)), mark);
    }

    #[test]
    fn test_transparency_color_is_exact() {
        let masked = BlendConfig::builder(Weight::MAX)
            .transparency_color(Some(Color::WHITE))
            .build()
            .unwrap();
        let base = Rgb([1, 2, 3]);

        assert_eq!(blend_pixel(base, Rgb([255, 255, 255]), None, &masked), base);
        assert_eq!(
            blend_pixel(base, Rgb([255, 255, 254]), None, &masked),
            Rgb([255, 255, 254])
        );
    }

    proptest! {
        #[test]
        fn weight_zero_keeps_base(b in any::<[u8; 3]>(), w in any::<[u8; 3]>()) {
            prop_assert_eq!(blend_pixel(Rgb(b), Rgb(w), None, &config(0)), Rgb(b));
        }

        #[test]
        fn weight_hundred_takes_watermark(b in any::<[u8; 3]>(), w in any::<[u8; 3]>()) {
            prop_assert_eq!(blend_pixel(Rgb(b), Rgb(w), None, &config(100)), Rgb(w));
        }

        #[test]
        fn blending_a_pixel_with_itself_is_identity(p in any::<[u8; 3]>(), weight in 0i64..=100) {
            prop_assert_eq!(blend_pixel(Rgb(p), Rgb(p), None, &config(weight)), Rgb(p));
        }

        #[test]
        fn result_stays_between_inputs(b in any::<u8>(), w in any::<u8>(), weight in 0u8..=100) {
            let out = blend_channel(weight, w, b);
            prop_assert!(out >= b.min(w) && out <= b.max(w));
        }

        #[test]
        fn masked_color_shows_base_for_any_weight(
            b in any::<[u8; 3]>(),
            mask in any::<[u8; 3]>(),
            weight in 0i64..=100,
        ) {
            let config = BlendConfig::builder(Weight::new(weight).unwrap())
                .transparency_color(Some(Color::from_rgb(Rgb(mask))))
                .build()
                .unwrap();
            prop_assert_eq!(blend_pixel(Rgb(b), Rgb(mask), None, &config), Rgb(b));
        }

        #[test]
        fn clear_alpha_shows_base_for_any_weight(
            b in any::<[u8; 3]>(),
            w in any::<[u8; 3]>(),
            weight in 0i64..=100,
        ) {
            let config = BlendConfig::builder(Weight::new(weight).unwrap())
                .use_alpha(true)
                .build()
                .unwrap();
            prop_assert_eq!(blend_pixel(Rgb(b), Rgb(w), Some(0), &config), Rgb(b));
        }
    }
}
