//! Property tests for the animation state machine, the shared frame clock and
//! scrolling sprite tiling.

use std::sync::Arc;

use proptest::prelude::*;
use raylib::prelude::{Rectangle, Vector2};

use aberredsprite::components::animation::{AnimationDefinition, LoopKind, SpriteAnimation};
use aberredsprite::components::scrollingsprite::scroll_pieces;
use aberredsprite::resources::animationloop::AnimationLoop;

fn definition(frames: &[u32]) -> Arc<AnimationDefinition> {
    let mut def = AnimationDefinition::new("prop");
    for (i, f) in frames.iter().enumerate() {
        def.add_step(i as u8, *f);
    }
    Arc::new(def)
}

fn loop_kind() -> impl Strategy<Value = LoopKind> {
    prop_oneof![
        Just(LoopKind::None),
        Just(LoopKind::NoneReverse),
        Just(LoopKind::Repeating),
        Just(LoopKind::RepeatingReverse),
        Just(LoopKind::PingPong),
    ]
}

/// Step reached by a ping-pong over `steps` steps after `k` step changes.
fn triangle(k: usize, steps: usize) -> usize {
    if steps < 2 {
        return 0;
    }
    let period = 2 * (steps - 1);
    let m = k % period;
    if m < steps { m } else { period - m }
}

proptest! {
    #[test]
    fn split_updates_match_one_update(
        frames in prop::collection::vec(1u32..5, 1..8),
        kind in loop_kind(),
        period in 1u32..100,
        chunks in prop::collection::vec(0u32..400, 1..12),
    ) {
        let def = definition(&frames);
        let period = period as f64;
        let total: u32 = chunks.iter().sum();

        let mut whole = SpriteAnimation::new(def.clone(), kind);
        whole.update(total as f64, period);

        let mut split = SpriteAnimation::new(def, kind);
        for chunk in &chunks {
            split.update(*chunk as f64, period);
        }

        prop_assert_eq!(whole.step_index(), split.step_index());
        prop_assert_eq!(whole.frame_index(), split.frame_index());
        prop_assert_eq!(whole.milliseconds_passed(), split.milliseconds_passed());
        prop_assert_eq!(whole.is_reversed(), split.is_reversed());
    }

    #[test]
    fn animation_loop_pushes_are_additive(
        frame_rate in prop::sample::select(vec![1u32, 2, 4, 5, 8, 10, 20, 25, 40, 50]),
        chunks in prop::collection::vec(0u32..300, 1..12),
    ) {
        let total: u32 = chunks.iter().sum();
        let mut split = AnimationLoop::new(frame_rate);
        let pushed: u32 = chunks.iter().map(|c| split.consume(*c as f64)).sum();

        let mut whole = AnimationLoop::new(frame_rate);
        prop_assert_eq!(whole.consume(total as f64), pushed);
        prop_assert_eq!(whole.accumulated_milliseconds(), split.accumulated_milliseconds());
    }

    #[test]
    fn ping_pong_bounces_between_the_ends(
        steps in 1usize..8,
        frames in 1u32..4,
        bounces in 0usize..40,
    ) {
        let def = definition(&vec![frames; steps]);
        let mut anim = SpriteAnimation::new(def, LoopKind::PingPong);
        for k in 1..=bounces {
            for _ in 0..frames {
                prop_assert!(!anim.try_next_frame());
            }
            prop_assert_eq!(anim.step_index(), triangle(k, steps));
        }
    }

    #[test]
    fn non_looping_ends_after_exactly_total_frames(
        frames in prop::collection::vec(1u32..5, 1..8),
        reverse in any::<bool>(),
    ) {
        let kind = if reverse { LoopKind::NoneReverse } else { LoopKind::None };
        let def = definition(&frames);
        let total = def.total_frames();
        let mut anim = SpriteAnimation::new(def, kind);
        for _ in 1..total {
            prop_assert!(!anim.try_next_frame());
        }
        prop_assert!(anim.try_next_frame());
        let last = if reverse { 0 } else { frames.len() - 1 };
        prop_assert_eq!(anim.step_index(), last);
        prop_assert_eq!(anim.current_sprite_index(), Some(last as u8));
    }

    #[test]
    fn percentage_lands_on_the_frame_below(
        frames in prop::collection::vec(1u32..6, 1..8),
        amount in 0.0f32..=1.0,
    ) {
        let def = definition(&frames);
        let total = def.total_frames() as f32;
        let mut anim = SpriteAnimation::new(def, LoopKind::Repeating);
        anim.set_percentage_complete(amount);
        let reached = anim.percentage_complete();
        prop_assert!(reached <= amount + 1e-6);
        prop_assert!(amount - reached <= 1.0 / total + 1e-6);
        prop_assert!(anim.frame_index() < frames[anim.step_index()]);
    }

    #[test]
    fn scroll_pieces_tile_the_sprite(
        x in 0u32..8,
        y in 0u32..8,
        w in 1u32..64,
        h in 1u32..64,
        ox in -1000.0f32..1000.0,
        oy in -1000.0f32..1000.0,
    ) {
        let sprite = Rectangle {
            x: (x * 64) as f32,
            y: (y * 64) as f32,
            width: w as f32,
            height: h as f32,
        };
        let pieces = scroll_pieces(sprite, Vector2 { x: ox, y: oy });
        prop_assert!(!pieces.is_empty() && pieces.len() <= 4);

        let eps = 1e-3;
        let mut area = 0.0;
        for piece in &pieces {
            let s = piece.source;
            prop_assert!(s.width > 0.0 && s.height > 0.0);
            prop_assert!(s.x >= sprite.x - eps && s.x + s.width <= sprite.x + sprite.width + eps);
            prop_assert!(s.y >= sprite.y - eps && s.y + s.height <= sprite.y + sprite.height + eps);
            prop_assert!(piece.offset.x >= -eps && piece.offset.x + s.width <= sprite.width + eps);
            prop_assert!(
                piece.offset.y >= -eps && piece.offset.y + s.height <= sprite.height + eps
            );
            area += s.width * s.height;
        }
        let expected = sprite.width * sprite.height;
        prop_assert!((area - expected).abs() <= expected * 1e-3);
    }
}
