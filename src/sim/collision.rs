//! Collision detection
//!
//! Plain AABB overlap. Touching edges are not a hit, so an avatar can slide
//! flush along a block without dying.

use super::rect::Rect;
use super::state::{Avatar, Block, Enemy};

/// What the avatar ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collider {
    Enemy,
    /// Index into `GameState::blocks`
    Block(usize),
}

/// Strict overlap test; shared edges do not count
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// First thing the avatar is touching, enemy checked before blocks
pub fn find_collision(avatar: &Avatar, enemy: &Enemy, blocks: &[Block]) -> Option<Collider> {
    if overlaps(&avatar.rect, &enemy.rect) {
        return Some(Collider::Enemy);
    }
    blocks
        .iter()
        .position(|block| overlaps(&avatar.rect, &block.rect))
        .map(Collider::Block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.5f32..200.0, 0.5f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(overlaps(&a, &Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!overlaps(&a, &Rect::new(30.0, 0.0, 20.0, 20.0)));
        // Containment
        assert!(overlaps(&a, &Rect::new(5.0, 5.0, 2.0, 2.0)));
    }

    #[test]
    fn test_shared_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(!overlaps(&a, &Rect::new(20.0, 0.0, 20.0, 20.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, 20.0, 20.0, 20.0)));
        assert!(!overlaps(&a, &Rect::new(-20.0, -20.0, 20.0, 20.0)));
    }

    #[test]
    fn test_find_collision_prefers_enemy_and_first_block() {
        let avatar = Avatar::at(Rect::new(100.0, 100.0, 20.0, 20.0));
        let enemy = Enemy::at(Rect::new(110.0, 110.0, 20.0, 20.0));
        let blocks = vec![
            Block::at(Rect::new(400.0, 0.0, 50.0, 20.0)),
            Block::at(Rect::new(90.0, 95.0, 50.0, 20.0)),
            Block::at(Rect::new(95.0, 100.0, 50.0, 20.0)),
        ];
        assert_eq!(find_collision(&avatar, &enemy, &blocks), Some(Collider::Enemy));

        let enemy = Enemy::at(Rect::new(600.0, 300.0, 20.0, 20.0));
        assert_eq!(find_collision(&avatar, &enemy, &blocks), Some(Collider::Block(1)));
        assert_eq!(find_collision(&avatar, &enemy, &blocks[..1]), None);
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_overlap_reflexive(a in rect_strategy()) {
            prop_assert!(overlaps(&a, &a));
        }

        #[test]
        fn prop_abutting_rects_never_overlap(a in rect_strategy(), h in 0.5f32..200.0, w in 0.5f32..200.0) {
            let right = Rect::new(a.x + a.width, a.y, w, h);
            let below = Rect::new(a.x, a.y + a.height, w, h);
            prop_assert!(!overlaps(&a, &right));
            prop_assert!(!overlaps(&a, &below));
        }
    }
}
