//! Handedness assignment
//!
//! The capture is mirrored, so a hand the detector labels "Right" is the
//! signer's anatomical left hand. When two candidates land on the same side
//! (detector noise), the more confident one keeps the primary slot and the
//! other is moved to the opposite side.

use signa_core::{HandDetection, Handedness};

/// Detected hands assigned to anatomical sides
#[derive(Debug, Clone, Copy, Default)]
pub struct HandAssignment<'a> {
    pub left: Option<&'a HandDetection>,
    pub right: Option<&'a HandDetection>,
}

/// Assign each detected hand to the anatomical left or right slot
pub fn assign_hands(hands: &[HandDetection]) -> HandAssignment<'_> {
    let mut left: Option<&HandDetection> = None;
    let mut right: Option<&HandDetection> = None;

    for hand in hands {
        let (primary, other) = match hand.handedness.mirrored() {
            Handedness::Left => (&mut left, &mut right),
            Handedness::Right => (&mut right, &mut left),
        };

        match *primary {
            None => *primary = Some(hand),
            Some(current) if hand.score > current.score => {
                *other = Some(current);
                *primary = Some(hand);
            }
            Some(_) => *other = Some(hand),
        }
    }

    HandAssignment { left, right }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_core::LandmarkSet;

    fn hand(label: Handedness, score: f32) -> HandDetection {
        let rows = vec![[score, 0.0, 0.0]; 21];
        HandDetection {
            handedness: label,
            score,
            landmarks: LandmarkSet::from_rows(&rows),
            world_landmarks: LandmarkSet::from_rows(&rows),
        }
    }

    #[test]
    fn test_mirrored_labels() {
        let hands = vec![hand(Handedness::Right, 0.8), hand(Handedness::Left, 0.7)];
        let assigned = assign_hands(&hands);

        assert_eq!(assigned.left.map(|h| h.score), Some(0.8));
        assert_eq!(assigned.right.map(|h| h.score), Some(0.7));
    }

    #[test]
    fn test_same_label_higher_confidence_wins_primary() {
        // Both carry the mirrored "Right" label, i.e. both claim anatomical left
        let hands = vec![hand(Handedness::Right, 0.6), hand(Handedness::Right, 0.9)];
        let assigned = assign_hands(&hands);

        assert_eq!(assigned.left.map(|h| h.score), Some(0.9));
        assert_eq!(assigned.right.map(|h| h.score), Some(0.6));

        // Order of detection does not matter
        let hands = vec![hand(Handedness::Right, 0.9), hand(Handedness::Right, 0.6)];
        let assigned = assign_hands(&hands);

        assert_eq!(assigned.left.map(|h| h.score), Some(0.9));
        assert_eq!(assigned.right.map(|h| h.score), Some(0.6));
    }

    #[test]
    fn test_same_label_anatomical_right() {
        let hands = vec![hand(Handedness::Left, 0.55), hand(Handedness::Left, 0.95)];
        let assigned = assign_hands(&hands);

        assert_eq!(assigned.right.map(|h| h.score), Some(0.95));
        assert_eq!(assigned.left.map(|h| h.score), Some(0.55));
    }

    #[test]
    fn test_no_hands() {
        let assigned = assign_hands(&[]);
        assert!(assigned.left.is_none());
        assert!(assigned.right.is_none());
    }
}
