//! Painting of the card stack: the transformed front card and the static
//! cards stacked behind it.

use client_core::{
    card::{CardPresentation, ExplanationView, MatchTier},
    gesture::{DragFeedback, SwipeHint},
};
use eframe::egui::{
    self, emath::Rot2, epaint::TextShape, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2,
};

pub const CARD_SIZE: Vec2 = Vec2::new(380.0, 500.0);
pub const ACTION_STRIP_HEIGHT: f32 = 64.0;
const CONTENT_PADDING: f32 = 20.0;
const STACK_STEP: f32 = 10.0;

/// Placement of the front card derived from the current drag feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub center: Pos2,
    pub rotation: Rot2,
    pub opacity: f32,
}

impl CardTransform {
    pub fn from_feedback(rest: Rect, feedback: &DragFeedback) -> Self {
        Self {
            center: rest.center() + Vec2::new(feedback.offset.x, feedback.offset.y),
            rotation: Rot2::from_angle(feedback.rotation_deg.to_radians()),
            opacity: feedback.fade.clamp(0.0, 1.0),
        }
    }

    /// Maps a point given relative to the card center into screen space.
    pub fn apply(&self, local: Vec2) -> Pos2 {
        self.center + self.rotation * local
    }

    pub fn corners(&self, size: Vec2) -> Vec<Pos2> {
        let half = size / 2.0;
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .into_iter()
        .map(|corner| self.apply(corner))
        .collect()
    }
}

/// Area at the bottom of the resting card that holds the decision buttons.
pub fn action_strip(rest: Rect) -> Rect {
    Rect::from_min_max(
        Pos2::new(rest.left(), rest.bottom() - ACTION_STRIP_HEIGHT),
        rest.max,
    )
}

pub fn tier_color(tier: MatchTier) -> Color32 {
    match tier {
        MatchTier::High => Color32::from_rgb(46, 160, 67),
        MatchTier::Medium => Color32::from_rgb(210, 153, 34),
        MatchTier::Low => Color32::from_rgb(150, 150, 150),
    }
}

pub fn paint_stack(painter: &egui::Painter, rest: Rect, behind: usize, fill: Color32) {
    for depth in (1..=behind).rev() {
        let depth = depth as f32;
        let rect = rest
            .translate(Vec2::new(0.0, STACK_STEP * depth))
            .shrink2(Vec2::new(STACK_STEP * depth, 0.0));
        painter.rect_filled(
            rect,
            egui::CornerRadius::same(14),
            fill.gamma_multiply(1.0 - 0.2 * depth),
        );
    }
}

pub struct FrontCard<'a> {
    pub card: &'a CardPresentation,
    pub explanation: Option<&'a ExplanationView>,
    pub feedback: DragFeedback,
}

impl FrontCard<'_> {
    pub fn paint(&self, painter: &egui::Painter, rest: Rect, fill: Color32, text: Color32) {
        let transform = CardTransform::from_feedback(rest, &self.feedback);
        let fill = fill.gamma_multiply(transform.opacity);
        let text = text.gamma_multiply(transform.opacity);
        painter.add(Shape::convex_polygon(
            transform.corners(rest.size()),
            fill,
            Stroke::new(1.0, text.gamma_multiply(0.25)),
        ));

        let wrap = rest.width() - CONTENT_PADDING * 2.0;
        let top_left = Vec2::new(-rest.width() / 2.0 + CONTENT_PADDING, -rest.height() / 2.0);
        let mut cursor = top_left + Vec2::new(0.0, CONTENT_PADDING);
        let mut line = |content: String, size: f32, color: Color32, gap: f32| {
            let galley = painter.layout(content, FontId::proportional(size), color, wrap);
            let height = galley.size().y;
            painter.add(
                TextShape::new(transform.apply(cursor), galley, color)
                    .with_angle(transform.rotation.angle()),
            );
            cursor.y += height + gap;
        };

        let card = self.card;
        line(format!("{}  {}", card.logo, card.title), 24.0, text, 4.0);
        line(card.company.clone(), 18.0, text.gamma_multiply(0.85), 6.0);
        line(
            format!("📍 {}   🎯 {}", card.location, card.seniority),
            14.0,
            text.gamma_multiply(0.7),
            10.0,
        );
        line(
            format!("{} {}", card.tier.icon(), card.score_label()),
            18.0,
            tier_color(card.tier).gamma_multiply(transform.opacity),
            4.0,
        );
        if !card.skills.is_empty() {
            line(card.skills.join("  ·  "), 14.0, text, 10.0);
        }
        line(card.description.clone(), 14.0, text.gamma_multiply(0.8), 10.0);
        match self.explanation {
            Some(explanation) => {
                line(
                    format!("{}: {}", card.tier.title(), explanation.reason),
                    13.0,
                    text,
                    4.0,
                );
                if !explanation.missing_skills.is_empty() {
                    line(
                        format!("Missing: {}", explanation.missing_skills.join(", ")),
                        13.0,
                        text.gamma_multiply(0.7),
                        4.0,
                    );
                }
                if let Some(tip) = &explanation.career_tip {
                    line(format!("💡 {tip}"), 13.0, text.gamma_multiply(0.7), 4.0);
                }
            }
            None => line(
                "Loading match insight…".to_string(),
                13.0,
                text.gamma_multiply(0.5),
                4.0,
            ),
        }

        if let Some(hint) = self.feedback.hint {
            let (label, color, anchor) = match hint {
                SwipeHint::Right => ("APPLY", Color32::from_rgb(46, 160, 67), -1.0),
                SwipeHint::Left => ("SKIP", Color32::from_rgb(218, 54, 51), 1.0),
            };
            let galley = painter.layout_no_wrap(label.to_string(), FontId::proportional(32.0), color);
            let local = Vec2::new(
                anchor * (rest.width() / 2.0 - CONTENT_PADDING) - (anchor + 1.0) / 2.0 * galley.size().x,
                -rest.height() / 2.0 + CONTENT_PADDING * 4.0,
            );
            painter.add(
                TextShape::new(transform.apply(local), galley, color)
                    .with_angle(transform.rotation.angle()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::gesture::{feedback_for, GestureConfig, Point};

    fn rest() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), CARD_SIZE)
    }

    #[test]
    fn identity_feedback_keeps_card_at_rest() {
        let transform = CardTransform::from_feedback(rest(), &DragFeedback::IDENTITY);
        let corners = transform.corners(CARD_SIZE);
        assert!((corners[0] - rest().left_top()).length() < 1e-3);
        assert!((corners[2] - rest().right_bottom()).length() < 1e-3);
        assert_eq!(transform.opacity, 1.0);
    }

    #[test]
    fn drag_translates_rotates_and_fades() {
        let feedback = feedback_for(&GestureConfig::default(), Point::new(250.0, 0.0));
        let transform = CardTransform::from_feedback(rest(), &feedback);
        assert_eq!(transform.center, rest().center() + Vec2::new(250.0, 0.0));
        assert!((transform.rotation.angle() - 25f32.to_radians()).abs() < 1e-4);
        assert!((transform.opacity - 0.5).abs() < 1e-6);

        let top = transform.apply(Vec2::new(0.0, -100.0));
        assert!(top.x > transform.center.x, "clockwise tilt moves the top right");
    }

    #[test]
    fn action_strip_sits_at_card_bottom() {
        let strip = action_strip(rest());
        assert_eq!(strip.bottom(), rest().bottom());
        assert_eq!(strip.height(), ACTION_STRIP_HEIGHT);
        assert!(rest().contains_rect(strip));
    }
}
