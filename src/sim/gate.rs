//! Gate obstacles
//!
//! A gate is a pair of obstacles sharing one `x`: an upper obstacle hanging
//! from the ceiling and a lower one standing on the floor, with a vertical gap
//! between them. Both halves are always created, moved and removed together.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::error::GateError;

/// A paired upper/lower obstacle scrolling left
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// Spawn order, unique within a run
    pub id: u32,
    /// Left edge of both obstacles
    pub x: i32,
    /// Height of the upper obstacle (top of the gap)
    pub top_height: i32,
    pub gap_height: i32,
    pub width: i32,
    /// World units moved left per tick
    pub horizontal_speed: i32,
    /// Height of the playfield the gate was built for
    world_height: i32,
}

impl Gate {
    /// Build a gate, rejecting geometry that would make it unplayable
    pub fn new(
        id: u32,
        x: i32,
        top_height: i32,
        gap_height: i32,
        width: i32,
        horizontal_speed: i32,
        world_height: i32,
    ) -> Result<Self, GateError> {
        if width <= 0 {
            return Err(GateError::NonPositiveWidth(width));
        }
        if gap_height <= 0 {
            return Err(GateError::NonPositiveGap(gap_height));
        }
        if top_height < 0 {
            return Err(GateError::NegativeTop(top_height));
        }
        if horizontal_speed <= 0 {
            return Err(GateError::NonPositiveSpeed(horizontal_speed));
        }
        // A sum past i32::MAX is out of bounds for any world
        let bottom = top_height.saturating_add(gap_height);
        if bottom >= world_height {
            return Err(GateError::GapOutOfBounds {
                top: top_height,
                bottom,
                world_height,
            });
        }

        Ok(Self::new_unchecked(
            id,
            x,
            top_height,
            gap_height,
            width,
            horizontal_speed,
            world_height,
        ))
    }

    /// Build from geometry the caller has already validated
    pub(super) fn new_unchecked(
        id: u32,
        x: i32,
        top_height: i32,
        gap_height: i32,
        width: i32,
        horizontal_speed: i32,
        world_height: i32,
    ) -> Self {
        Self {
            id,
            x,
            top_height,
            gap_height,
            width,
            horizontal_speed,
            world_height,
        }
    }

    /// Right edge shared by both obstacles
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Height of the lower obstacle
    #[inline]
    pub fn lower_height(&self) -> i32 {
        self.world_height - self.top_height - self.gap_height
    }

    pub fn upper_rect(&self) -> Rect {
        Rect::new(self.x, 0, self.width, self.top_height)
    }

    pub fn lower_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.top_height + self.gap_height,
            self.width,
            self.lower_height(),
        )
    }

    /// Both obstacle rectangles, upper first
    pub fn obstacles(&self) -> [Rect; 2] {
        [self.upper_rect(), self.lower_rect()]
    }

    /// Whether either obstacle overlaps `hitbox`
    pub fn hits(&self, hitbox: &Rect) -> bool {
        self.obstacles().iter().any(|r| r.intersects(hitbox))
    }

    /// Vertical centre of the gap
    pub fn gap_center(&self) -> i32 {
        self.top_height + self.gap_height / 2
    }

    /// Move left by one tick's worth of travel
    pub fn advance(&mut self) {
        self.x -= self.horizontal_speed;
    }

    /// Fully past the left edge of the playfield
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0
    }
}
