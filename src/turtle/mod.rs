//! Turtle interpretation of derived symbol strings
//!
//! Walks a token string left-to-right and maps the drawing alphabet to
//! pen actions:
//!
//! - `F`, `G` - forward one step, drawing
//! - `L`      - leaf: forward, with two short 45-degree ticks
//! - `+`      - turn left by the grammar angle
//! - `-`      - turn right by the grammar angle
//! - `[`      - push (position, heading, color)
//! - `]`      - pop and restore
//! - `0`-`9`  - select a pen color from the color table, if the id exists
//!
//! Every other token is a no-op, so grammars are free to use bookkeeping
//! symbols (A, B, X, Y, ...) that never draw.

pub mod svg;

use serde::{Deserialize, Serialize};

use crate::loader::ColorTable;

/// Pen color used before any color token selects another.
pub const DEFAULT_COLOR: &str = "black";

/// A point in world units. +x is east, +y is north; the SVG writer flips y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One drawn pen stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: String,
}

#[derive(Debug, Clone)]
struct PenState {
    position: Point,
    /// Heading in degrees; 0 = east, counter-clockwise positive.
    heading: f64,
    color: String,
}

/// Turtle renderer. The saved-position stack is an explicit field of the
/// value, pushed by `[` and popped by `]`.
#[derive(Debug)]
pub struct Turtle {
    pen: PenState,
    stack: Vec<PenState>,
    segments: Vec<Segment>,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new()
    }
}

impl Turtle {
    /// A turtle at the origin, heading east, pen down in the default color.
    pub fn new() -> Self {
        Self {
            pen: PenState {
                position: Point::default(),
                heading: 0.0,
                color: DEFAULT_COLOR.to_string(),
            },
            stack: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Interpret a derived token string. `angle` is the grammar's turn
    /// angle in degrees, `step` the forward distance per move.
    pub fn interpret(
        tokens: &str,
        angle: f64,
        step: f64,
        colors: &ColorTable,
    ) -> Vec<Segment> {
        let mut turtle = Turtle::new();
        for token in tokens.chars() {
            turtle.apply(token, angle, step, colors);
        }
        turtle.segments
    }

    fn apply(&mut self, token: char, angle: f64, step: f64, colors: &ColorTable) {
        match token {
            'F' | 'G' => self.advance(step),
            'L' => self.leaf(step),
            '+' => self.pen.heading += angle,
            '-' => self.pen.heading -= angle,
            '[' => self.stack.push(self.pen.clone()),
            ']' => match self.stack.pop() {
                Some(saved) => self.pen = saved,
                // Unbalanced brackets in the grammar; keep drawing.
                None => tracing::debug!("']' with empty stack; ignored"),
            },
            '0'..='9' => {
                if let Some(color) = token.to_digit(10).and_then(|id| colors.get(&id)) {
                    self.pen.color = color.clone();
                }
            }
            _ => {}
        }
    }

    /// Move forward (or backward, for negative distances), drawing.
    fn advance(&mut self, distance: f64) {
        let radians = self.pen.heading.to_radians();
        let from = self.pen.position;
        let to = Point::new(
            from.x + distance * radians.cos(),
            from.y + distance * radians.sin(),
        );
        self.segments.push(Segment {
            from,
            to,
            color: self.pen.color.clone(),
        });
        self.pen.position = to;
    }

    /// Forward with two short ticks at 45 degrees either side of the tip.
    fn leaf(&mut self, step: f64) {
        self.advance(step);
        self.pen.heading += 45.0;
        self.advance(step / 4.0);
        self.advance(-step / 4.0);
        self.pen.heading -= 90.0;
        self.advance(step / 4.0);
        self.advance(-step / 4.0);
        self.pen.heading += 45.0;
    }
}
