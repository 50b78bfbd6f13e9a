//! Turtle interpretation of derived strings.
//!
//! Each symbol maps to one [`TurtleCommand`]; symbols with no mapping are
//! ignored. The turtle only records line segments, and [`svg`] turns them into
//! a document.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::errors::{LsysError, LsysResult};
use crate::grammar::definition::DrawingSettings;
use crate::grammar::Symbol;

pub mod svg;

pub use svg::Svg;

#[derive(Debug, Clone, PartialEq)]
pub enum TurtleCommand {
    /// Draw a segment in the current pen color.
    Forward,
    /// Draw a segment in the given color without changing the pen.
    ForwardColored(String),
    /// Advance without drawing.
    Move,
    TurnLeft,
    TurnRight,
    /// Save position and heading.
    Push,
    /// Restore the last saved position and heading.
    Pop,
    SetColor(String),
    SetWidth(f64),
    Ignore,
}

static IGNORE: TurtleCommand = TurtleCommand::Ignore;

static STANDARD_COMMANDS: Lazy<CommandMap> = Lazy::new(|| {
    let mut map = CommandMap::empty()
        .with('F', TurtleCommand::Forward)
        .with('f', TurtleCommand::Move)
        .with('+', TurtleCommand::TurnRight)
        .with('-', TurtleCommand::TurnLeft)
        .with('[', TurtleCommand::Push)
        .with(']', TurtleCommand::Pop);
    for (symbol, color) in [
        ('G', "green"),
        ('R', "red"),
        ('B', "blue"),
        ('Y', "yellow"),
        ('O', "orange"),
    ] {
        map = map.with(symbol, TurtleCommand::ForwardColored(color.to_string()));
    }
    map
});

/// Symbol → command lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandMap {
    commands: BTreeMap<Symbol, TurtleCommand>,
}

impl CommandMap {
    pub fn empty() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// `F` forward, `f` move, `+`/`-` turn right/left, `[`/`]` push/pop, and
    /// `G R B Y O` forward in green, red, blue, yellow and orange.
    pub fn standard() -> &'static CommandMap {
        &STANDARD_COMMANDS
    }

    pub fn with(mut self, symbol: Symbol, command: TurtleCommand) -> Self {
        self.commands.insert(symbol, command);
        self
    }

    pub fn get(&self, symbol: Symbol) -> &TurtleCommand {
        self.commands.get(&symbol).unwrap_or(&IGNORE)
    }
}

impl Default for CommandMap {
    fn default() -> Self {
        STANDARD_COMMANDS.clone()
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub color: String,
    pub width: f64,
}

/// Axis-aligned box around every point the turtle visited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    fn at(point: Point) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub segments: Vec<Segment>,
    pub bounds: Bounds,
}

impl Drawing {
    pub fn to_svg(&self) -> String {
        Svg(self).to_string()
    }
}

// ============================================================================
// TURTLE
// ============================================================================

#[derive(Debug, Clone)]
struct Pen {
    position: Point,
    heading: f64,
    color: String,
    width: f64,
}

impl Pen {
    fn advance(&mut self, distance: f64) -> Point {
        let start = self.position;
        let radians = self.heading.to_radians();
        self.position = Point {
            x: start.x + distance * radians.cos(),
            y: start.y + distance * radians.sin(),
        };
        start
    }
}

/// Interprets strings under fixed drawing settings.
#[derive(Debug, Clone)]
pub struct Turtle<'m> {
    settings: DrawingSettings,
    commands: &'m CommandMap,
}

impl Turtle<'static> {
    pub fn new(settings: DrawingSettings) -> Self {
        Self {
            settings,
            commands: CommandMap::standard(),
        }
    }
}

impl<'m> Turtle<'m> {
    pub fn with_commands(settings: DrawingSettings, commands: &'m CommandMap) -> Self {
        Self { settings, commands }
    }

    /// Runs the turtle from the origin over `input`.
    ///
    /// # Errors
    ///
    /// [`LsysError::UnbalancedPop`] when a pop finds no saved state.
    pub fn draw(&self, input: &str) -> LsysResult<Drawing> {
        let mut pen = Pen {
            position: Point::default(),
            heading: self.settings.heading,
            color: self.settings.color.clone(),
            width: self.settings.width,
        };
        let mut saved: Vec<(Point, f64)> = Vec::new();
        let mut segments = Vec::new();
        let mut bounds = Bounds::at(pen.position);
        let distance = self.settings.distance;

        for (position, symbol) in input.chars().enumerate() {
            match self.commands.get(symbol) {
                TurtleCommand::Forward => {
                    let start = pen.advance(distance);
                    segments.push(Segment {
                        start,
                        end: pen.position,
                        color: pen.color.clone(),
                        width: pen.width,
                    });
                }
                TurtleCommand::ForwardColored(color) => {
                    let start = pen.advance(distance);
                    segments.push(Segment {
                        start,
                        end: pen.position,
                        color: color.clone(),
                        width: pen.width,
                    });
                }
                TurtleCommand::Move => {
                    pen.advance(distance);
                }
                TurtleCommand::TurnLeft => pen.heading += self.settings.angle,
                TurtleCommand::TurnRight => pen.heading -= self.settings.angle,
                TurtleCommand::Push => saved.push((pen.position, pen.heading)),
                TurtleCommand::Pop => {
                    let (point, heading) =
                        saved.pop().ok_or(LsysError::UnbalancedPop { position })?;
                    pen.position = point;
                    pen.heading = heading;
                }
                TurtleCommand::SetColor(color) => pen.color = color.clone(),
                TurtleCommand::SetWidth(width) => pen.width = *width,
                TurtleCommand::Ignore => {}
            }
            bounds.include(pen.position);
        }

        log::debug!("turtle drew {} segments", segments.len());
        Ok(Drawing { segments, bounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, x: f64, y: f64) -> bool {
        (a.x - x).abs() < 1e-9 && (a.y - y).abs() < 1e-9
    }

    fn settings(angle: f64) -> DrawingSettings {
        DrawingSettings {
            angle,
            distance: 1.0,
            ..DrawingSettings::default()
        }
    }

    #[test]
    fn forward_starts_pointing_up() {
        let drawing = Turtle::new(settings(90.0)).draw("FF").unwrap();
        assert_eq!(drawing.segments.len(), 2);
        assert!(close(drawing.segments[1].end, 0.0, 2.0));
        assert_eq!(drawing.segments[0].color, "black");
    }

    #[test]
    fn plus_turns_clockwise() {
        let drawing = Turtle::new(settings(90.0)).draw("+F-F").unwrap();
        assert!(close(drawing.segments[0].end, 1.0, 0.0));
        assert!(close(drawing.segments[1].end, 1.0, 1.0));
    }

    #[test]
    fn move_does_not_draw_but_extends_bounds() {
        let drawing = Turtle::new(settings(90.0)).draw("ffF").unwrap();
        assert_eq!(drawing.segments.len(), 1);
        assert!(close(drawing.segments[0].start, 0.0, 2.0));
        assert!((drawing.bounds.height() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn brackets_restore_position_and_heading() {
        let drawing = Turtle::new(settings(90.0)).draw("F[+F]F").unwrap();
        assert!(close(drawing.segments[1].end, 1.0, 1.0));
        assert!(close(drawing.segments[2].start, 0.0, 1.0));
        assert!(close(drawing.segments[2].end, 0.0, 2.0));
    }

    #[test]
    fn color_letters_do_not_change_the_pen() {
        let drawing = Turtle::new(settings(60.0)).draw("GRF").unwrap();
        let colors: Vec<_> = drawing.segments.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, ["green", "red", "black"]);
    }

    #[test]
    fn unbalanced_pop_reports_position() {
        let err = Turtle::new(settings(60.0)).draw("F]F").unwrap_err();
        assert!(matches!(err, LsysError::UnbalancedPop { position: 1 }));
    }

    #[test]
    fn custom_map_sets_pen_state() {
        let map = CommandMap::empty()
            .with('A', TurtleCommand::Forward)
            .with('c', TurtleCommand::SetColor("purple".to_string()))
            .with('w', TurtleCommand::SetWidth(3.0));
        let drawing = Turtle::with_commands(settings(60.0), &map)
            .draw("AcwAF")
            .unwrap();
        assert_eq!(drawing.segments.len(), 2);
        assert_eq!(drawing.segments[1].color, "purple");
        assert_eq!(drawing.segments[1].width, 3.0);
        assert_eq!(map.get('F'), &TurtleCommand::Ignore);
    }
}
