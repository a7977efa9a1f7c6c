use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

pub const PEN_WIDTH: f64 = 4.0;
pub const BRUSH_WIDTH: f64 = 12.0;
pub const ERASER_WIDTH: f64 = 20.0;
pub const FILL_HIGHLIGHT: &str = "#ffeb3b";
/// Style property the highlight is written to. Only the color is touched so
/// author-set background images survive.
pub const HIGHLIGHT_PROPERTY: &str = "background-color";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Brush,
    Eraser,
    #[serde(rename = "smartfill")]
    SmartFill,
}

/// What a toolbar control asks for. `undo` and `save` are actions, not tools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolCommand {
    Select(Tool),
    Undo,
    Save,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composite {
    SourceOver,
    DestinationOut,
}

impl Composite {
    pub fn as_canvas_op(self) -> &'static str {
        match self {
            Composite::SourceOver => "source-over",
            Composite::DestinationOut => "destination-out",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub composite: Composite,
    pub color: Rgb,
}

/// Cursor and control highlight that go with the active tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolChrome {
    pub cursor: &'static str,
    pub highlight: Option<&'static str>,
}

impl Tool {
    pub fn id(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Brush => "brush",
            Tool::Eraser => "eraser",
            Tool::SmartFill => "smartfill",
        }
    }

    pub fn draws(self) -> bool {
        !matches!(self, Tool::SmartFill)
    }

    pub fn stroke_style(self, color: Rgb) -> Option<StrokeStyle> {
        let (width, composite, color) = match self {
            Tool::Pen => (PEN_WIDTH, Composite::SourceOver, color),
            Tool::Brush => (BRUSH_WIDTH, Composite::SourceOver, color),
            Tool::Eraser => (ERASER_WIDTH, Composite::DestinationOut, Rgb::WHITE),
            Tool::SmartFill => return None,
        };
        Some(StrokeStyle {
            width,
            composite,
            color,
        })
    }

    pub fn chrome(self) -> ToolChrome {
        match self {
            Tool::SmartFill => ToolChrome {
                cursor: "crosshair",
                highlight: Some(FILL_HIGHLIGHT),
            },
            _ => ToolChrome {
                cursor: "default",
                highlight: None,
            },
        }
    }
}

impl FromStr for ToolCommand {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "pen" => Ok(ToolCommand::Select(Tool::Pen)),
            "brush" => Ok(ToolCommand::Select(Tool::Brush)),
            "eraser" => Ok(ToolCommand::Select(Tool::Eraser)),
            "smartfill" => Ok(ToolCommand::Select(Tool::SmartFill)),
            "undo" => Ok(ToolCommand::Undo),
            "save" => Ok(ToolCommand::Save),
            other => Err(format!("unknown tool {other:?}")),
        }
    }
}
