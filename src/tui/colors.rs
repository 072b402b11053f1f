//! Color constants for the dashboard.

use ratatui::style::Color;

// Grade palette for the metrics panel.

/// Used for the Excellent grade.
pub const GRADE_GREEN: Color = Color::Rgb(0, 160, 60);
/// Used for the Good grade.
pub const GRADE_GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for the Fair grade.
pub const GRADE_AMBER: Color = Color::Rgb(220, 130, 0);
/// Used for the Needs Improvement grade.
pub const GRADE_RED: Color = Color::Rgb(180, 30, 30);
