use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{Ansi256Color, Color as ClapColor, RgbColor, Style, Styles},
};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// Color per output role for one terminal background.
struct Palette {
  timestamp: Color,
  primary: Color,
  accent: Color,
  success: Color,
  label: Color,
  value: Color,
  muted: Color,
}

const DARK: Palette = Palette {
  timestamp: Color::Rgb { r: 120, g: 144, b: 156 },
  primary: Color::Rgb { r: 80, g: 170, b: 230 },
  accent: Color::Rgb { r: 232, g: 106, b: 84 },
  success: Color::Rgb { r: 110, g: 190, b: 120 },
  label: Color::Rgb { r: 0, g: 137, b: 214 },
  value: Color::Rgb { r: 236, g: 200, b: 90 },
  muted: Color::Rgb { r: 128, g: 128, b: 128 },
};

const LIGHT: Palette = Palette {
  timestamp: Color::Rgb { r: 84, g: 96, b: 104 },
  primary: Color::Rgb { r: 0, g: 90, b: 158 },
  accent: Color::Rgb { r: 180, g: 48, b: 32 },
  success: Color::Rgb { r: 30, g: 120, b: 60 },
  label: Color::Rgb { r: 0, g: 94, b: 148 },
  value: Color::Rgb { r: 150, g: 100, b: 10 },
  muted: Color::Rgb { r: 110, g: 110, b: 110 },
};

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

/// Converts a palette color for `comfy-table` cells.
///
/// Palettes only hold RGB values; anything else falls back to the terminal default.
pub const fn to_comfy(color: Color) -> ComfyColor {
  match color {
    Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
    Color::AnsiValue(value) => ComfyColor::AnsiValue(value),
    _ => ComfyColor::Reset,
  }
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn palette(&self) -> &'static Palette {
    match self.theme {
      Theme::Dark => &DARK,
      Theme::Light => &LIGHT,
    }
  }

  const fn pick(&self, color: Color) -> Color {
    if self.enabled { color } else { Color::Reset }
  }

  pub const fn timestamp(&self) -> Color {
    self.pick(self.palette().timestamp)
  }

  pub const fn primary(&self) -> Color {
    self.pick(self.palette().primary)
  }

  /// Errors, HTTP methods and other highlights.
  pub const fn accent(&self) -> Color {
    self.pick(self.palette().accent)
  }

  pub const fn success(&self) -> Color {
    self.pick(self.palette().success)
  }

  pub const fn label(&self) -> Color {
    self.pick(self.palette().label)
  }

  pub const fn value(&self) -> Color {
    self.pick(self.palette().value)
  }

  /// Placeholders for unset values.
  pub const fn muted(&self) -> Color {
    self.pick(self.palette().muted)
  }

  const fn to_clap(color: Color) -> Option<ClapColor> {
    match color {
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      Color::AnsiValue(value) => Some(ClapColor::Ansi256(Ansi256Color(value))),
      _ => None,
    }
  }

  /// Help styles; the dark palette reads well on both backgrounds.
  pub const fn clap_styles() -> Styles {
    let palette = &DARK;
    let heading = Self::to_clap(palette.label);
    let error = Self::to_clap(palette.accent);

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(heading))
      .usage(Style::new().bold().fg_color(heading))
      .literal(Style::new().fg_color(Self::to_clap(palette.primary)))
      .placeholder(Style::new().fg_color(Self::to_clap(palette.value)))
      .error(Style::new().bold().fg_color(error))
      .valid(Style::new().fg_color(Self::to_clap(palette.success)))
      .invalid(Style::new().bold().fg_color(error))
  }
}

/// Whether to colorize output written to `stream`.
pub fn colors_enabled(mode: ColorMode, stream: &impl IsTerminal) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => stream.is_terminal() && std::env::var_os("NO_COLOR").is_none(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => detect_terminal_theme(),
  }
}

/// Reads the background from `COLORFGBG` (`fg;bg`, bg >= 8 is light); dark otherwise.
fn detect_terminal_theme() -> Theme {
  let background = std::env::var("COLORFGBG")
    .ok()
    .and_then(|value| value.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()));

  match background {
    Some(bg) if bg >= 8 => Theme::Light,
    _ => Theme::Dark,
  }
}
