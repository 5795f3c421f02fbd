use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

pub const BACKGROUND: Color = Color::Rgb(12, 18, 30);
pub const STATUS_TEXT: Color = Color::Rgb(200, 208, 220);
pub const MUTED_TEXT: Color = Color::Rgb(120, 130, 150);
pub const POSITIVE: Color = Color::Rgb(140, 220, 140);
pub const NEGATIVE: Color = Color::Rgb(240, 130, 120);

pub fn detect_color_capability() -> ColorCapability {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorCapability::Basic16;
    }

    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorCapability::TrueColor;
    }

    let term = std::env::var("TERM").unwrap_or_default().to_lowercase();
    if term.contains("256color") {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

/// Foreground for a cell lit with `light` (channels `0.0..=1.0`), laid over
/// the dark sky background.
pub fn light_color(light: [f32; 3], capability: ColorCapability) -> Color {
    let Color::Rgb(br, bg, bb) = BACKGROUND else {
        return Color::White;
    };
    let channel = |base: u8, add: f32| -> u8 {
        (f32::from(base) + add.clamp(0.0, 1.0) * 255.0).min(255.0) as u8
    };
    let rgb = Color::Rgb(
        channel(br, light[0]),
        channel(bg, light[1]),
        channel(bb, light[2]),
    );
    quantize(rgb, capability)
}

pub fn quantize(color: Color, capability: ColorCapability) -> Color {
    match (capability, color) {
        (ColorCapability::TrueColor, c) => c,
        (ColorCapability::Xterm256, Color::Rgb(r, g, b)) => {
            let to_cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
            Color::Indexed(16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b))
        }
        (ColorCapability::Basic16, Color::Rgb(r, g, b)) => basic16_from_rgb(r, g, b),
        (_, c) => c,
    }
}

/// Ray light is white, warm or cool; hue beyond that doesn't survive the
/// sixteen-color palette, so only brightness and warmth are kept.
fn basic16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    let light = (f32::from(r.max(g).max(b)) + f32::from(r.min(g).min(b))) / 510.0;
    let warm = i16::from(r) - i16::from(b) > 40;
    let cool = i16::from(b) - i16::from(r) > 40;

    match light {
        l if l < 0.20 => Color::Black,
        l if l < 0.40 => Color::DarkGray,
        l if warm => {
            if l >= 0.6 {
                Color::LightYellow
            } else {
                Color::Yellow
            }
        }
        l if cool => {
            if l >= 0.6 {
                Color::LightBlue
            } else {
                Color::Blue
            }
        }
        l if l < 0.72 => Color::Gray,
        _ => Color::White,
    }
}
