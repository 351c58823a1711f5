//! Color palettes for weather-code and continuous fields.

use eframe::egui::Color32;

/// Caption of the weather-code legend, Japanese when a CJK font is installed.
pub fn weather_code_caption(cjk: bool) -> &'static str {
    if cjk {
        "天気コード"
    } else {
        "weather code"
    }
}

/// Category bounds for the weather-code palette (boundary normalization).
pub const WEATHER_CODE_BOUNDS: [f32; 6] = [0.5, 1.5, 2.5, 3.5, 4.5, 5.5];

/// The five weather-code categories, in code order 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCode {
    Clear,
    Cloudy,
    Rain,
    RainOrSnow,
    Snow,
}

impl WeatherCode {
    pub const ALL: [WeatherCode; 5] = [
        WeatherCode::Clear,
        WeatherCode::Cloudy,
        WeatherCode::Rain,
        WeatherCode::RainOrSnow,
        WeatherCode::Snow,
    ];

    /// Category for a grid value.
    ///
    /// Values outside the bounds take the nearest end category. NaN has none.
    pub fn from_value(value: f32) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        let inner = &WEATHER_CODE_BOUNDS[1..WEATHER_CODE_BOUNDS.len() - 1];
        let index = inner.partition_point(|&bound| bound <= value);
        Some(Self::ALL[index])
    }

    pub fn code(self) -> u8 {
        match self {
            WeatherCode::Clear => 1,
            WeatherCode::Cloudy => 2,
            WeatherCode::Rain => 3,
            WeatherCode::RainOrSnow => 4,
            WeatherCode::Snow => 5,
        }
    }

    /// Legend label. Without a CJK font the English name is used, since
    /// egui's bundled fonts have no Japanese glyphs.
    pub fn label(self, cjk: bool) -> &'static str {
        match (self, cjk) {
            (WeatherCode::Clear, true) => "晴れ",
            (WeatherCode::Cloudy, true) => "曇り",
            (WeatherCode::Rain, true) => "雨",
            (WeatherCode::RainOrSnow, true) => "雨または雪",
            (WeatherCode::Snow, true) => "雪",
            (WeatherCode::Clear, false) => "clear",
            (WeatherCode::Cloudy, false) => "cloudy",
            (WeatherCode::Rain, false) => "rain",
            (WeatherCode::RainOrSnow, false) => "rain or snow",
            (WeatherCode::Snow, false) => "snow",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            WeatherCode::Clear => Color32::from_rgb(255, 215, 0), // gold
            WeatherCode::Cloudy => Color32::from_rgb(211, 211, 211), // lightgray
            WeatherCode::Rain => Color32::from_rgb(0, 0, 255),    // blue
            WeatherCode::RainOrSnow => Color32::from_rgb(147, 112, 219), // mediumpurple
            WeatherCode::Snow => Color32::from_rgb(0, 255, 255),  // cyan
        }
    }
}

/// Color for a weather-code grid value; NaN is transparent.
pub fn weather_code_color(value: f32) -> Color32 {
    WeatherCode::from_value(value)
        .map(WeatherCode::color)
        .unwrap_or(Color32::TRANSPARENT)
}

/// Piecewise-linear colormap over evenly spaced anchors.
#[derive(Debug, Clone)]
pub struct Colormap {
    anchors: Vec<[u8; 3]>,
}

impl Colormap {
    /// Diverging blue-white-red map (Moreland's "cool to warm").
    pub fn coolwarm() -> Self {
        Self {
            anchors: vec![
                [59, 76, 192],
                [98, 130, 234],
                [141, 176, 254],
                [184, 208, 249],
                [221, 221, 221],
                [245, 196, 173],
                [244, 154, 123],
                [222, 96, 77],
                [180, 4, 38],
            ],
        }
    }

    /// Color at `t` in `[0, 1]`; out-of-range values clamp.
    pub fn sample(&self, t: f64) -> Color32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = self.anchors.len().saturating_sub(1);
        if segments == 0 {
            return self
                .anchors
                .first()
                .map(|[r, g, b]| Color32::from_rgb(*r, *g, *b))
                .unwrap_or(Color32::TRANSPARENT);
        }

        let pos = t * segments as f64;
        let index = (pos.floor() as usize).min(segments - 1);
        let frac = pos - index as f64;
        let a = self.anchors[index];
        let b = self.anchors[index + 1];
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;

        Color32::from_rgb(lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2]))
    }
}
